// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! The first four variants are the bridge's own failure categories and are
//! kept distinct so callers can tell a broken bridge (`CommandExecution`,
//! `Protocol`) from a failing payload (`Application`) or a missing payload
//! file (`Resource`).

use thiserror::Error;

use crate::protocol::ExceptionInfo;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The interpreter exited with a nonzero status. No envelope was read.
    #[error("AppleScript execution failed (exit code {exit_code}): {stderr}")]
    CommandExecution { exit_code: i32, stderr: String },

    /// Stdout did not contain a well-formed response envelope.
    #[error("Malformed response: {0}")]
    Protocol(String),

    /// The payload reported `success = false`.
    #[error("JavaScript error: {0}")]
    Application(ExceptionInfo),

    /// A payload script is missing or could not be staged.
    #[error("Payload resource error: {0}")]
    Resource(String),

    /// The interpreter's input encoding cannot represent this character.
    #[error("Character {0:?} cannot be encoded for the AppleScript interpreter")]
    Encoding(char),

    #[error("Invalid function call: {0}")]
    InvalidCall(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BridgeError {
    /// True for failures of the bridge itself rather than of the payload.
    pub fn is_bridge_failure(&self) -> bool {
        matches!(
            self,
            BridgeError::CommandExecution { .. } | BridgeError::Protocol(_)
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BridgeError>;
