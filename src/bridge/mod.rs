// src/bridge/mod.rs

//! The public entry point: one function call against one application.
//!
//! `Application` encodes arguments, synthesizes the AppleScript, stages the
//! payload, runs the interpreter through a [`ScriptRunner`], then decodes
//! the envelope and replays its log.
//!
//! [`ScriptRunner`]: crate::exec::ScriptRunner

pub mod application;

pub use application::{
    Application, DEFAULT_TIMEOUT, PAYLOAD_LOG_TARGET, parse_response, replay_log,
};
