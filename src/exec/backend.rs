// src/exec/backend.rs

//! Pluggable script runner abstraction.
//!
//! The bridge talks to a `ScriptRunner` instead of spawning `osascript`
//! directly. Production code uses [`OsascriptRunner`](super::OsascriptRunner);
//! tests can provide a runner that interprets the generated script in
//! process and answers with a canned or dispatched envelope.

use std::future::Future;
use std::pin::Pin;

use crate::errors::{BridgeError, Result};

/// Exit status and captured output of one interpreter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stdout of a successful run.
    ///
    /// A nonzero exit code is always a `CommandExecution` error carrying
    /// stderr, whatever stdout contains.
    pub fn into_stdout(self) -> Result<String> {
        if self.exit_code != 0 {
            return Err(BridgeError::CommandExecution {
                exit_code: self.exit_code,
                stderr: self.stderr.trim_end().to_string(),
            });
        }
        Ok(self.stdout)
    }
}

/// Trait abstracting how a synthesized script is executed.
pub trait ScriptRunner: Send + Sync {
    /// Run `script` to completion and report its exit code and output.
    ///
    /// Implementations report a nonzero exit as a `ProcessResult`, not as an
    /// error; errors are reserved for failing to run the interpreter at all.
    fn run_script<'a>(
        &'a self,
        script: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessResult>> + Send + 'a>>;
}
