// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ScriptRunner` trait and `ProcessResult`.
//! - [`osascript`] is the production runner that pipes a script into the
//!   interpreter process using `tokio::process::Command`.

pub mod backend;
pub mod osascript;

pub use backend::{ProcessResult, ScriptRunner};
pub use osascript::{OSASCRIPT, OsascriptRunner};
