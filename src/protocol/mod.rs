// src/protocol/mod.rs

//! Data exchanged with the in-application dispatcher.
//!
//! Requests travel as three AppleScript variables (function name, JSON
//! argument string, log mode marker); the response is a JSON envelope
//! printed on the interpreter's stdout.

pub mod call;
pub mod envelope;
pub mod naming;

pub use call::FunctionCall;
pub use envelope::{
    ExceptionInfo, LogEntry, LogSeverity, Outcome, RawEnvelope, ResponseEnvelope,
};
pub use naming::{camel_case_keys, to_camel_case_json};

/// AppleScript variable holding the function name.
pub const FUNCTION_NAME_VAR: &str = "functionName";
/// AppleScript variable holding the JSON argument string.
pub const SCRIPT_ARGS_VAR: &str = "scriptArgs";
/// AppleScript variable holding the log mode marker.
pub const SCRIPT_LOGGER_VAR: &str = "scriptLogger";

/// Function invoked when the request names none.
pub const DEFAULT_FUNCTION: &str = "main";
