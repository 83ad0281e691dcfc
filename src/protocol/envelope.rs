// src/protocol/envelope.rs

//! The JSON envelope a payload returns through the interpreter's stdout.
//!
//! ```json
//! { "success": false,
//!   "result": {},
//!   "log": [{ "severity": "info", "message": "JavaScript starting" }],
//!   "exception": { "name": "Error", "description": "croak died",
//!                  "line": 31, "fileName": "bridge_test.jsx" } }
//! ```
//!
//! [`RawEnvelope`] is the wire shape. [`ResponseEnvelope`] is what the rest
//! of the crate works with: success and failure become an [`Outcome`], so an
//! envelope claiming failure without an exception (or success with one)
//! cannot be represented and is rejected while parsing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{BridgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogSeverity::Debug => "debug",
            LogSeverity::Info => "info",
            LogSeverity::Warn => "warn",
            LogSeverity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single log call made inside the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub message: String,
}

impl LogEntry {
    pub fn new(severity: LogSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// What the payload knew about an exception it caught.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "lineNo")]
    pub line: Option<u32>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl ExceptionInfo {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)?;
        match (&self.file_name, self.line) {
            (Some(file), Some(line)) => write!(f, " ({file}:{line})"),
            (Some(file), None) => write!(f, " ({file})"),
            (None, Some(line)) => write!(f, " (line {line})"),
            (None, None) => Ok(()),
        }
    }
}

/// Envelope exactly as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEnvelope {
    pub success: bool,
    #[serde(default)]
    pub result: Value,
    #[serde(default)]
    pub log: Vec<LogEntry>,
    #[serde(default)]
    pub exception: Option<ExceptionInfo>,
}

impl RawEnvelope {
    /// Decode stdout without checking that success and exception agree.
    /// Surrounding whitespace (osascript appends a newline) is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text.trim())
            .map_err(|e| BridgeError::Protocol(format!("response is not a JSON envelope: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Failure(ExceptionInfo),
}

/// A validated response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope", into = "RawEnvelope")]
pub struct ResponseEnvelope {
    pub log: Vec<LogEntry>,
    pub outcome: Outcome,
}

impl ResponseEnvelope {
    pub fn success(result: Value, log: Vec<LogEntry>) -> Self {
        Self {
            log,
            outcome: Outcome::Success(result),
        }
    }

    pub fn failure(exception: ExceptionInfo, log: Vec<LogEntry>) -> Self {
        Self {
            log,
            outcome: Outcome::Failure(exception),
        }
    }

    /// Parse and validate the interpreter's stdout.
    pub fn parse(text: &str) -> Result<Self> {
        Self::try_from(RawEnvelope::parse(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&RawEnvelope::from(self.clone()))?)
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// The result value, or an `Application` error for a failed call.
    pub fn into_result(self) -> Result<Value> {
        match self.outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(exception) => Err(BridgeError::Application(exception)),
        }
    }
}

impl TryFrom<RawEnvelope> for ResponseEnvelope {
    type Error = BridgeError;

    fn try_from(raw: RawEnvelope) -> std::result::Result<Self, Self::Error> {
        let outcome = match (raw.success, raw.exception) {
            (true, None) => Outcome::Success(raw.result),
            (false, Some(exception)) => Outcome::Failure(exception),
            (true, Some(_)) => {
                return Err(BridgeError::Protocol(
                    "envelope reports success but carries an exception".to_string(),
                ));
            }
            (false, None) => {
                return Err(BridgeError::Protocol(
                    "envelope reports failure without an exception".to_string(),
                ));
            }
        };
        Ok(Self {
            log: raw.log,
            outcome,
        })
    }
}

impl From<ResponseEnvelope> for RawEnvelope {
    fn from(envelope: ResponseEnvelope) -> Self {
        match envelope.outcome {
            Outcome::Success(result) => RawEnvelope {
                success: true,
                result,
                log: envelope.log,
                exception: None,
            },
            Outcome::Failure(exception) => RawEnvelope {
                success: false,
                result: Value::Object(Default::default()),
                log: envelope.log,
                exception: Some(exception),
            },
        }
    }
}
