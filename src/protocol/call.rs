// src/protocol/call.rs

use serde::Serialize;
use serde_json::Value;

use crate::errors::{BridgeError, Result};
use crate::protocol::naming::to_camel_case_json;

/// Arguments transmitted when a call has none.
pub const EMPTY_ARGUMENTS: &str = "{}";

/// An explicit description of one payload function call.
///
/// ```
/// use adobe_bridge::protocol::FunctionCall;
/// use serde_json::json;
///
/// let call = FunctionCall::new("exportPdf").arg(json!({ "path": "/tmp/a.pdf" }));
/// assert_eq!(call.argument_json().unwrap(), r#"{"path":"/tmp/a.pdf"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    pub function: String,
    pub arguments: Vec<Value>,
}

impl FunctionCall {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            arguments: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, value: Value) -> Self {
        self.arguments.push(value);
        self
    }

    /// Append any serializable argument.
    pub fn try_arg<A: Serialize + ?Sized>(mut self, value: &A) -> Result<Self> {
        self.arguments.push(serde_json::to_value(value)?);
        Ok(self)
    }

    /// The JSON argument string sent to the dispatcher.
    ///
    /// Payload functions take a single argument object, so a call may carry
    /// at most one argument; none at all sends `{}`.
    pub fn argument_json(&self) -> Result<String> {
        match self.arguments.as_slice() {
            [] => Ok(EMPTY_ARGUMENTS.to_string()),
            [single] => to_camel_case_json(single),
            more => Err(BridgeError::InvalidCall(format!(
                "function '{}' called with {} arguments; the dispatcher passes exactly one argument object",
                self.function,
                more.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_arguments_sends_empty_object() {
        assert_eq!(FunctionCall::new("main").argument_json().unwrap(), "{}");
    }

    #[test]
    fn argument_keys_are_camel_cased() {
        #[derive(Serialize)]
        struct Open {
            file_path: String,
        }
        let call = FunctionCall::new("open")
            .try_arg(&Open {
                file_path: "/a.indd".to_string(),
            })
            .unwrap();
        assert_eq!(call.argument_json().unwrap(), r#"{"filePath":"/a.indd"}"#);
    }

    #[test]
    fn two_arguments_are_rejected() {
        let call = FunctionCall::new("save").arg(json!(1)).arg(json!(2));
        match call.argument_json() {
            Err(BridgeError::InvalidCall(msg)) => assert!(msg.contains("save")),
            other => panic!("expected InvalidCall, got {other:?}"),
        }
    }
}
