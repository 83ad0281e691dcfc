// src/dispatch/dispatcher.rs

//! Dispatching a request to a named payload function.
//!
//! Pipeline: decode arguments → `autoInit` (if registered) → the requested
//! function → `autoExit` (if registered). The first error ends the pipeline;
//! either way exactly one envelope is produced.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::dispatch::logger::ScriptLogger;
use crate::protocol::call::EMPTY_ARGUMENTS;
use crate::protocol::{DEFAULT_FUNCTION, ExceptionInfo, ResponseEnvelope};
use crate::types::LogMode;

/// Hook run before the requested function, if registered.
pub const AUTO_INIT: &str = "autoInit";
/// Hook run after the requested function succeeded, if registered.
pub const AUTO_EXIT: &str = "autoExit";

/// A payload function: receives the decoded argument object.
pub type ScriptFunction =
    Box<dyn Fn(&Value, &mut ScriptLogger) -> Result<Value, ExceptionInfo> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Idle,
    DecodingArguments,
    AutoInit,
    InvokingFunction,
    AutoExit,
    CaughtException,
    EncodingResponse,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Registry of payload functions, playing the role of the script's global
/// scope.
#[derive(Default)]
pub struct Dispatcher {
    functions: HashMap<String, ScriptFunction>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("Dispatcher").field("functions", &names).finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Value, &mut ScriptLogger) -> Result<Value, ExceptionInfo> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Box::new(function));
        self
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Run one request and build its envelope.
    ///
    /// Empty or missing `function` and `json_args` fall back to `main` and
    /// `{}`.
    pub fn dispatch(
        &self,
        function: Option<&str>,
        json_args: Option<&str>,
        log_mode: LogMode,
    ) -> ResponseEnvelope {
        let function = function.filter(|f| !f.is_empty()).unwrap_or(DEFAULT_FUNCTION);
        let json_args = json_args.filter(|a| !a.is_empty()).unwrap_or(EMPTY_ARGUMENTS);

        let mut log = ScriptLogger::new(log_mode);
        let mut stage = DispatchStage::Idle;
        log.info("dispatcher starting");

        let outcome = self.run_pipeline(function, json_args, &mut log, &mut stage);

        let envelope_outcome = match outcome {
            Ok(result) => Ok(result),
            Err(exception) => {
                debug!(function, %stage, exception = %exception, "payload raised");
                log.debug(format!("caught exception \"{}\"", exception.name));
                stage = DispatchStage::CaughtException;
                Err(exception)
            }
        };

        debug!(function, from = %stage, "encoding response");
        log.info("dispatcher done");

        match envelope_outcome {
            Ok(result) => ResponseEnvelope::success(result, log.into_entries()),
            Err(exception) => ResponseEnvelope::failure(exception, log.into_entries()),
        }
    }

    fn run_pipeline(
        &self,
        function: &str,
        json_args: &str,
        log: &mut ScriptLogger,
        stage: &mut DispatchStage,
    ) -> Result<Value, ExceptionInfo> {
        *stage = DispatchStage::DecodingArguments;
        let args: Value = serde_json::from_str(json_args).map_err(|e| ExceptionInfo {
            name: "SyntaxError".to_string(),
            description: e.to_string(),
            line: u32::try_from(e.line()).ok(),
            file_name: None,
        })?;

        *stage = DispatchStage::AutoInit;
        self.try_invoke_if_exists(AUTO_INIT, &args, log)?;

        *stage = DispatchStage::InvokingFunction;
        log.debug(format!("invoke \"{function}\""));
        let result = self.invoke(function, &args, log)?;

        *stage = DispatchStage::AutoExit;
        self.try_invoke_if_exists(AUTO_EXIT, &args, log)?;

        *stage = DispatchStage::EncodingResponse;
        Ok(result)
    }

    fn invoke(
        &self,
        function: &str,
        args: &Value,
        log: &mut ScriptLogger,
    ) -> Result<Value, ExceptionInfo> {
        let func = self.functions.get(function).ok_or_else(|| {
            ExceptionInfo::new(
                "Error",
                format!("Function \"{function}\" does not exist, stopping."),
            )
        })?;
        func(args, log)
    }

    fn try_invoke_if_exists(
        &self,
        function: &str,
        args: &Value,
        log: &mut ScriptLogger,
    ) -> Result<(), ExceptionInfo> {
        if !self.has_function(function) {
            log.debug(format!("tryInvoke \"{function}\" -- missing, not started"));
            return Ok(());
        }
        log.debug(format!("tryInvoke \"{function}\" -- starting"));
        self.invoke(function, args, log)?;
        log.debug(format!("tryInvoke \"{function}\" -- done"));
        Ok(())
    }
}
