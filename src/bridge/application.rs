// src/bridge/application.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::applescript::{EncodingOptions, ScriptBuilder};
use crate::config::BridgeConfig;
use crate::errors::{BridgeError, Result};
use crate::exec::{OsascriptRunner, ScriptRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::payload::{ScriptCollection, ScriptDir};
use crate::protocol::{
    FUNCTION_NAME_VAR, FunctionCall, LogEntry, LogSeverity, RawEnvelope, ResponseEnvelope,
    SCRIPT_ARGS_VAR, SCRIPT_LOGGER_VAR, to_camel_case_json,
};
use crate::types::{InvocationStyle, LogMode};

/// Default seconds for the AppleScript `with timeout` block.
pub const DEFAULT_TIMEOUT: u32 = 1800;

/// Tracing target that log entries from the payload are replayed under.
pub const PAYLOAD_LOG_TARGET: &str = "adobe_bridge::payload";

/// A scriptable Adobe application and the payload run inside it.
///
/// ```no_run
/// # async fn demo() -> adobe_bridge::errors::Result<()> {
/// use adobe_bridge::Application;
/// use serde_json::{Value, json};
///
/// let echoed: Value = Application::new("Adobe InDesign CC 2014")
///     .payload("bridge_test.jsx")
///     .invoke("echo", &json!({ "x": 1 }))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Application<R: ScriptRunner = OsascriptRunner> {
    name: String,
    timeout: u32,
    payload: Option<String>,
    runner: R,
    scripts: ScriptCollection,
    staging_dir: Option<PathBuf>,
    fs: Arc<dyn FileSystem>,
    encoding: EncodingOptions,
    invocation: Option<InvocationStyle>,
    log_mode: LogMode,
}

impl Application<OsascriptRunner> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timeout: DEFAULT_TIMEOUT,
            payload: None,
            runner: OsascriptRunner::default(),
            scripts: ScriptCollection::embedded(),
            staging_dir: None,
            fs: Arc::new(RealFileSystem),
            encoding: EncodingOptions::default(),
            invocation: None,
            log_mode: LogMode::Array,
        }
    }

    /// Build an application from validated configuration, loading the
    /// configured payload directory if any.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        let mut scripts = ScriptCollection::embedded();
        if let Some(dir) = &config.scripts.dir {
            let loaded = scripts.load_dir(&RealFileSystem, dir)?;
            debug!(dir = %dir.display(), loaded, "loaded payload directory");
        }

        let mut app = Application::new(config.application.name.clone())
            .timeout(config.application.timeout)
            .runner(OsascriptRunner::new(&config.interpreter.path))
            .scripts(scripts)
            .encoding(config.encoding);

        if let Some(payload) = &config.application.payload {
            app = app.payload(payload.clone());
        }
        if let Some(style) = config.application.invocation {
            app = app.invocation_style(style);
        }
        if let Some(dir) = &config.scripts.staging_dir {
            app = app.staging_dir(dir.clone());
        }
        Ok(app)
    }
}

impl<R: ScriptRunner> Application<R> {
    pub fn timeout(mut self, seconds: u32) -> Self {
        self.timeout = seconds;
        self
    }

    /// Payload file, by name within the script collection.
    pub fn payload(mut self, name: impl Into<String>) -> Self {
        self.payload = Some(name.into());
        self
    }

    /// Swap the script runner.
    pub fn runner<S: ScriptRunner>(self, runner: S) -> Application<S> {
        Application {
            name: self.name,
            timeout: self.timeout,
            payload: self.payload,
            runner,
            scripts: self.scripts,
            staging_dir: self.staging_dir,
            fs: self.fs,
            encoding: self.encoding,
            invocation: self.invocation,
            log_mode: self.log_mode,
        }
    }

    pub fn scripts(mut self, scripts: ScriptCollection) -> Self {
        self.scripts = scripts;
        self
    }

    /// Stage payload files into `dir` instead of a fresh temporary
    /// directory.
    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    /// Filesystem used for a fixed staging directory.
    pub fn filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn encoding(mut self, options: EncodingOptions) -> Self {
        self.encoding = options;
        self
    }

    pub fn invocation_style(mut self, style: InvocationStyle) -> Self {
        self.invocation = Some(style);
        self
    }

    pub fn log_mode(mut self, mode: LogMode) -> Self {
        self.log_mode = mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload_name(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn script_collection(&self) -> &ScriptCollection {
        &self.scripts
    }

    /// Stage the script collection for one call.
    pub fn stage(&self) -> Result<ScriptDir> {
        let dir = match &self.staging_dir {
            Some(dir) => ScriptDir::existing(dir.clone(), Arc::clone(&self.fs)),
            None => ScriptDir::temporary()?,
        };
        dir.populate(&self.scripts)?;
        Ok(dir)
    }

    /// The AppleScript that runs `function` from the payload at
    /// `payload_path`.
    pub fn build_script(&self, payload_path: &Path, function: &str, json_args: &str) -> ScriptBuilder {
        let mut builder = ScriptBuilder::new()
            .with_encoding(self.encoding)
            .tell(&self.name);
        if let Some(style) = self.invocation {
            builder = builder.invocation_style(style);
        }
        builder
            .timeout(self.timeout)
            .assign(FUNCTION_NAME_VAR, function)
            .assign(SCRIPT_ARGS_VAR, json_args)
            .assign(SCRIPT_LOGGER_VAR, self.log_mode.marker())
            .run_payload(
                &payload_path.to_string_lossy(),
                &[FUNCTION_NAME_VAR, SCRIPT_ARGS_VAR, SCRIPT_LOGGER_VAR],
            )
    }

    /// Stage the payload, run `function` with an already encoded JSON
    /// argument string and return the interpreter's stdout unparsed.
    pub async fn execute_raw(&self, function: &str, json_args: &str) -> Result<String> {
        let payload = self.payload.as_deref().ok_or_else(|| {
            BridgeError::Resource(format!("no payload file configured for {}", self.name))
        })?;
        debug!(application = %self.name, payload, function, "execute");

        let staged = self.stage()?;
        if !staged.has_file(payload) {
            return Err(BridgeError::Resource(format!(
                "payload {payload} not found in {:?}",
                staged.dir()
            )));
        }

        let script = self
            .build_script(&staged.script(payload), function, json_args)
            .render();
        let result = self.runner.run_script(&script).await?;

        // `staged` lives until the interpreter is done with the payload.
        drop(staged);
        result.into_stdout()
    }

    /// Like [`Application::execute_raw`], serializing `args` with
    /// camelCase keys first.
    pub async fn execute<A: Serialize + ?Sized>(&self, function: &str, args: &A) -> Result<String> {
        let json_args = to_camel_case_json(args)?;
        self.execute_raw(function, &json_args).await
    }

    /// Run `function` and return its untyped result.
    ///
    /// Log entries from the payload are replayed before a failure is
    /// reported.
    pub async fn invoke_value<A: Serialize + ?Sized>(&self, function: &str, args: &A) -> Result<Value> {
        let stdout = self.execute(function, args).await?;
        self.finish(stdout)
    }

    /// Run `function` and convert its result into `T`.
    pub async fn invoke<T, A>(&self, function: &str, args: &A) -> Result<T>
    where
        T: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        let value = self.invoke_value(function, args).await?;
        convert_result(value)
    }

    /// Run an explicit call descriptor.
    pub async fn call<T: DeserializeOwned>(&self, call: &FunctionCall) -> Result<T> {
        let json_args = call.argument_json()?;
        let stdout = self.execute_raw(&call.function, &json_args).await?;
        convert_result(self.finish(stdout)?)
    }

    fn finish(&self, stdout: String) -> Result<Value> {
        let raw = RawEnvelope::parse(&stdout)?;
        // Replayed before the envelope is validated so a malformed failure
        // still leaves its diagnostics behind.
        replay_log(&raw.log);
        let value = ResponseEnvelope::try_from(raw)?.into_result()?;
        debug!(application = %self.name, result = %value, "call succeeded");
        Ok(value)
    }
}

/// Decode the interpreter's stdout into an envelope.
pub fn parse_response(stdout: &str) -> Result<ResponseEnvelope> {
    ResponseEnvelope::parse(stdout)
}

/// Emit every payload log entry as a tracing event, in order.
pub fn replay_log(entries: &[LogEntry]) {
    for entry in entries {
        let message = entry.message.as_str();
        match entry.severity {
            LogSeverity::Debug => debug!(target: PAYLOAD_LOG_TARGET, "{message}"),
            LogSeverity::Info => info!(target: PAYLOAD_LOG_TARGET, "{message}"),
            LogSeverity::Warn => warn!(target: PAYLOAD_LOG_TARGET, "{message}"),
            LogSeverity::Error => error!(target: PAYLOAD_LOG_TARGET, "{message}"),
        }
    }
}

fn convert_result<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        BridgeError::Protocol(format!("result does not have the expected shape: {e}"))
    })
}
