use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, LazyLock, Mutex};

use regex::Regex;
use serde_json::{Value, json};

use adobe_bridge::applescript::{EncodedLiteral, mac_roman};
use adobe_bridge::dispatch::Dispatcher;
use adobe_bridge::errors::Result;
use adobe_bridge::exec::{ProcessResult, ScriptRunner};
use adobe_bridge::protocol::ExceptionInfo;
use adobe_bridge::types::LogMode;

static SET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^set (\w+) to (.+)$").expect("valid regex"));
static INVOKE_ARGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"with arguments \{ ([^}]*) \}").expect("valid regex"));
static POSIX_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"POSIX file "([^"]*)""#).expect("valid regex"));
static EVAL_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\.evalFile\('([^']*)'\)").expect("valid regex"));

#[derive(Debug, Clone)]
enum Behaviour {
    Dispatch,
    Exit { exit_code: i32, stderr: String },
    Stdout(String),
}

/// A `ScriptRunner` standing in for `osascript` plus the target
/// application:
/// - records every script it is given
/// - reconstructs the `set` variables, including chunked `&` appends
/// - checks the payload file named by the invocation exists
/// - runs the call through a Rust [`Dispatcher`] and prints its envelope.
///
/// It can also pretend the interpreter failed, or print arbitrary stdout.
#[derive(Clone)]
pub struct FakeInterpreter {
    dispatcher: Arc<Dispatcher>,
    behaviour: Behaviour,
    scripts: Arc<Mutex<Vec<String>>>,
}

impl FakeInterpreter {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            behaviour: Behaviour::Dispatch,
            scripts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Dispatcher with the functions of `bridge_test.jsx`.
    pub fn bridge_test() -> Self {
        Self::new(bridge_test_dispatcher())
    }

    /// Exit with `exit_code` and `stderr`, printing `stdout` anyway.
    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        let mut fake = Self::bridge_test();
        fake.behaviour = Behaviour::Exit {
            exit_code,
            stderr: stderr.to_string(),
        };
        fake
    }

    /// Exit 0 with `stdout`, whatever the script says.
    pub fn printing(stdout: &str) -> Self {
        let mut fake = Self::bridge_test();
        fake.behaviour = Behaviour::Stdout(stdout.to_string());
        fake
    }

    /// Shared handle to the recorded scripts.
    pub fn scripts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.scripts)
    }

    pub fn script_count(&self) -> usize {
        self.scripts.lock().unwrap().len()
    }

    pub fn last_script(&self) -> Option<String> {
        self.scripts.lock().unwrap().last().cloned()
    }

    fn interpret(&self, script: &str) -> Result<ProcessResult> {
        // Same input restriction as the real runner.
        mac_roman::encode(script)?;
        self.scripts.lock().unwrap().push(script.to_string());

        match &self.behaviour {
            Behaviour::Exit { exit_code, stderr } => {
                return Ok(ProcessResult {
                    exit_code: *exit_code,
                    stdout: "{\"success\":true}".to_string(),
                    stderr: stderr.clone(),
                });
            }
            Behaviour::Stdout(stdout) => return Ok(ProcessResult::success(stdout.clone())),
            Behaviour::Dispatch => {}
        }

        let call = match parse_script(script) {
            Ok(call) => call,
            Err(message) => return Ok(ProcessResult::failure(1, message)),
        };

        if !Path::new(&call.payload).is_file() {
            return Ok(ProcessResult::failure(
                1,
                format!("File {} wasn't found. (-43)", call.payload),
            ));
        }

        let log_mode: LogMode = call
            .log_mode
            .as_deref()
            .unwrap_or_default()
            .parse()
            .unwrap_or_default();
        let envelope = self.dispatcher.dispatch(
            call.function.as_deref(),
            call.json_args.as_deref(),
            log_mode,
        );
        Ok(ProcessResult::success(format!("{}\n", envelope.to_json()?)))
    }
}

impl ScriptRunner for FakeInterpreter {
    fn run_script<'a>(
        &'a self,
        script: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessResult>> + Send + 'a>> {
        Box::pin(async move { self.interpret(script) })
    }
}

impl std::fmt::Debug for FakeInterpreter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeInterpreter")
            .field("dispatcher", &self.dispatcher)
            .field("behaviour", &self.behaviour)
            .finish()
    }
}

/// What the script asked the application to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCall {
    pub payload: String,
    pub function: Option<String>,
    pub json_args: Option<String>,
    pub log_mode: Option<String>,
    pub variables: HashMap<String, String>,
}

/// Replay the `set` statements of `script` and resolve the invocation's
/// arguments.
pub fn parse_script(script: &str) -> std::result::Result<ParsedCall, String> {
    let mut variables: HashMap<String, String> = HashMap::new();

    for line in script.lines() {
        let line = line.trim();

        if let Some(caps) = SET_LINE.captures(line) {
            let name = caps[1].to_string();
            let rhs = &caps[2];
            let append_prefix = format!("{name} & ");

            let value = if let Some(chunk) = rhs.strip_prefix(&append_prefix) {
                let previous = variables
                    .get(&name)
                    .ok_or_else(|| format!("The variable {name} is not defined."))?;
                format!("{previous}{}", literal_text(chunk)?)
            } else if rhs.parse::<i64>().is_ok() {
                rhs.to_string()
            } else {
                literal_text(rhs)?
            };
            variables.insert(name, value);
            continue;
        }

        if line.starts_with("do script") || line.starts_with("do javascript") {
            let payload = POSIX_FILE
                .captures(line)
                .or_else(|| EVAL_FILE.captures(line))
                .map(|caps| caps[1].to_string())
                .ok_or_else(|| format!("no payload file in: {line}"))?;

            let names: Vec<&str> = INVOKE_ARGS
                .captures(line)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().split(", ").collect())
                .unwrap_or_default();

            let mut resolved = Vec::with_capacity(names.len());
            for name in names {
                let value = variables
                    .get(name)
                    .ok_or_else(|| format!("The variable {name} is not defined."))?;
                resolved.push(value.clone());
            }
            let mut args = resolved.into_iter();

            return Ok(ParsedCall {
                payload,
                function: args.next(),
                json_args: args.next(),
                log_mode: args.next(),
                variables,
            });
        }
    }

    Err("script never invokes a payload file".to_string())
}

fn literal_text(expr: &str) -> std::result::Result<String, String> {
    EncodedLiteral::parse(expr)
        .map(EncodedLiteral::into_text)
        .map_err(|e| e.to_string())
}

/// The functions of `bridge_test.jsx`, in Rust.
pub fn bridge_test_dispatcher() -> Dispatcher {
    Dispatcher::new()
        .register("main", |_, _| Ok(json!("main")))
        .register("echo", |args, _| Ok(args.clone()))
        .register("logger", |_, log| {
            log.debug("logger-debug test");
            log.info("logger-info test");
            log.warn("logger-warn test");
            log.error("logger-error test");
            Ok(Value::Null)
        })
        .register("croak", |_, _| {
            Err(ExceptionInfo {
                name: "Error".to_string(),
                description: "croak died".to_string(),
                line: Some(29),
                file_name: Some("bridge_test.jsx".to_string()),
            })
        })
}
