// src/lib.rs

pub mod applescript;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod payload;
pub mod protocol;
pub mod types;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{debug, info};

pub use crate::bridge::Application;
pub use crate::errors::BridgeError;
pub use crate::protocol::FunctionCall;

use crate::cli::CliArgs;
use crate::config::{BridgeConfig, load_or_default};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - payload listing / showing
/// - a single raw or decoded function call
pub async fn run(args: CliArgs) -> Result<()> {
    let started = Instant::now();

    let mut config = load_or_default(args.config.as_deref())?;
    apply_overrides(&mut config, &args)?;
    let app = Application::from_config(&config)?;

    if args.list {
        for name in app.script_collection().files() {
            println!("{name}");
        }
    } else if args.show {
        let name = args.javascript.as_deref().unwrap_or_default();
        let content = app
            .script_collection()
            .get(name)
            .ok_or_else(|| BridgeError::Resource(format!("no payload script named {name}")))?;
        println!("{content}");
    } else if let Some(function) = args.function.as_deref() {
        let payload = args
            .javascript
            .clone()
            .or_else(|| config.application.payload.clone())
            .context("no payload script given; use --javascript or [application].payload")?;
        let app = app.payload(payload.clone());

        if args.print_script {
            let (script, dir) = printable_script(&app, &payload, function, &args.args)?;
            info!(dir = %dir.display(), "payload staged for the printed script");
            print!("{script}");
        } else if args.run {
            let value: Value =
                serde_json::from_str(&args.args).context("--args is not valid JSON")?;
            let result = app.invoke_value(function, &value).await?;
            println!("Result: {result}");
        } else {
            let stdout = app.execute_raw(function, &args.args).await?;
            println!("{}", stdout.trim_end());
        }
    } else if args.run {
        bail!("please specify a function to run (--function)");
    } else {
        info!("nothing to do; see --help");
    }

    if args.time {
        println!("Elapsed Time: {}ms", started.elapsed().as_millis());
    }

    debug!("done");
    Ok(())
}

/// Render the script for `function` against a staged payload directory
/// that is kept on disk, so the printed script can be run by hand.
fn printable_script(
    app: &Application,
    payload: &str,
    function: &str,
    json_args: &str,
) -> Result<(String, PathBuf)> {
    let staged = app.stage()?;
    let script = app
        .build_script(&staged.script(payload), function, json_args)
        .render();
    Ok((script, staged.keep()))
}

/// Apply `--app` and `--timeout` on top of the loaded configuration.
fn apply_overrides(config: &mut BridgeConfig, args: &CliArgs) -> Result<()> {
    if let Some(name) = &args.app {
        if name.trim().is_empty() {
            bail!(BridgeError::ConfigError("--app must not be empty".to_string()));
        }
        config.application.name = name.clone();
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            bail!(BridgeError::ConfigError("--timeout must be >= 1 (got 0)".to_string()));
        }
        config.application.timeout = timeout;
    }
    Ok(())
}
