// src/exec/osascript.rs

//! Running scripts through `osascript`.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::applescript::mac_roman;
use crate::errors::{BridgeError, Result};
use crate::exec::backend::{ProcessResult, ScriptRunner};

/// Default location of the AppleScript interpreter.
pub const OSASCRIPT: &str = "/usr/bin/osascript";

/// Runs scripts by piping them into an interpreter process.
///
/// The interpreter is started with `-` so it reads the script from stdin.
/// Stdin gets the script in Mac OS Roman; stdout and stderr are read as
/// UTF-8.
#[derive(Debug, Clone)]
pub struct OsascriptRunner {
    interpreter: PathBuf,
}

impl OsascriptRunner {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Run `script` and return its stdout, failing on a nonzero exit.
    pub async fn run(&self, script: &str) -> Result<String> {
        self.execute(script).await?.into_stdout()
    }

    /// Run `script` and capture exit code, stdout and stderr.
    ///
    /// Writing stdin and draining both output pipes happen concurrently; the
    /// child could otherwise block on a full pipe while we block on another.
    pub async fn execute(&self, script: &str) -> Result<ProcessResult> {
        let input = mac_roman::encode(script)?;

        debug!(
            interpreter = %self.interpreter.display(),
            bytes = input.len(),
            "starting interpreter"
        );

        let mut child = Command::new(&self.interpreter)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawning interpreter {:?}", self.interpreter))?;

        let mut stdin = child.stdin.take().context("interpreter stdin not captured")?;
        let stdout = child.stdout.take().context("interpreter stdout not captured")?;
        let stderr = child.stderr.take().context("interpreter stderr not captured")?;

        let write_input = async move {
            let written = stdin.write_all(&input).await;
            // Dropping stdin closes the pipe and signals end of script.
            drop(stdin);
            written
        };

        let (written, out, err) =
            tokio::join!(write_input, read_all(stdout), read_all(stderr));

        if let Err(e) = written {
            if e.kind() == io::ErrorKind::BrokenPipe {
                warn!("interpreter closed stdin before the script was fully written");
            } else {
                return Err(BridgeError::IoError(e));
            }
        }
        let out = out?;
        let err = err?;

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for interpreter {:?}", self.interpreter))?;
        let exit_code = status.code().unwrap_or(-1);

        info!(
            exit_code,
            stdout_bytes = out.len(),
            stderr_bytes = err.len(),
            "interpreter exited"
        );

        // Stdout of a failed run is never inspected, so it is not decoded.
        let stdout = if exit_code == 0 {
            String::from_utf8(out).map_err(|e| {
                BridgeError::Protocol(format!("interpreter stdout is not UTF-8: {e}"))
            })?
        } else {
            String::from_utf8_lossy(&out).into_owned()
        };
        let stderr = String::from_utf8_lossy(&err).into_owned();

        Ok(ProcessResult {
            exit_code,
            stdout,
            stderr,
        })
    }
}

impl Default for OsascriptRunner {
    fn default() -> Self {
        Self::new(OSASCRIPT)
    }
}

impl ScriptRunner for OsascriptRunner {
    fn run_script<'a>(
        &'a self,
        script: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessResult>> + Send + 'a>> {
        Box::pin(self.execute(script))
    }
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}
