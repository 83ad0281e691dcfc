// src/dispatch/logger.rs

use crate::protocol::{LogEntry, LogSeverity};
use crate::types::LogMode;

/// Logger handed to every payload function during one dispatch.
///
/// In [`LogMode::Array`] entries are kept in call order and end up in the
/// response envelope; in [`LogMode::Discard`] they are dropped.
#[derive(Debug, Clone)]
pub struct ScriptLogger {
    mode: LogMode,
    entries: Vec<LogEntry>,
}

impl ScriptLogger {
    pub fn new(mode: LogMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    pub fn log(&mut self, severity: LogSeverity, message: impl Into<String>) {
        if self.mode == LogMode::Array {
            self.entries.push(LogEntry::new(severity, message));
        }
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.log(LogSeverity::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogSeverity::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(LogSeverity::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogSeverity::Error, message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}
