// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::applescript::EncodingOptions;
use crate::exec::OSASCRIPT;
use crate::types::InvocationStyle;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [application]
/// name = "Adobe InDesign CC 2014"
/// timeout = 1800
/// payload = "bridge_test.jsx"
///
/// [interpreter]
/// path = "/usr/bin/osascript"
///
/// [encoding]
/// chunk_size = 40
///
/// [scripts]
/// dir = "jsx"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub application: ApplicationSection,

    #[serde(default)]
    pub interpreter: InterpreterSection,

    #[serde(default)]
    pub encoding: EncodingSection,

    #[serde(default)]
    pub scripts: ScriptsSection,
}

/// `[application]` section: which application to drive and how.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationSection {
    /// AppleScript application name, e.g. `"Adobe Illustrator"`.
    #[serde(default = "default_application_name")]
    pub name: String,

    /// Seconds for the AppleScript `with timeout` block.
    #[serde(default = "default_timeout")]
    pub timeout: u32,

    /// Payload file run by default.
    #[serde(default)]
    pub payload: Option<String>,

    /// Overrides the style derived from the application name.
    #[serde(default)]
    pub invocation: Option<InvocationStyle>,
}

pub fn default_application_name() -> String {
    "Adobe InDesign CC 2014".to_string()
}

pub fn default_timeout() -> u32 {
    1800
}

impl Default for ApplicationSection {
    fn default() -> Self {
        Self {
            name: default_application_name(),
            timeout: default_timeout(),
            payload: None,
            invocation: None,
        }
    }
}

/// `[interpreter]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterpreterSection {
    #[serde(default = "default_interpreter_path")]
    pub path: PathBuf,
}

fn default_interpreter_path() -> PathBuf {
    PathBuf::from(OSASCRIPT)
}

impl Default for InterpreterSection {
    fn default() -> Self {
        Self {
            path: default_interpreter_path(),
        }
    }
}

/// `[encoding]` section: thresholds for string literals in the generated
/// script.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncodingSection {
    #[serde(default = "default_literal_max_len")]
    pub literal_max_len: usize,

    #[serde(default = "default_single_literal_max_len")]
    pub single_literal_max_len: usize,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_literal_max_len() -> usize {
    EncodingOptions::default().literal_max_len
}

fn default_single_literal_max_len() -> usize {
    EncodingOptions::default().single_literal_max_len
}

fn default_chunk_size() -> usize {
    EncodingOptions::default().chunk_size
}

impl Default for EncodingSection {
    fn default() -> Self {
        Self {
            literal_max_len: default_literal_max_len(),
            single_literal_max_len: default_single_literal_max_len(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl From<&EncodingSection> for EncodingOptions {
    fn from(section: &EncodingSection) -> Self {
        EncodingOptions {
            literal_max_len: section.literal_max_len,
            single_literal_max_len: section.single_literal_max_len,
            chunk_size: section.chunk_size,
        }
    }
}

/// `[scripts]` section: where payload files come from and where they are
/// staged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptsSection {
    /// Extra payload directory merged over the embedded scripts.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Fixed staging directory. A temporary one is used when unset.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`)
/// or [`BridgeConfig::default`].
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub application: ApplicationSection,
    pub interpreter: InterpreterSection,
    pub encoding: EncodingOptions,
    pub scripts: ScriptsSection,
}

impl BridgeConfig {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            encoding: EncodingOptions::from(&raw.encoding),
            application: raw.application,
            interpreter: raw.interpreter,
            scripts: raw.scripts,
        }
    }

    /// Invocation style: the configured override, otherwise derived from
    /// the application name.
    pub fn invocation_style(&self) -> InvocationStyle {
        self.application
            .invocation
            .unwrap_or_else(|| InvocationStyle::for_application(&self.application.name))
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}
