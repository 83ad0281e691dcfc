// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{BridgeConfig, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BridgeConfig> {
    let raw_config = load_from_path(&path)?;
    let config = BridgeConfig::try_from(raw_config)?;
    Ok(config)
}

/// Resolve the configuration used by the CLI.
///
/// - An explicit path must exist and be valid.
/// - Without one, [`default_config_path`] is used if it exists.
/// - Otherwise built-in defaults apply.
pub fn load_or_default(explicit: Option<&Path>) -> Result<BridgeConfig> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading config");
        return load_and_validate(path);
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        debug!(path = %default_path.display(), "loading default config");
        return load_and_validate(&default_path);
    }

    debug!("no config file, using defaults");
    Ok(BridgeConfig::default())
}

/// `AdobeBridge.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("AdobeBridge.toml")
}
