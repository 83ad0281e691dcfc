// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - `model.rs`: the TOML-backed data model and the validated `BridgeConfig`.
//! - `loader.rs`: reading a config file from disk.
//! - `validate.rs`: `RawConfigFile -> BridgeConfig` with basic sanity checks.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    ApplicationSection, BridgeConfig, EncodingSection, InterpreterSection, RawConfigFile,
    ScriptsSection,
};
