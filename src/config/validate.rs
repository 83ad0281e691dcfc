// src/config/validate.rs

use crate::config::model::{BridgeConfig, RawConfigFile};
use crate::errors::{BridgeError, Result};

impl TryFrom<RawConfigFile> for BridgeConfig {
    type Error = crate::errors::BridgeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(BridgeConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_application(cfg)?;
    validate_encoding(cfg)?;
    Ok(())
}

fn validate_application(cfg: &RawConfigFile) -> Result<()> {
    if cfg.application.name.trim().is_empty() {
        return Err(BridgeError::ConfigError(
            "[application].name must not be empty".to_string(),
        ));
    }

    if cfg.application.timeout == 0 {
        return Err(BridgeError::ConfigError(
            "[application].timeout must be >= 1 (got 0)".to_string(),
        ));
    }

    if let Some(payload) = cfg.application.payload.as_deref() {
        if payload.trim().is_empty() {
            return Err(BridgeError::ConfigError(
                "[application].payload must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_encoding(cfg: &RawConfigFile) -> Result<()> {
    let sizes = [
        ("literal_max_len", cfg.encoding.literal_max_len),
        ("single_literal_max_len", cfg.encoding.single_literal_max_len),
        ("chunk_size", cfg.encoding.chunk_size),
    ];

    for (key, value) in sizes {
        if value == 0 {
            return Err(BridgeError::ConfigError(format!(
                "[encoding].{key} must be >= 1 (got 0)"
            )));
        }
    }

    Ok(())
}
