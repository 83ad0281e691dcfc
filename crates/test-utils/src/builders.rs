#![allow(dead_code)]

use std::path::Path;

use adobe_bridge::config::{BridgeConfig, RawConfigFile};
use adobe_bridge::types::InvocationStyle;

/// Builder for `BridgeConfig` to simplify test setup.
pub struct BridgeConfigBuilder {
    config: RawConfigFile,
}

impl BridgeConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn application(mut self, name: &str) -> Self {
        self.config.application.name = name.to_string();
        self
    }

    pub fn timeout(mut self, seconds: u32) -> Self {
        self.config.application.timeout = seconds;
        self
    }

    pub fn payload(mut self, name: &str) -> Self {
        self.config.application.payload = Some(name.to_string());
        self
    }

    pub fn invocation(mut self, style: InvocationStyle) -> Self {
        self.config.application.invocation = Some(style);
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.encoding.chunk_size = size;
        self
    }

    pub fn scripts_dir(mut self, dir: &Path) -> Self {
        self.config.scripts.dir = Some(dir.to_path_buf());
        self
    }

    pub fn staging_dir(mut self, dir: &Path) -> Self {
        self.config.scripts.staging_dir = Some(dir.to_path_buf());
        self
    }

    /// The raw, unvalidated model.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> BridgeConfig {
        BridgeConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for BridgeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
