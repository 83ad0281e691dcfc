// src/payload/collection.rs

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::errors::{BridgeError, Result};
use crate::fs::FileSystem;

/// The dispatcher every payload includes.
pub const DISPATCHER: &str = "dispatcher.jsx";
/// Functions for checking the bridge against a live application.
pub const BRIDGE_TEST: &str = "bridge_test.jsx";

const EMBEDDED: &[(&str, &str)] = &[
    (DISPATCHER, include_str!("../../payload/dispatcher.jsx")),
    (BRIDGE_TEST, include_str!("../../payload/bridge_test.jsx")),
];

const SCRIPT_EXTENSIONS: &[&str] = &["jsx", "js", "jsxinc"];

/// Payload scripts by file name.
///
/// Starts from the scripts compiled into the binary; directories loaded
/// later add to them and win on name clashes.
#[derive(Debug, Clone, Default)]
pub struct ScriptCollection {
    scripts: BTreeMap<String, String>,
}

impl ScriptCollection {
    /// A collection without any scripts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The scripts shipped with the crate.
    pub fn embedded() -> Self {
        let scripts = EMBEDDED
            .iter()
            .map(|(name, content)| (name.to_string(), content.to_string()))
            .collect();
        Self { scripts }
    }

    /// Add every script file directly inside `dir`. Returns how many were
    /// loaded.
    pub fn load_dir(&mut self, fs: &dyn FileSystem, dir: &Path) -> Result<usize> {
        if !fs.is_dir(dir) {
            return Err(BridgeError::Resource(format!(
                "payload directory {:?} does not exist",
                dir
            )));
        }

        let mut loaded = 0;
        for path in fs.read_dir(dir)? {
            let is_script = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| SCRIPT_EXTENSIONS.contains(&e));
            if !is_script || !fs.is_file(&path) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let content = fs.read_to_string(&path)?;
            debug!(script = name, dir = %dir.display(), "loaded payload script");
            self.scripts.insert(name.to_string(), content);
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.scripts.insert(name.into(), content.into());
    }

    /// File names in the collection, sorted.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.scripts.get(name).map(String::as_str)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}
