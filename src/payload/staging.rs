// src/payload/staging.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tracing::debug;

use crate::errors::{BridgeError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::payload::collection::ScriptCollection;

/// Directory the target application loads payload files from.
///
/// Either a fresh temporary directory, removed when the `ScriptDir` is
/// dropped, or an existing directory that is left in place.
#[derive(Debug)]
pub struct ScriptDir {
    dir: PathBuf,
    fs: Arc<dyn FileSystem>,
    temp: Option<TempDir>,
}

impl ScriptDir {
    /// Create a new temporary directory on the real filesystem.
    pub fn temporary() -> Result<Self> {
        let temp = tempfile::Builder::new().prefix("adobe-bridge-").tempdir()?;
        debug!(dir = %temp.path().display(), "created staging directory");
        Ok(Self {
            dir: temp.path().to_path_buf(),
            fs: Arc::new(RealFileSystem),
            temp: Some(temp),
        })
    }

    /// Use an existing directory.
    pub fn existing(dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dir: dir.into(),
            fs,
            temp: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Give up ownership of the directory so it survives this `ScriptDir`.
    pub fn keep(self) -> PathBuf {
        match self.temp {
            Some(temp) => temp.keep(),
            None => self.dir,
        }
    }

    /// Write every script of `collection` into the directory.
    pub fn populate(&self, collection: &ScriptCollection) -> Result<()> {
        self.fs.create_dir_all(&self.dir)?;
        for name in collection.files() {
            if let Some(content) = collection.get(name) {
                self.put_file(name, content)?;
            }
        }
        debug!(dir = %self.dir.display(), scripts = collection.len(), "staged payload scripts");
        Ok(())
    }

    /// Full path of `name` inside the directory.
    pub fn script(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.fs.is_file(&self.script(name))
    }

    pub fn get_file(&self, name: &str) -> Result<String> {
        if !self.has_file(name) {
            return Err(BridgeError::Resource(format!(
                "{name} is not staged in {:?}",
                self.dir
            )));
        }
        Ok(self.fs.read_to_string(&self.script(name))?)
    }

    pub fn put_file(&self, name: &str, content: &str) -> Result<()> {
        Ok(self.fs.write(&self.script(name), content.as_bytes())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::payload::collection::{BRIDGE_TEST, DISPATCHER};

    #[test]
    fn temporary_dir_is_removed_on_drop() {
        let staged = ScriptDir::temporary().unwrap();
        let path = staged.dir().to_path_buf();
        staged.put_file("a.jsx", "// a").unwrap();
        assert!(path.join("a.jsx").is_file());

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn kept_temporary_dir_outlives_the_handle() {
        let staged = ScriptDir::temporary().unwrap();
        staged.put_file("a.jsx", "// a").unwrap();

        let path = staged.keep();
        assert!(path.join("a.jsx").is_file());
        std::fs::remove_dir_all(&path).unwrap();
    }

    #[test]
    fn existing_dir_is_populated_through_the_filesystem() {
        let fs = MockFileSystem::new();
        let staged = ScriptDir::existing("/stage", Arc::new(fs.clone()));

        staged.populate(&ScriptCollection::embedded()).unwrap();

        assert!(!staged.is_temporary());
        assert!(staged.has_file(DISPATCHER));
        assert!(staged.has_file(BRIDGE_TEST));
        assert_eq!(staged.script(BRIDGE_TEST), PathBuf::from("/stage/bridge_test.jsx"));
        assert_eq!(fs.file_count(), 2);
    }

    #[test]
    fn unstaged_file_is_a_resource_error() {
        let staged = ScriptDir::existing("/stage", Arc::new(MockFileSystem::new()));
        assert!(matches!(
            staged.get_file("missing.jsx"),
            Err(BridgeError::Resource(_))
        ));
    }
}
