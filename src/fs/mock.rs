// src/fs/mock.rs

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow};

use super::FileSystem;

#[derive(Debug, Default)]
struct Tree {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
}

impl Tree {
    fn add_dir(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

/// In-memory filesystem. Clones share the same tree.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    tree: Arc<Mutex<Tree>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut tree = self.lock();
        if let Some(parent) = path.parent() {
            tree.add_dir(parent);
        }
        tree.files.insert(path.to_path_buf(), content.into());
    }

    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tree> {
        // A panicking test thread cannot leave the tree half-updated.
        self.tree.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let tree = self.lock();
        match tree.files.get(path) {
            Some(content) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            None if tree.dirs.contains(path) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.add_file(path, contents);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.lock().add_dir(path);
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.lock().files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.lock().dirs.contains(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let tree = self.lock();
        if !tree.dirs.contains(path) {
            return Err(anyhow!("Not a directory or not found: {:?}", path));
        }
        let children: BTreeSet<PathBuf> = tree
            .files
            .keys()
            .chain(tree.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        Ok(children.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_create_their_parent_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("/jsx/lib/util.jsx", "var x;");
        assert!(fs.is_dir(Path::new("/jsx")));
        assert!(fs.is_dir(Path::new("/jsx/lib")));
        assert!(fs.is_file(Path::new("/jsx/lib/util.jsx")));
        assert_eq!(
            fs.read_dir(Path::new("/jsx")).unwrap(),
            vec![PathBuf::from("/jsx/lib")]
        );
    }

    #[test]
    fn reading_a_directory_fails() {
        let fs = MockFileSystem::new();
        fs.create_dir_all(Path::new("/stage")).unwrap();
        assert!(fs.read_to_string(Path::new("/stage")).is_err());
        assert!(fs.read_dir(Path::new("/missing")).is_err());
    }
}
