//! In-memory filesystem adapter for tests and dry runs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use sprout_core::{
    application::ports::Filesystem,
    error::{SproutError, SproutResult},
};

/// A filesystem that lives in a map.
///
/// Clones share the same state, so a test can hand one clone to the service
/// and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
    read_only: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write below `path` fail.
    pub fn deny_writes(&self, path: impl Into<PathBuf>) {
        self.write().read_only.insert(path.into());
    }

    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.read().files.get(path).cloned()
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.read().executables.contains(path)
    }

    /// All files, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.read().files.keys().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> SproutResult<()> {
        let mut inner = self.write();
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.files.contains_key(&current) {
                return Err(SproutError::Filesystem {
                    path: current,
                    reason: "a file is in the way".into(),
                });
            }
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> SproutResult<()> {
        let mut inner = self.write();
        if inner.read_only.iter().any(|ro| path.starts_with(ro)) {
            return Err(SproutError::Filesystem {
                path: path.to_path_buf(),
                reason: "Permission denied".into(),
            });
        }
        let parent_missing = path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !inner.directories.contains(p));
        if parent_missing {
            return Err(SproutError::Filesystem {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            });
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> SproutResult<()> {
        let mut inner = self.write();
        if !inner.files.contains_key(path) {
            return Err(SproutError::Filesystem {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            });
        }
        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.read();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read().directories.contains(path)
    }

    fn remove_dir_all(&self, path: &Path) -> SproutResult<()> {
        let mut inner = self.write();
        if !inner.directories.contains(path) {
            return Err(SproutError::Filesystem {
                path: path.to_path_buf(),
                reason: "No such directory".into(),
            });
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));
        Ok(())
    }
}
