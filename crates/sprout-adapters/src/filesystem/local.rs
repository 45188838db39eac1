//! Local filesystem adapter using `std::fs`.

use std::io;
use std::path::Path;

use sprout_core::{
    application::ports::Filesystem,
    error::{SproutError, SproutResult},
};
use tracing::trace;

/// Production filesystem implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> SproutResult<()> {
        trace!(path = %path.display(), "create_dir_all");
        std::fs::create_dir_all(path).map_err(|e| fs_error(path, &e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> SproutResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "write_file");
        std::fs::write(path, content).map_err(|e| fs_error(path, &e, "write file"))
    }

    #[cfg(unix)]
    fn set_permissions(&self, path: &Path, executable: bool) -> SproutResult<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = std::fs::metadata(path)
            .map_err(|e| fs_error(path, &e, "read metadata"))?
            .permissions();
        let mode = if executable {
            perms.mode() | 0o111
        } else {
            perms.mode() & !0o111
        };
        perms.set_mode(mode);
        std::fs::set_permissions(path, perms).map_err(|e| fs_error(path, &e, "set permissions"))
    }

    // no executable bit outside unix
    #[cfg(not(unix))]
    fn set_permissions(&self, _path: &Path, _executable: bool) -> SproutResult<()> {
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn remove_dir_all(&self, path: &Path) -> SproutResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| fs_error(path, &e, "remove directory"))
    }
}

fn fs_error(path: &Path, err: &io::Error, operation: &str) -> SproutError {
    SproutError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {err}"),
    }
}
