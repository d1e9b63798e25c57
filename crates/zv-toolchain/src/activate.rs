//! Active-version management via the `current` symlink.
//!
//! The link is replaced by creating a symlink under a temporary name and
//! renaming it over `current`, so there is no observable window in which
//! the pointer is absent or broken.

use crate::root::{CURRENT_LINK, ZvRoot, ensure_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use zv_core::{Error, Result};

/// Owns the `current` symlink inside the versions directory.
#[derive(Debug, Clone)]
pub struct Activator {
    versions_dir: PathBuf,
}

impl Activator {
    /// Create an activator for a root.
    pub fn new(root: &ZvRoot) -> Self {
        Self {
            versions_dir: root.versions_dir(),
        }
    }

    /// Path of the `current` symlink.
    pub fn current_link(&self) -> PathBuf {
        self.versions_dir.join(CURRENT_LINK)
    }

    /// Point `current` at an installed version directory.
    pub fn activate(&self, version_dir: &Path) -> Result<()> {
        ensure_dir(&self.versions_dir)?;

        let target = if version_dir.is_absolute() {
            version_dir.to_path_buf()
        } else {
            fs::canonicalize(version_dir)
                .map_err(|e| Error::io_at("failed to resolve version directory", version_dir, e))?
        };
        if !target.is_dir() {
            return Err(Error::config(format!(
                "not an installed version directory: {}",
                target.display()
            )));
        }

        let link = self.current_link();
        let staged = self
            .versions_dir
            .join(format!(".{}.{}", CURRENT_LINK, std::process::id()));
        let _ = fs::remove_file(&staged);

        symlink_dir(&target, &staged)
            .map_err(|e| Error::io_at("failed to create symlink", &staged, e))?;

        // Renaming over an existing symlink is atomic on Unix; Windows
        // needs the old link removed first.
        #[cfg(windows)]
        let _ = fs::remove_file(&link);

        fs::rename(&staged, &link).map_err(|e| {
            let _ = fs::remove_file(&staged);
            Error::io_at("failed to update current symlink", &link, e)
        })?;

        debug!("current -> {}", target.display());
        Ok(())
    }

    /// Label of the currently active version, if any.
    pub fn current(&self) -> Option<String> {
        self.current_path()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
    }

    /// Target path of the `current` symlink, if any.
    pub fn current_path(&self) -> Option<PathBuf> {
        fs::read_link(self.current_link()).ok()
    }

    /// Remove the `current` symlink.
    ///
    /// Returns false if no link existed.
    pub fn deactivate(&self) -> Result<bool> {
        let link = self.current_link();
        match fs::symlink_metadata(&link) {
            Ok(_) => {
                fs::remove_file(&link)
                    .map_err(|e| Error::io_at("failed to remove current symlink", &link, e))?;
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io_at("failed to read current symlink", &link, e)),
        }
    }
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
