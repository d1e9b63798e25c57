//! The zv root directory.
//!
//! All on-disk state lives under a single root (`~/.zv` by default):
//! `versions/<label>/` for installed releases, `versions/current` for the
//! active-version symlink, and `cache/` for downloaded archives. The root
//! is resolved once and passed explicitly to every component.

use std::path::{Path, PathBuf};
use tracing::debug;
use zv_core::{EnvVars, Error, Result};

/// Name of the active-version symlink inside the versions directory.
pub const CURRENT_LINK: &str = "current";

/// Resolved root directory for all zv state.
#[derive(Debug, Clone)]
pub struct ZvRoot {
    root: PathBuf,
}

impl ZvRoot {
    /// Resolve the root from `ZV_ROOT` or fall back to `~/.zv`.
    pub fn from_env() -> Result<Self> {
        if let Ok(dir) = std::env::var(EnvVars::ZV_ROOT) {
            return Ok(Self::at(dir));
        }
        let home = dirs_next::home_dir()
            .ok_or_else(|| Error::config("could not determine home directory"))?;
        Ok(Self::at(home.join(".zv")))
    }

    /// Use an explicit root path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { root: path.into() }
    }

    /// The root path itself.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Directory holding one subdirectory per installed version.
    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    /// Directory holding downloaded archives.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    /// Directory for transient extraction staging.
    pub fn staging_dir(&self) -> PathBuf {
        self.cache_dir().join("staging")
    }

    /// Path of the `current` symlink.
    pub fn current_link(&self) -> PathBuf {
        self.versions_dir().join(CURRENT_LINK)
    }
}

/// Ensure a directory exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        debug!("Creating directory: {}", path.display());
        std::fs::create_dir_all(path).map_err(|e| Error::Io {
            message: format!("failed to create directory: {}", path.display()),
            path: Some(path.to_path_buf()),
            source: e,
        })?;
    }
    Ok(())
}

/// Remove the download cache.
///
/// Returns false if there was nothing to remove.
pub fn clear_cache(root: &ZvRoot) -> Result<bool> {
    let cache_dir = root.cache_dir();
    if !cache_dir.exists() {
        return Ok(false);
    }
    debug!("Removing cache: {}", cache_dir.display());
    std::fs::remove_dir_all(&cache_dir).map_err(|e| Error::Io {
        message: "failed to remove cache".to_string(),
        path: Some(cache_dir),
        source: e,
    })?;
    Ok(true)
}
