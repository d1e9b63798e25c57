//! Filesystem-backed registry of installed versions.

use crate::activate::Activator;
use crate::install::read_marker;
use crate::root::ZvRoot;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use zv_core::{Error, Fix, Result};

/// One installed version as reported by [`VersionStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    /// Directory name under `versions/` (an index key such as `0.11.0`
    /// or `master`).
    pub label: String,
    /// Concrete version from the release marker, when present.
    pub release_version: Option<String>,
    /// Whether the `current` symlink points at this version.
    pub current: bool,
}

/// Registry over the `versions/` directory tree.
#[derive(Debug, Clone)]
pub struct VersionStore {
    versions_dir: PathBuf,
    activator: Activator,
}

impl VersionStore {
    /// Create a store for a root.
    pub fn new(root: &ZvRoot) -> Self {
        Self {
            versions_dir: root.versions_dir(),
            activator: Activator::new(root),
        }
    }

    /// Directory of a version label (whether or not it is installed).
    pub fn version_dir(&self, label: &str) -> PathBuf {
        self.versions_dir.join(label)
    }

    /// Whether a version is installed.
    ///
    /// The `current` symlink is not an installed version.
    pub fn exists(&self, label: &str) -> bool {
        fs::symlink_metadata(self.version_dir(label))
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// List installed versions sorted by label, annotated with their
    /// concrete release version and whether they are active.
    pub fn list(&self) -> Result<Vec<InstalledVersion>> {
        if !self.versions_dir.exists() {
            return Ok(Vec::new());
        }

        let current = self.activator.current();
        let entries = fs::read_dir(&self.versions_dir)
            .map_err(|e| Error::io_at("failed to read versions directory", &self.versions_dir, e))?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::io_at("failed to read versions directory", &self.versions_dir, e)
            })?;
            let file_type = entry
                .file_type()
                .map_err(|e| Error::io_at("failed to stat entry", entry.path(), e))?;
            // Skip the current symlink and stray files
            if file_type.is_symlink() || !file_type.is_dir() {
                continue;
            }
            let label = entry.file_name().to_string_lossy().into_owned();
            versions.push(InstalledVersion {
                release_version: read_marker(&entry.path()),
                current: current.as_deref() == Some(label.as_str()),
                label,
            });
        }

        versions.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(versions)
    }

    /// Remove an installed version.
    ///
    /// Fails without touching the filesystem if the version is absent.
    /// A `current` symlink pointing at the removed version is removed
    /// with it rather than left dangling.
    pub fn remove(&self, label: &str) -> Result<()> {
        if !self.exists(label) {
            return Err(Error::VersionNotInstalled {
                version: label.to_string(),
                fixes: vec![Fix::with_command("See installed versions", "zv list")],
            });
        }

        let was_current = self.activator.current().as_deref() == Some(label);
        let dir = self.version_dir(label);
        fs::remove_dir_all(&dir)
            .map_err(|e| Error::io_at("failed to remove version", &dir, e))?;

        if was_current {
            self.activator.deactivate()?;
        }

        info!("Removed {}", label);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::RELEASE_MARKER;

    fn setup() -> (tempfile::TempDir, ZvRoot, VersionStore) {
        let temp = tempfile::tempdir().unwrap();
        let root = ZvRoot::at(temp.path());
        let store = VersionStore::new(&root);
        (temp, root, store)
    }

    fn add_version(root: &ZvRoot, label: &str, version: &str) {
        let dir = root.versions_dir().join(label);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(RELEASE_MARKER), version).unwrap();
    }

    #[test]
    fn test_list_empty_store() {
        let (_temp, _root, store) = setup();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_sorted_with_markers() {
        let (_temp, root, store) = setup();
        add_version(&root, "master", "0.12.0-dev.100+abcdef123");
        add_version(&root, "0.11.0", "0.11.0");

        let versions = store.list().unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].label, "0.11.0");
        assert_eq!(versions[1].label, "master");
        assert_eq!(
            versions[1].release_version.as_deref(),
            Some("0.12.0-dev.100+abcdef123")
        );
    }

    #[test]
    fn test_exists() {
        let (_temp, root, store) = setup();
        assert!(!store.exists("0.11.0"));
        add_version(&root, "0.11.0", "0.11.0");
        assert!(store.exists("0.11.0"));
    }

    #[test]
    fn test_remove_missing_version_mutates_nothing() {
        let (_temp, root, store) = setup();
        add_version(&root, "0.11.0", "0.11.0");

        let err = store.remove("0.10.0").unwrap_err();
        assert_eq!(err.code(), zv_core::ErrorCode::VersionNotInstalled);
        assert!(store.exists("0.11.0"));
    }

    #[test]
    fn test_remove() {
        let (_temp, root, store) = setup();
        add_version(&root, "0.11.0", "0.11.0");

        store.remove("0.11.0").unwrap();
        assert!(!store.exists("0.11.0"));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_excludes_current_link_and_annotates() {
        let (_temp, root, store) = setup();
        add_version(&root, "0.11.0", "0.11.0");
        add_version(&root, "0.10.0", "0.10.0");

        let activator = Activator::new(&root);
        activator
            .activate(&root.versions_dir().join("0.11.0"))
            .unwrap();

        let versions = store.list().unwrap();
        assert_eq!(versions.len(), 2);
        assert!(!versions[0].current); // 0.10.0
        assert!(versions[1].current); // 0.11.0
    }

    #[cfg(unix)]
    #[test]
    fn test_remove_current_version_clears_link() {
        let (_temp, root, store) = setup();
        add_version(&root, "0.11.0", "0.11.0");

        let activator = Activator::new(&root);
        activator
            .activate(&root.versions_dir().join("0.11.0"))
            .unwrap();

        store.remove("0.11.0").unwrap();
        assert!(activator.current().is_none());
        assert!(fs::symlink_metadata(activator.current_link()).is_err());
    }
}
