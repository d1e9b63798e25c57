//! Archive extraction into the version store.
//!
//! Extraction always goes through a scoped staging directory: the archive
//! is unpacked there, its shape is validated (release archives carry
//! exactly one root folder), and only then is the root folder moved into
//! the permanent per-version directory. The staging directory is removed
//! on every exit path, success or failure.

use crate::root::{ZvRoot, ensure_dir};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, info};
use xz2::read::XzDecoder;
use zv_core::{Error, Result};

/// Marker file inside each installed version naming its concrete release
/// version (a channel directory like `master` holds a dev version here).
pub const RELEASE_MARKER: &str = ".zv-release";

/// Extracts verified archives into per-version directories.
#[derive(Debug, Clone)]
pub struct Installer {
    staging_root: PathBuf,
}

impl Installer {
    /// Create an installer staging under the root's cache directory.
    pub fn new(root: &ZvRoot) -> Self {
        Self {
            staging_root: root.staging_dir(),
        }
    }

    /// Extract `archive` and move its contents into `target_dir`.
    ///
    /// An existing `target_dir` is replaced entirely (reinstall
    /// semantics). `version` is recorded in the release marker file.
    pub fn install(&self, archive: &Path, target_dir: &Path, version: &str) -> Result<()> {
        ensure_dir(&self.staging_root)?;
        let staging = tempfile::Builder::new()
            .prefix("zv-")
            .tempdir_in(&self.staging_root)
            .map_err(|e| Error::io_at("failed to create staging directory", &self.staging_root, e))?;

        debug!(
            "Extracting {} to {}",
            archive.display(),
            staging.path().display()
        );
        extract(archive, staging.path())?;

        let mut entries: Vec<PathBuf> = fs::read_dir(staging.path())
            .map_err(|e| Error::io_at("failed to read staging directory", staging.path(), e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()
            .map_err(|e| Error::io_at("failed to read staging directory", staging.path(), e))?;

        if entries.len() != 1 {
            return Err(Error::MalformedArchive {
                path: archive.to_path_buf(),
                entries: entries.len(),
            });
        }
        let top = entries.remove(0);
        if !top.is_dir() {
            return Err(Error::extraction(
                archive,
                "archive root entry is not a directory",
                None,
            ));
        }

        if target_dir.exists() {
            debug!("Replacing existing {}", target_dir.display());
            fs::remove_dir_all(target_dir)
                .map_err(|e| Error::io_at("failed to remove previous install", target_dir, e))?;
        }
        if let Some(parent) = target_dir.parent() {
            ensure_dir(parent)?;
        }

        // Staging lives under the same root, so this is normally a cheap
        // rename; fall back to a copy if the rename crosses filesystems.
        if fs::rename(&top, target_dir).is_err() {
            copy_tree(&top, target_dir)?;
        }

        fs::write(target_dir.join(RELEASE_MARKER), version)
            .map_err(|e| Error::io_at("failed to write release marker", target_dir, e))?;

        info!("Installed {} to {}", version, target_dir.display());
        Ok(())
        // staging is removed when the TempDir guard drops
    }
}

/// Read the release marker of an installed version, if present.
pub fn read_marker(version_dir: &Path) -> Option<String> {
    fs::read_to_string(version_dir.join(RELEASE_MARKER))
        .ok()
        .map(|s| s.trim().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArchiveFormat {
    TarXz,
    TarGz,
    Zip,
}

impl ArchiveFormat {
    fn detect(archive: &Path) -> Result<Self> {
        let name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            Ok(Self::TarXz)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(Self::TarGz)
        } else if name.ends_with(".zip") {
            Ok(Self::Zip)
        } else {
            Err(Error::extraction(
                archive,
                format!("unsupported archive format: {}", name),
                None,
            ))
        }
    }
}

fn extract(archive: &Path, dest: &Path) -> Result<()> {
    let format = ArchiveFormat::detect(archive)?;
    let file =
        File::open(archive).map_err(|e| Error::io_at("failed to open archive", archive, e))?;

    match format {
        ArchiveFormat::TarXz => {
            let decoder = XzDecoder::new(BufReader::new(file));
            Archive::new(decoder).unpack(dest).map_err(|e| {
                Error::extraction(archive, "failed to unpack tar.xz archive", Some(Box::new(e)))
            })?;
        }
        ArchiveFormat::TarGz => {
            let decoder = GzDecoder::new(BufReader::new(file));
            Archive::new(decoder).unpack(dest).map_err(|e| {
                Error::extraction(archive, "failed to unpack tar.gz archive", Some(Box::new(e)))
            })?;
        }
        ArchiveFormat::Zip => {
            let mut zip = zip::ZipArchive::new(file).map_err(|e| {
                Error::extraction(archive, "failed to open zip archive", Some(Box::new(e)))
            })?;
            zip.extract(dest).map_err(|e| {
                Error::extraction(archive, "failed to unpack zip archive", Some(Box::new(e)))
            })?;
        }
    }
    Ok(())
}

fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    ensure_dir(dest)?;
    let entries =
        fs::read_dir(src).map_err(|e| Error::io_at("failed to read directory", src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io_at("failed to read directory", src, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| Error::io_at("failed to stat entry", &from, e))?;
        if file_type.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| Error::io_at("failed to copy file", &from, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tempfile::TempDir;

    /// Build a tar.gz archive containing the given `(path, contents)`
    /// entries, the way release archives are shaped.
    fn build_targz(dir: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
        let archive_path = dir.join("zig-test.tar.gz");
        let file = File::create(&archive_path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, bytes) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(bytes.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, path, *bytes).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
        archive_path
    }

    fn setup() -> (TempDir, ZvRoot, Installer) {
        let temp = tempfile::tempdir().unwrap();
        let root = ZvRoot::at(temp.path());
        let installer = Installer::new(&root);
        (temp, root, installer)
    }

    #[test]
    fn test_install_single_root_archive() {
        let (_temp, root, installer) = setup();
        let archive = build_targz(
            root.path(),
            &[
                ("zig-linux-x86_64-0.11.0/zig", b"#!/bin/true".as_slice()),
                ("zig-linux-x86_64-0.11.0/LICENSE", b"MIT".as_slice()),
            ],
        );

        let target = root.versions_dir().join("0.11.0");
        installer.install(&archive, &target, "0.11.0").unwrap();

        assert!(target.join("zig").exists());
        assert!(target.join("LICENSE").exists());
        assert_eq!(read_marker(&target).as_deref(), Some("0.11.0"));
    }

    #[test]
    fn test_multiple_top_level_entries_rejected() {
        let (_temp, root, installer) = setup();
        let archive = build_targz(
            root.path(),
            &[("one/zig", b"a".as_slice()), ("two/zig", b"b".as_slice())],
        );

        let target = root.versions_dir().join("0.11.0");
        let err = installer.install(&archive, &target, "0.11.0").unwrap_err();
        match err {
            Error::MalformedArchive { entries, .. } => assert_eq!(entries, 2),
            other => panic!("expected MalformedArchive, got {:?}", other),
        }
        assert!(!target.exists());
    }

    #[test]
    fn test_empty_archive_rejected() {
        let (_temp, root, installer) = setup();
        let archive = build_targz(root.path(), &[]);

        let target = root.versions_dir().join("0.11.0");
        let err = installer.install(&archive, &target, "0.11.0").unwrap_err();
        match err {
            Error::MalformedArchive { entries, .. } => assert_eq!(entries, 0),
            other => panic!("expected MalformedArchive, got {:?}", other),
        }
        assert!(!target.exists());
    }

    #[test]
    fn test_reinstall_replaces_previous_contents() {
        let (_temp, root, installer) = setup();
        let target = root.versions_dir().join("0.11.0");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale-file"), b"old").unwrap();

        let archive = build_targz(
            root.path(),
            &[("zig-0.11.0/zig", b"fresh".as_slice())],
        );
        installer.install(&archive, &target, "0.11.0").unwrap();

        assert!(!target.join("stale-file").exists());
        assert_eq!(fs::read(target.join("zig")).unwrap(), b"fresh");
    }

    #[test]
    fn test_staging_cleaned_up_on_failure() {
        let (_temp, root, installer) = setup();
        let archive = build_targz(
            root.path(),
            &[("one/zig", b"a".as_slice()), ("two/zig", b"b".as_slice())],
        );

        let target = root.versions_dir().join("0.11.0");
        let _ = installer.install(&archive, &target, "0.11.0");

        let leftovers: Vec<_> = fs::read_dir(root.staging_dir()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let (_temp, root, installer) = setup();
        let archive = root.path().join("zig.rar");
        fs::write(&archive, b"not an archive").unwrap();

        let target = root.versions_dir().join("0.11.0");
        let err = installer.install(&archive, &target, "0.11.0").unwrap_err();
        assert_eq!(err.code(), zv_core::ErrorCode::Extraction);
    }

    #[test]
    fn test_corrupt_archive_is_extraction_error() {
        let (_temp, root, installer) = setup();
        let archive = root.path().join("zig.tar.gz");
        fs::write(&archive, b"definitely not gzip").unwrap();

        let target = root.versions_dir().join("0.11.0");
        let err = installer.install(&archive, &target, "0.11.0").unwrap_err();
        assert_eq!(err.code(), zv_core::ErrorCode::Extraction);
        assert!(!target.exists());
    }
}
