//! Archive download with checksum-gated cache reuse.
//!
//! Archives are kept in the cache directory under names synthesized from
//! the install label and host target, so `master` and `stable` can never
//! collide on a generic remote filename. A cached file is trusted only if
//! its SHA-256 matches the recorded checksum; anything else is deleted and
//! fetched again. Downloads stream to a `.part` file that is hashed while
//! being written and only renamed into place after the digest checks out,
//! so an interrupted run never leaves a trusted-looking partial file.

use crate::index::Artifact;
use crate::root::{ZvRoot, ensure_dir};
use crate::target::HostTarget;
use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use zv_core::{Error, Result};
use zv_ui::Progress;

/// Cache-aware downloader for release archives.
#[derive(Debug, Clone)]
pub struct Fetcher {
    cache_dir: PathBuf,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher for the cache directory of a root.
    pub fn new(root: &ZvRoot) -> Self {
        Self {
            cache_dir: root.cache_dir(),
            // Large archive downloads on slow links need a generous cap.
            timeout: Duration::from_secs(600),
        }
    }

    /// Destination path for an artifact, synthesized from the install
    /// label and host target with the extension taken from the URL.
    pub fn archive_path(&self, label: &str, host: &HostTarget, tarball_url: &str) -> PathBuf {
        self.cache_dir.join(format!(
            "zig-{}-{}.{}",
            label,
            host.ident(),
            archive_extension(tarball_url)
        ))
    }

    /// Fetch an artifact into the cache, reusing a verified cached copy.
    ///
    /// Returns the path of the verified archive.
    pub async fn fetch(
        &self,
        artifact: &Artifact,
        label: &str,
        host: &HostTarget,
    ) -> Result<PathBuf> {
        ensure_dir(&self.cache_dir)?;
        let dest = self.archive_path(label, host, &artifact.tarball);

        if dest.exists() {
            let digest = file_sha256(&dest)?;
            if digest.eq_ignore_ascii_case(&artifact.shasum) {
                debug!("Using verified cached archive {}", dest.display());
                return Ok(dest);
            }
            warn!(
                "Cached archive {} does not match recorded checksum, refetching",
                dest.display()
            );
            fs::remove_file(&dest)
                .map_err(|e| Error::io_at("failed to remove stale archive", &dest, e))?;
        }

        let _lock = FetchLock::acquire(&dest)?;
        self.download(artifact, label, &dest).await?;
        Ok(dest)
    }

    async fn download(&self, artifact: &Artifact, label: &str, dest: &Path) -> Result<()> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e)))?;

        debug!("Downloading {}", artifact.tarball);
        let response = client
            .get(&artifact.tarball)
            .send()
            .await
            .map_err(|e| Error::network_at("failed to start download", &artifact.tarball, e))?;

        if !response.status().is_success() {
            return Err(Error::Network {
                message: format!("download failed: HTTP {}", response.status()),
                url: Some(artifact.tarball.clone()),
                source: None,
            });
        }

        let total = if artifact.size > 0 {
            artifact.size
        } else {
            response.content_length().unwrap_or(0)
        };
        let progress = Progress::bytes(total, format!("Downloading zig {}", label));

        let part = sibling_path(dest, "part");
        let mut file = File::create(&part)
            .map_err(|e| Error::io_at("failed to create download file", &part, e))?;
        let mut hasher = Sha256::new();
        let mut downloaded: u64 = 0;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    progress.finish_clear();
                    let _ = fs::remove_file(&part);
                    return Err(Error::network_at(
                        "download interrupted",
                        &artifact.tarball,
                        e,
                    ));
                }
            };
            if let Err(e) = file.write_all(&chunk) {
                progress.finish_clear();
                let _ = fs::remove_file(&part);
                return Err(Error::io_at("failed to write download data", &part, e));
            }
            hasher.update(&chunk);
            downloaded += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }
        drop(file);

        let actual = format!("{:x}", hasher.finalize());
        if !actual.eq_ignore_ascii_case(&artifact.shasum) {
            progress.finish_clear();
            let _ = fs::remove_file(&part);
            return Err(Error::ChecksumMismatch {
                path: dest.to_path_buf(),
                expected: artifact.shasum.clone(),
                actual,
            });
        }

        fs::rename(&part, dest).map_err(|e| {
            let _ = fs::remove_file(&part);
            Error::io_at("failed to finalize download", dest, e)
        })?;

        progress.finish(format!(
            "Downloaded zig {} ({:.1} MB)",
            label,
            downloaded as f64 / 1_000_000.0
        ));
        Ok(())
    }
}

/// Compute the SHA-256 of a file, hex-encoded.
pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).map_err(|e| Error::io_at("failed to open archive", path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| Error::io_at("failed to read archive", path, e))?;
    Ok(format!("{:x}", hasher.finalize()))
}

fn archive_extension(url: &str) -> &'static str {
    if url.ends_with(".zip") {
        "zip"
    } else if url.ends_with(".tar.gz") || url.ends_with(".tgz") {
        "tar.gz"
    } else {
        "tar.xz"
    }
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.{}", name, suffix))
}

/// Single-flight guard for one download destination.
///
/// Held for the duration of a download; a second process hitting the same
/// destination fails fast instead of interleaving writes.
struct FetchLock {
    path: PathBuf,
}

impl FetchLock {
    fn acquire(dest: &Path) -> Result<Self> {
        let path = sibling_path(dest, "lock");
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => Ok(Self { path }),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(Error::Config {
                message: format!(
                    "{} is already being downloaded by another process (remove {} if stale)",
                    dest.display(),
                    path.display()
                ),
                path: Some(path),
                source: None,
                fixes: vec![],
            }),
            Err(e) => Err(Error::io_at("failed to create download lock", &path, e)),
        }
    }
}

impl Drop for FetchLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
