//! Zig toolchain management for zv.
//!
//! This crate implements the install pipeline and the supporting state:
//! - Release index fetching and parsing
//! - Channel and version resolution against the index
//! - Checksum-verified archive download with cache reuse
//! - Staged extraction into the per-version store
//! - Active-version switching via the `current` symlink
//! - The installed-version registry

pub mod activate;
pub mod fetch;
pub mod index;
pub mod install;
pub mod resolve;
pub mod root;
pub mod store;
pub mod target;

pub use activate::Activator;
pub use fetch::{Fetcher, file_sha256};
pub use index::{Artifact, DEFAULT_INDEX_URL, IndexClient, MASTER, Release, ReleaseIndex};
pub use install::{Installer, RELEASE_MARKER, read_marker};
pub use resolve::{Resolved, STABLE, latest_stable, resolve};
pub use root::{CURRENT_LINK, ZvRoot, clear_cache, ensure_dir};
pub use store::{InstalledVersion, VersionStore};
pub use target::HostTarget;
