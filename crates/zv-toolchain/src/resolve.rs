//! Channel and version resolution.
//!
//! Maps a user-supplied token (`master`, `stable`, or a literal version
//! key) plus a host target to one concrete release and its artifact.
//! Resolution is a pure function over the parsed index: no I/O, no
//! mutation, deterministic for a fixed index.

use crate::index::{Artifact, MASTER, Release, ReleaseIndex};
use crate::target::HostTarget;
use chrono::NaiveDate;
use zv_core::{Error, Fix, Result};

/// Token selecting the newest dated release.
pub const STABLE: &str = "stable";

/// Outcome of resolving a token against the index.
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    /// Index key of the release; doubles as the install directory name.
    pub label: String,
    /// Concrete version string (differs from the label for `master`).
    pub version: String,
    /// Release date.
    pub date: NaiveDate,
    /// Artifact matching the host target.
    pub artifact: &'a Artifact,
}

/// Resolve a version token to a release and host artifact.
pub fn resolve<'a>(
    index: &'a ReleaseIndex,
    token: &str,
    host: &HostTarget,
) -> Result<Resolved<'a>> {
    let (label, release) = match token {
        MASTER => {
            let release = index
                .master()
                .ok_or_else(|| not_found(MASTER))?;
            (MASTER.to_string(), release)
        }
        STABLE => {
            let (label, release) = latest_stable(index).ok_or_else(|| not_found(STABLE))?;
            (label.to_string(), release)
        }
        literal => {
            let release = index.get(literal).ok_or_else(|| not_found(literal))?;
            (literal.to_string(), release)
        }
    };

    let ident = host.ident();
    let artifact = release.artifact(&ident).ok_or_else(|| Error::ArtifactNotFound {
        version: release.version.clone(),
        target: ident,
        fixes: vec![],
    })?;

    Ok(Resolved {
        label,
        version: release.version.clone(),
        date: release.date,
        artifact,
    })
}

/// The newest dated release, excluding the master channel.
///
/// Ties on the date are broken by the greater version key, so the result
/// does not depend on map iteration order.
pub fn latest_stable(index: &ReleaseIndex) -> Option<(&str, &Release)> {
    index
        .iter()
        .filter(|(label, _)| *label != MASTER)
        .max_by(|(a_label, a), (b_label, b)| a.date.cmp(&b.date).then(a_label.cmp(b_label)))
}

fn not_found(token: &str) -> Error {
    Error::VersionNotFound {
        version: token.to_string(),
        fixes: vec![Fix::with_command(
            "List the available releases",
            "zv list --online",
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ReleaseIndex;

    fn fixture() -> ReleaseIndex {
        ReleaseIndex::from_json(
            r#"{
            "master": {
                "version": "0.12.0-dev.100+abcdef123",
                "date": "2023-09-10",
                "x86_64-linux": {"tarball": "https://example.invalid/master.tar.xz", "shasum": "aa", "size": "1"}
            },
            "0.11.0": {
                "date": "2023-08-01",
                "x86_64-linux": {"tarball": "https://example.invalid/0.11.0.tar.xz", "shasum": "bb", "size": "2"}
            },
            "0.10.0": {
                "date": "2023-03-01",
                "x86_64-linux": {"tarball": "https://example.invalid/0.10.0.tar.xz", "shasum": "cc", "size": "3"},
                "aarch64-macos": {"tarball": "https://example.invalid/0.10.0-mac.tar.xz", "shasum": "dd", "size": "4"}
            }
        }"#,
        )
        .unwrap()
    }

    fn linux() -> HostTarget {
        HostTarget::new("x86_64", "linux")
    }

    #[test]
    fn test_stable_picks_latest_date_not_master() {
        let index = fixture();
        let resolved = resolve(&index, "stable", &linux()).unwrap();
        // master is dated later but never participates in stable
        assert_eq!(resolved.label, "0.11.0");
        assert_eq!(resolved.version, "0.11.0");
        assert!(resolved.artifact.tarball.contains("0.11.0"));
    }

    #[test]
    fn test_stable_date_comparison_is_calendar_order() {
        // 2023-09-02 sorts after 2023-08-20 by calendar even though a
        // naive string comparison of "2" vs "20" could say otherwise
        let index = ReleaseIndex::from_json(
            r#"{
            "0.2.0": {"date": "2023-09-02", "x86_64-linux": {"tarball": "t", "shasum": "a", "size": "1"}},
            "0.1.0": {"date": "2023-08-20", "x86_64-linux": {"tarball": "t", "shasum": "b", "size": "1"}}
        }"#,
        )
        .unwrap();
        let resolved = resolve(&index, "stable", &linux()).unwrap();
        assert_eq!(resolved.label, "0.2.0");
    }

    #[test]
    fn test_stable_tie_break_is_greatest_key() {
        let index = ReleaseIndex::from_json(
            r#"{
            "0.11.0": {"date": "2023-08-01", "x86_64-linux": {"tarball": "t", "shasum": "a", "size": "1"}},
            "0.11.1": {"date": "2023-08-01", "x86_64-linux": {"tarball": "t", "shasum": "b", "size": "1"}}
        }"#,
        )
        .unwrap();
        let resolved = resolve(&index, "stable", &linux()).unwrap();
        assert_eq!(resolved.label, "0.11.1");
    }

    #[test]
    fn test_master_token() {
        let index = fixture();
        let resolved = resolve(&index, "master", &linux()).unwrap();
        assert_eq!(resolved.label, "master");
        assert_eq!(resolved.version, "0.12.0-dev.100+abcdef123");
    }

    #[test]
    fn test_literal_token() {
        let index = fixture();
        let resolved = resolve(&index, "0.10.0", &linux()).unwrap();
        assert_eq!(resolved.label, "0.10.0");
        assert_eq!(resolved.date, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
    }

    #[test]
    fn test_unknown_token_is_version_not_found() {
        let index = fixture();
        let err = resolve(&index, "0.9.9", &linux()).unwrap_err();
        assert_eq!(err.code(), zv_core::ErrorCode::VersionNotFound);
        assert!(!err.fixes().is_empty());
    }

    #[test]
    fn test_missing_host_build_is_artifact_not_found() {
        let index = fixture();
        let host = HostTarget::new("aarch64", "macos");
        // 0.11.0 only ships x86_64-linux in the fixture
        let err = resolve(&index, "0.11.0", &host).unwrap_err();
        assert_eq!(err.code(), zv_core::ErrorCode::ArtifactNotFound);

        // but 0.10.0 has the build
        assert!(resolve(&index, "0.10.0", &host).is_ok());
    }

    #[test]
    fn test_stable_on_master_only_index() {
        let index = ReleaseIndex::from_json(
            r#"{"master": {"version": "0.12.0-dev.1", "date": "2023-09-10",
                "x86_64-linux": {"tarball": "t", "shasum": "a", "size": "1"}}}"#,
        )
        .unwrap();
        let err = resolve(&index, "stable", &linux()).unwrap_err();
        assert_eq!(err.code(), zv_core::ErrorCode::VersionNotFound);
    }
}
