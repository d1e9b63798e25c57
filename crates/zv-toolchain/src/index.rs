//! Release index client.
//!
//! Fetches the remote release index (a JSON document mapping version and
//! channel labels to releases) and parses it into typed, immutable records.
//! The remote document does not repeat the version inside each entry, so it
//! is injected from the map key during parsing.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use zv_core::{Error, Result};

/// Well-known URL of the Zig release index.
pub const DEFAULT_INDEX_URL: &str = "https://ziglang.org/download/index.json";

/// Reserved key of the rolling nightly channel.
pub const MASTER: &str = "master";

/// A downloadable archive for one release on one host target.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    /// Download URL of the archive.
    pub tarball: String,
    /// Hex-encoded SHA-256 of the archive bytes.
    pub shasum: String,
    /// Archive size in bytes. The live index encodes this as a JSON
    /// string, so both encodings are accepted.
    #[serde(deserialize_with = "size_string_or_number")]
    pub size: u64,
}

fn size_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// One versioned release of the toolchain.
#[derive(Debug, Clone)]
pub struct Release {
    /// Concrete version string. Taken from the entry's own `version`
    /// field when present (the master channel carries one), otherwise
    /// injected from the index key.
    pub version: String,
    /// Release date, used for stable-channel ordering.
    pub date: NaiveDate,
    artifacts: BTreeMap<String, Artifact>,
}

impl Release {
    /// Look up the artifact for a `"<arch>-<os>"` identifier.
    pub fn artifact(&self, ident: &str) -> Option<&Artifact> {
        self.artifacts.get(ident)
    }
}

/// Wire shape of one index entry. Everything that is not a known scalar
/// is collected and scanned for artifact objects; unknown fields (docs
/// links, source tarballs, future platforms) are tolerated.
#[derive(Debug, Deserialize)]
struct RawRelease {
    #[serde(default)]
    version: Option<String>,
    date: NaiveDate,
    #[serde(flatten)]
    entries: BTreeMap<String, serde_json::Value>,
}

/// The parsed release index.
#[derive(Debug, Clone, Default)]
pub struct ReleaseIndex {
    releases: BTreeMap<String, Release>,
}

impl ReleaseIndex {
    /// Parse an index document.
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: BTreeMap<String, RawRelease> =
            serde_json::from_str(text).map_err(|e| Error::Parse {
                message: e.to_string(),
                url: None,
                source: Some(Box::new(e)),
            })?;

        let mut releases = BTreeMap::new();
        for (key, entry) in raw {
            let mut artifacts = BTreeMap::new();
            for (name, value) in entry.entries {
                // Artifact entries are objects carrying a tarball URL;
                // scalar metadata (docs, notes) is skipped.
                if value.get("tarball").is_none() {
                    continue;
                }
                let artifact: Artifact =
                    serde_json::from_value(value).map_err(|e| Error::Parse {
                        message: format!("invalid artifact {} for {}: {}", name, key, e),
                        url: None,
                        source: Some(Box::new(e)),
                    })?;
                artifacts.insert(name, artifact);
            }

            let version = entry.version.unwrap_or_else(|| key.clone());
            releases.insert(
                key,
                Release {
                    version,
                    date: entry.date,
                    artifacts,
                },
            );
        }

        Ok(Self { releases })
    }

    /// Look up a release by its index key.
    pub fn get(&self, label: &str) -> Option<&Release> {
        self.releases.get(label)
    }

    /// The rolling master channel, if published.
    pub fn master(&self) -> Option<&Release> {
        self.releases.get(MASTER)
    }

    /// Iterate over all `(label, release)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Release)> {
        self.releases.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of releases in the index.
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// Whether the index contains no releases.
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

/// HTTP client for the release index.
#[derive(Debug, Clone)]
pub struct IndexClient {
    url: String,
    timeout: Duration,
}

impl Default for IndexClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexClient {
    /// Create a client for the well-known index URL.
    pub fn new() -> Self {
        Self {
            url: DEFAULT_INDEX_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the index URL (mirrors, tests).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// The URL this client fetches from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and parse the release index.
    pub async fn fetch_index(&self) -> Result<ReleaseIndex> {
        debug!("Fetching release index from {}", self.url);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to create HTTP client: {}", e)))?;

        let response = client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network_at("failed to fetch release index", &self.url, e))?;

        if !response.status().is_success() {
            return Err(Error::Network {
                message: format!("release index request failed: HTTP {}", response.status()),
                url: Some(self.url.clone()),
                source: None,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::network_at("failed to read release index", &self.url, e))?;

        ReleaseIndex::from_json(&text).map_err(|e| match e {
            Error::Parse {
                message, source, ..
            } => Error::Parse {
                message,
                url: Some(self.url.clone()),
                source,
            },
            other => other,
        })
    }
}
