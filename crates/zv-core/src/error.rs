//! Error types for zv.

use std::path::PathBuf;

/// Result type alias using zv Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes for categorizing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Release index could not be fetched
    Network,
    /// Release index document is malformed
    Parse,
    /// Requested version does not exist in the index
    VersionNotFound,
    /// No build of the release for this machine
    ArtifactNotFound,
    /// Downloaded or cached bytes do not match the recorded digest
    ChecksumMismatch,
    /// Archive shape is invalid
    MalformedArchive,
    /// Archive could not be extracted
    Extraction,
    /// Requested version is not installed
    VersionNotInstalled,
    /// Invalid configuration
    ConfigError,
    /// I/O error
    IoError,
}

/// A fix suggestion for an error.
#[derive(Debug, Clone)]
pub struct Fix {
    /// Description of what this fix does
    pub description: String,
    /// Command to run, if applicable
    pub command: Option<String>,
}

impl Fix {
    /// Create a fix with just a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: None,
        }
    }

    /// Create a fix with a command.
    pub fn with_command(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: Some(command.into()),
        }
    }
}

/// Structured error type for zv.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("network error: {message}")]
    Network {
        message: String,
        url: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("failed to parse release index: {message}")]
    Parse {
        message: String,
        url: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("version {version} does not exist")]
    VersionNotFound { version: String, fixes: Vec<Fix> },

    #[error("no {version} build for {target}")]
    ArtifactNotFound {
        version: String,
        target: String,
        fixes: Vec<Fix>,
    },

    #[error("checksum mismatch for {}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("malformed archive {}: expected 1 top-level entry, found {entries}", .path.display())]
    MalformedArchive { path: PathBuf, entries: usize },

    #[error("failed to extract {}: {message}", .path.display())]
    Extraction {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("version {version} is not installed")]
    VersionNotInstalled { version: String, fixes: Vec<Fix> },

    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        fixes: Vec<Fix>,
    },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Network { .. } => ErrorCode::Network,
            Error::Parse { .. } => ErrorCode::Parse,
            Error::VersionNotFound { .. } => ErrorCode::VersionNotFound,
            Error::ArtifactNotFound { .. } => ErrorCode::ArtifactNotFound,
            Error::ChecksumMismatch { .. } => ErrorCode::ChecksumMismatch,
            Error::MalformedArchive { .. } => ErrorCode::MalformedArchive,
            Error::Extraction { .. } => ErrorCode::Extraction,
            Error::VersionNotInstalled { .. } => ErrorCode::VersionNotInstalled,
            Error::Config { .. } => ErrorCode::ConfigError,
            Error::Io { .. } => ErrorCode::IoError,
            Error::Other(_) => ErrorCode::IoError,
        }
    }

    /// Get suggested fixes for this error.
    pub fn fixes(&self) -> &[Fix] {
        match self {
            Error::VersionNotFound { fixes, .. } => fixes,
            Error::ArtifactNotFound { fixes, .. } => fixes,
            Error::VersionNotInstalled { fixes, .. } => fixes,
            Error::Config { fixes, .. } => fixes,
            _ => &[],
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Error::Network {
            message: message.into(),
            url: None,
            source: None,
        }
    }

    /// Create a network error for a URL, wrapping its cause.
    pub fn network_at(
        message: impl Into<String>,
        url: impl AsRef<str>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Network {
            message: message.into(),
            url: Some(url.as_ref().to_string()),
            source: Some(Box::new(source)),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse {
            message: message.into(),
            url: None,
            source: None,
        }
    }

    /// Create a version-not-installed error with the standard fix hint.
    pub fn not_installed(version: impl Into<String>) -> Self {
        let version = version.into();
        let fixes = vec![Fix::with_command(
            format!("Install zig {}", version),
            format!("zv install {}", version),
        )];
        Error::VersionNotInstalled { version, fixes }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            path: None,
            source: None,
            fixes: vec![],
        }
    }

    /// Create a config error with a path.
    pub fn config_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::Config {
            message: message.into(),
            path: Some(path.into()),
            source: None,
            fixes: vec![],
        }
    }

    /// Create an extraction error wrapping the extractor's failure.
    pub fn extraction(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Extraction {
            path: path.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an I/O error for a path.
    pub fn io_at(message: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            message: message.into(),
            path: Some(path.into()),
            source,
        }
    }
}
