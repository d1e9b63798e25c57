//! Core types for zv.
//!
//! This crate provides the shared error taxonomy and environment handling
//! used across all zv crates.

pub mod env;
pub mod error;

pub use env::EnvVars;
pub use error::{Error, ErrorCode, Fix, Result};

/// Exit codes for the zv CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    GeneralError = 1,
    /// Usage error (bad arguments)
    UsageError = 2,
    /// Configuration error
    ConfigError = 3,
    /// Version resolution or store error
    ToolchainError = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.code() {
            ErrorCode::VersionNotFound
            | ErrorCode::ArtifactNotFound
            | ErrorCode::VersionNotInstalled => ExitCode::ToolchainError,
            ErrorCode::ConfigError => ExitCode::ConfigError,
            _ => ExitCode::GeneralError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(ExitCode::from(&Error::not_installed("x")), ExitCode::ToolchainError);
        assert_eq!(ExitCode::from(&Error::config("x")), ExitCode::ConfigError);
        assert_eq!(ExitCode::from(&Error::network("x")), ExitCode::GeneralError);
        assert_eq!(i32::from(ExitCode::UsageError), 2);
    }
}
