//! Environment variable constants for zv.
//!
//! Single source of truth for every environment variable zv recognizes.

/// Environment variable names used by zv.
pub struct EnvVars;

impl EnvVars {
    /// Root directory for installed versions and the download cache.
    pub const ZV_ROOT: &'static str = "ZV_ROOT";

    /// Override the release index URL (mirrors, tests).
    pub const ZV_INDEX_URL: &'static str = "ZV_INDEX_URL";

    /// Enable verbose output.
    pub const ZV_VERBOSE: &'static str = "ZV_VERBOSE";

    /// Suppress output.
    pub const ZV_QUIET: &'static str = "ZV_QUIET";

    /// Disable colored output.
    pub const ZV_NO_COLOR: &'static str = "ZV_NO_COLOR";

    /// Enable JSON log output.
    pub const ZV_LOG_JSON: &'static str = "ZV_LOG_JSON";

    /// Standard NO_COLOR environment variable.
    pub const NO_COLOR: &'static str = "NO_COLOR";

    /// Standard CLICOLOR environment variable.
    pub const CLICOLOR: &'static str = "CLICOLOR";

    /// CI environment indicator.
    pub const CI: &'static str = "CI";
}

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var(EnvVars::CI).is_ok()
}

/// Check if colors should be disabled based on environment.
pub fn no_color() -> bool {
    std::env::var(EnvVars::NO_COLOR).is_ok()
        || std::env::var(EnvVars::ZV_NO_COLOR).is_ok()
        || std::env::var(EnvVars::CLICOLOR)
            .map(|v| v == "0")
            .unwrap_or(false)
}
