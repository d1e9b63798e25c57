//! Spawn command implementation.
//!
//! Thin exec wrapper: the pinned version's `zig` binary replaces the zv
//! process on Unix, so signals and exit codes flow through untouched.

use super::fail;
use anyhow::Result;
use std::process::Command;
use tracing::debug;
use zv_core::Error;
use zv_toolchain::{VersionStore, ZvRoot};
use zv_ui::Output;

/// Run `zv spawn <version> [args..]`.
pub fn run(root: &ZvRoot, version: &str, args: &[String], output: &Output) -> Result<i32> {
    let store = VersionStore::new(root);
    if !store.exists(version) {
        return Ok(fail(&Error::not_installed(version), output));
    }

    let binary = store.version_dir(version).join(zig_binary_name());
    if !binary.exists() {
        return Ok(fail(
            &Error::config_at(
                format!("zig binary not found for version {}", version),
                binary,
            ),
            output,
        ));
    }

    debug!("Spawning {} {:?}", binary.display(), args);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // exec only returns on failure
        let err = Command::new(&binary).args(args).exec();
        Ok(fail(&Error::io_at("failed to exec zig", &binary, err), output))
    }

    #[cfg(not(unix))]
    {
        let status = Command::new(&binary).args(args).status().map_err(|e| {
            anyhow::anyhow!("failed to run {}: {}", binary.display(), e)
        })?;
        Ok(status.code().unwrap_or(1))
    }
}

fn zig_binary_name() -> &'static str {
    if cfg!(windows) { "zig.exe" } else { "zig" }
}
