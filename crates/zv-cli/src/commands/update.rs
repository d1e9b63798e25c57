//! Update command implementation.
//!
//! Only channels can be updated: a literal version never changes, so
//! `update 0.11.0` is a usage error rather than a silent no-op.

use super::fail;
use crate::commands::install;
use anyhow::Result;
use zv_core::{Error, ExitCode};
use zv_toolchain::{HostTarget, MASTER, STABLE, VersionStore, ZvRoot, read_marker, resolve};
use zv_ui::Output;

/// Run `zv update <channel>`.
pub async fn run(root: &ZvRoot, channel: &str, output: &Output) -> Result<i32> {
    if channel != STABLE && channel != MASTER {
        output.warn("only the stable and master channels can be updated");
        output.info("Example: zv update master");
        return Ok(ExitCode::UsageError.into());
    }

    match update(root, channel, output).await {
        Ok(()) => Ok(0),
        Err(e) => Ok(fail(&e, output)),
    }
}

async fn update(root: &ZvRoot, channel: &str, output: &Output) -> zv_core::Result<()> {
    let store = VersionStore::new(root);
    let index = install::fetch_index(output).await?;
    let host = HostTarget::current();
    let resolved = resolve(&index, channel, &host)?;

    if channel == MASTER {
        // master reinstalls in place; its marker pins the dev build
        if !store.exists(MASTER) {
            return Err(Error::not_installed(MASTER));
        }
        let installed = read_marker(&store.version_dir(MASTER));
        if installed.as_deref() == Some(resolved.version.as_str()) {
            output.info(&format!("zig master is up to date ({})", resolved.version));
            return Ok(());
        }
        output.verbose(&format!(
            "master: {} -> {}",
            installed.as_deref().unwrap_or("unknown"),
            resolved.version
        ));
        install::perform(root, &index, MASTER, false, true, output).await?;
    } else {
        // stable installs under its concrete version label, so being up
        // to date means the latest label is already in the store
        if store.exists(&resolved.label) {
            output.info(&format!("zig stable is up to date ({})", resolved.label));
            return Ok(());
        }
        install::perform(root, &index, STABLE, false, false, output).await?;
    }

    Ok(())
}
