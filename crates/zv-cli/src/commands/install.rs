//! Install command implementation.

use super::{fail, index_client};
use anyhow::Result;
use zv_toolchain::{
    Activator, Fetcher, HostTarget, Installer, ReleaseIndex, VersionStore, ZvRoot, read_marker,
    resolve,
};
use zv_ui::{Output, Spinner};

/// Run `zv install <version>`.
pub async fn run(
    root: &ZvRoot,
    token: &str,
    activate: bool,
    force: bool,
    output: &Output,
) -> Result<i32> {
    let index = match fetch_index(output).await {
        Ok(index) => index,
        Err(e) => return Ok(fail(&e, output)),
    };

    match perform(root, &index, token, activate, force, output).await {
        Ok(_) => Ok(0),
        Err(e) => Ok(fail(&e, output)),
    }
}

/// Fetch the release index behind a spinner.
pub(crate) async fn fetch_index(output: &Output) -> zv_core::Result<ReleaseIndex> {
    let spinner = Spinner::new("Fetching release index...");
    match index_client().fetch_index().await {
        Ok(index) => {
            spinner.finish_clear();
            output.verbose(&format!("Release index has {} entries", index.len()));
            Ok(index)
        }
        Err(e) => {
            spinner.finish_error("Failed to fetch release index");
            Err(e)
        }
    }
}

/// Resolve, fetch, extract and (maybe) activate one release.
///
/// Returns the install label. Shared with the update command.
pub(crate) async fn perform(
    root: &ZvRoot,
    index: &ReleaseIndex,
    token: &str,
    activate: bool,
    force: bool,
    output: &Output,
) -> zv_core::Result<String> {
    let host = HostTarget::current();
    let resolved = resolve(index, token, &host)?;

    let store = VersionStore::new(root);
    let activator = Activator::new(root);
    let target = store.version_dir(&resolved.label);

    if store.exists(&resolved.label) && !force {
        let installed = read_marker(&target);
        if installed.as_deref() == Some(resolved.version.as_str()) {
            output.info(&format!("zig {} is already installed", resolved.label));
            if activate {
                activator.activate(&target)?;
                output.status("Done", &format!("Now using zig {}", resolved.label));
            }
            return Ok(resolved.label);
        }
        // A channel directory holding an older build falls through and
        // gets replaced.
    }

    if resolved.label == resolved.version {
        output.status("Installing", &format!("zig {}", resolved.label));
    } else {
        output.status(
            "Installing",
            &format!("zig {} ({})", resolved.label, resolved.version),
        );
    }
    output.verbose(&format!("Artifact: {}", resolved.artifact.tarball));

    let fetcher = Fetcher::new(root);
    let archive = fetcher
        .fetch(resolved.artifact, &resolved.label, &host)
        .await?;

    let spinner = Spinner::new(format!("Extracting zig {}...", resolved.label));
    let installer = Installer::new(root);
    match installer.install(&archive, &target, &resolved.version) {
        Ok(()) => spinner.finish_success(format!("Extracted zig {}", resolved.label)),
        Err(e) => {
            spinner.finish_error(format!("Failed to extract zig {}", resolved.label));
            return Err(e);
        }
    }

    // First install activates implicitly; otherwise only on request.
    if activate || activator.current().is_none() {
        activator.activate(&target)?;
        output.status("Done", &format!("zig {} installed and active", resolved.label));
    } else {
        output.status("Done", &format!("zig {} installed", resolved.label));
    }

    Ok(resolved.label)
}
