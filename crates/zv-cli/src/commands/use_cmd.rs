//! Use command implementation.

use super::fail;
use anyhow::Result;
use zv_core::Error;
use zv_toolchain::{Activator, VersionStore, ZvRoot};
use zv_ui::Output;

/// Run `zv use <version>`.
pub fn run(root: &ZvRoot, version: &str, output: &Output) -> Result<i32> {
    match switch(root, version, output) {
        Ok(()) => Ok(0),
        Err(e) => Ok(fail(&e, output)),
    }
}

fn switch(root: &ZvRoot, version: &str, output: &Output) -> zv_core::Result<()> {
    let store = VersionStore::new(root);
    if !store.exists(version) {
        return Err(Error::not_installed(version));
    }

    Activator::new(root).activate(&store.version_dir(version))?;
    output.status("Done", &format!("Now using zig {}", version));
    Ok(())
}
