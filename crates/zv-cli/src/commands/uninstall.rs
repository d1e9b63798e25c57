//! Uninstall command implementation.

use super::fail;
use anyhow::Result;
use zv_toolchain::{VersionStore, ZvRoot};
use zv_ui::Output;

/// Run `zv uninstall <version>`.
pub fn run(root: &ZvRoot, version: &str, output: &Output) -> Result<i32> {
    let store = VersionStore::new(root);

    output.status("Removing", &format!("zig {}", version));
    match store.remove(version) {
        Ok(()) => {
            output.status("Done", &format!("zig {} removed", version));
            Ok(0)
        }
        Err(e) => Ok(fail(&e, output)),
    }
}
