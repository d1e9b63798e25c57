//! List command implementation.

use super::fail;
use crate::commands::install::fetch_index;
use anyhow::Result;
use zv_toolchain::{MASTER, VersionStore, ZvRoot};
use zv_ui::{Output, Style};

/// Run `zv list [--online]`.
pub async fn run(root: &ZvRoot, online: bool, output: &Output) -> Result<i32> {
    if online {
        return match list_online(output).await {
            Ok(code) => Ok(code),
            Err(e) => Ok(fail(&e, output)),
        };
    }

    let store = VersionStore::new(root);
    let versions = match store.list() {
        Ok(versions) => versions,
        Err(e) => return Ok(fail(&e, output)),
    };

    if versions.is_empty() {
        output.info("No versions installed");
        output.info("Install one with: zv install stable");
        return Ok(0);
    }

    output.header("Installed versions");
    for version in versions {
        let mut annotation = String::new();
        if let Some(ref release) = version.release_version {
            if *release != version.label {
                annotation.push_str(&format!("({}) ", release));
            }
        }
        if version.current {
            annotation.push_str(&Style::success("(current)").to_string());
        }
        output.list_item(&version.label, annotation.trim_end());
    }

    Ok(0)
}

async fn list_online(output: &Output) -> zv_core::Result<i32> {
    let index = fetch_index(output).await?;

    let mut entries: Vec<_> = index.iter().collect();
    entries.sort_by(|(a_label, a), (b_label, b)| a.date.cmp(&b.date).then(a_label.cmp(b_label)));

    output.header("Available releases");
    for (label, release) in entries {
        if label == MASTER {
            output.list_item(
                label,
                &format!("{} ({})", release.version, release.date),
            );
        } else {
            output.list_item(label, &format!("({})", release.date));
        }
    }

    Ok(0)
}
