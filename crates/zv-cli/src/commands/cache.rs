//! Cache management command implementation.

use super::fail;
use anyhow::Result;
use std::fs;
use zv_toolchain::{ZvRoot, clear_cache};
use zv_ui::Output;

/// Run `zv cache clear`.
pub fn clear(root: &ZvRoot, output: &Output) -> Result<i32> {
    match clear_cache(root) {
        Ok(true) => {
            output.status("Cleared", "download cache");
            Ok(0)
        }
        Ok(false) => {
            output.info("Cache is already empty");
            Ok(0)
        }
        Err(e) => Ok(fail(&e, output)),
    }
}

/// Run `zv cache status`.
pub fn status(root: &ZvRoot, output: &Output) -> Result<i32> {
    let cache_dir = root.cache_dir();

    output.header("Cache Status");
    output.list_item("location:", &cache_dir.display().to_string());

    let mut entries = 0usize;
    let mut bytes = 0u64;
    if let Ok(dir) = fs::read_dir(&cache_dir) {
        for entry in dir.flatten() {
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            // staging subdirectories are transient, not cache entries
            if metadata.is_file() {
                entries += 1;
                bytes += metadata.len();
            }
        }
    }

    output.list_item("archives:", &entries.to_string());
    output.list_item("size:", &format_bytes(bytes));

    Ok(0)
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1000 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1000.0 {
            break;
        }
        value /= 1000.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}
