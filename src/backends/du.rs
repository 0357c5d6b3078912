//! Directory size via `du -sb`, with an in-process fallback

use log::debug;
use std::path::Path;
use walkdir::WalkDir;

use crate::backends::tools::{ToolRegistry, DU};

/// Total apparent size in bytes of everything under `dir`
pub fn dir_size(tools: &ToolRegistry, dir: &Path) -> Option<u64> {
    if let Some(size) = du_size(tools, dir) {
        return Some(size);
    }
    debug!("sizing {} without du", dir.display());
    walk_size(dir)
}

fn du_size(tools: &ToolRegistry, dir: &Path) -> Option<u64> {
    let output = tools
        .run_checked(DU, [std::ffi::OsStr::new("-sb"), dir.as_os_str()])
        .ok()?;
    parse_du_output(&output.stdout)
}

/// First field of `du -sb` output
pub fn parse_du_output(stdout: &str) -> Option<u64> {
    stdout.split_whitespace().next()?.parse().ok()
}

/// Sum of file lengths; unreadable entries are skipped, an unreadable root
/// yields `None`.
pub fn walk_size(dir: &Path) -> Option<u64> {
    if std::fs::read_dir(dir).is_err() {
        return None;
    }
    let total = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| !m.is_dir())
        .map(|m| m.len())
        .sum();
    Some(total)
}
