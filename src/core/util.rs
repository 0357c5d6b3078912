//! Common utilities

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Timestamp format used for display and export
pub const MTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)\s*(\d+)?\s*([bkmg])?b?\s*$").expect("static size regex")
});

/// Human-readable size in binary units: `1023B`, `1.0K`, `1.5M`, `2.0G`
pub fn human_size(size: u64) -> String {
    if size >= GIB {
        format!("{:.1}G", size as f64 / GIB as f64)
    } else if size >= MIB {
        format!("{:.1}M", size as f64 / MIB as f64)
    } else if size >= KIB {
        format!("{:.1}K", size as f64 / KIB as f64)
    } else {
        format!("{}B", size)
    }
}

/// Parse a minimum size such as `10M`, `512k`, `2G` or `4096`.
///
/// A bare unit (`M`) means one of that unit.
pub fn parse_size(text: &str) -> Option<u64> {
    if text.trim().is_empty() {
        return None;
    }
    let caps = SIZE_PATTERN.captures(text)?;
    let value: u64 = match caps.get(1) {
        Some(n) => n.as_str().parse().ok()?,
        None if caps.get(2).is_some() => 1,
        None => return None,
    };
    let unit = match caps.get(2).map(|u| u.as_str().to_ascii_lowercase()) {
        Some(u) if u == "k" => KIB,
        Some(u) if u == "m" => MIB,
        Some(u) if u == "g" => GIB,
        _ => 1,
    };
    value.checked_mul(unit)
}

/// Local timestamp as `YYYY-mm-dd HH:MM:SS`
pub fn format_mtime(mtime: &DateTime<Local>) -> String {
    mtime.format(MTIME_FORMAT).to_string()
}

/// Three-digit octal permission string (`755`)
pub fn format_mode(mode: u32) -> String {
    format!("{:03o}", mode & 0o777)
}

/// Truncate string to max bytes, returning (truncated_string, was_truncated)
pub fn truncate_string(s: &str, max_bytes: usize) -> (String, bool) {
    if s.len() <= max_bytes {
        return (s.to_string(), false);
    }

    // Find a valid UTF-8 boundary
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    (s[..end].to_string(), true)
}

/// Truncate to `width` characters and pad with spaces to exactly `width`
pub fn fit_column(s: &str, width: usize) -> String {
    let truncated: String = s.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

/// Parse a yes/no answer, falling back to `default` on empty input
pub fn parse_yes_no(answer: &str, default: bool) -> bool {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default,
    }
}
