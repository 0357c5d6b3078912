//! Line-oriented file reading
//!
//! Provides consistent handling for:
//! - Binary files (skipped, not an error)
//! - Non-UTF-8 lines (lossy conversion)
//! - CRLF line endings

use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Number of leading bytes inspected for NUL bytes
pub const BINARY_SNIFF_LEN: usize = 8192;

/// Outcome of inspecting a file's leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sniff {
    Text,
    Binary,
}

/// A file "appears binary" when its first 8 KiB contain a NUL byte
pub fn sniff(path: &Path) -> std::io::Result<Sniff> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; BINARY_SNIFF_LEN];
    let mut filled = 0;

    while filled < buffer.len() {
        let n = file.read(&mut buffer[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    if buffer[..filled].contains(&0) {
        Ok(Sniff::Binary)
    } else {
        Ok(Sniff::Text)
    }
}

/// Strip one trailing `\n` or `\r\n`
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Scan `path` line by line and return `(line_number, line)` for every line
/// that contains at least one match.
pub fn matching_lines(path: &Path, pattern: &Regex) -> std::io::Result<Vec<(u64, String)>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buffer = Vec::new();
    let mut line_number = 0u64;
    let mut hits = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;

        let text = String::from_utf8_lossy(&buffer);
        let line = trim_line_ending(&text);
        if pattern.is_match(line) {
            hits.push((line_number, line.to_string()));
        }
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_sniff_text_and_binary() {
        let temp = tempdir().unwrap();
        let text = temp.path().join("a.txt");
        let bin = temp.path().join("b.bin");
        fs::write(&text, "hello\nworld\n").unwrap();
        fs::write(&bin, b"\x7fELF\x00\x01foo").unwrap();

        assert_eq!(sniff(&text).unwrap(), Sniff::Text);
        assert_eq!(sniff(&bin).unwrap(), Sniff::Binary);
        assert!(sniff(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_empty_file_is_text() {
        let temp = tempdir().unwrap();
        let empty = temp.path().join("empty");
        fs::write(&empty, "").unwrap();
        assert_eq!(sniff(&empty).unwrap(), Sniff::Text);
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending("abc\r\n"), "abc");
        assert_eq!(trim_line_ending("abc\n"), "abc");
        assert_eq!(trim_line_ending("abc"), "abc");
        assert_eq!(trim_line_ending("abc\r"), "abc");
    }

    #[test]
    fn test_matching_lines_keeps_full_text() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("creds.txt");
        fs::write(&path, "user=admin\npass=hunter2\r\nnothing\npassword: x").unwrap();

        let re = Regex::new("pass").unwrap();
        let hits = matching_lines(&path, &re).unwrap();
        assert_eq!(
            hits,
            vec![
                (2, "pass=hunter2".to_string()),
                (4, "password: x".to_string())
            ]
        );
    }

    #[test]
    fn test_matching_lines_lossy_utf8() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9 token\nplain\n").unwrap();

        let re = Regex::new("token").unwrap();
        let hits = matching_lines(&path, &re).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 1);
        assert!(hits[0].1.ends_with("token"));
    }
}
