//! Result model
//!
//! Every search produces one of three record kinds. Records are immutable once
//! built; metadata that could not be read is kept as `None` instead of dropping
//! the record.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Display class of a file entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    Executable,
    Script,
    Config,
    Plain,
}

const SCRIPT_EXTENSIONS: &[&str] = &["sh", "py", "pl", "rb", "ps1"];
const CONFIG_EXTENSIONS: &[&str] = &["conf", "cfg", "ini", "cnf", "yaml", "yml"];

impl ColorClass {
    /// Classify an entry from its name and permission bits
    pub fn classify(path: &Path, mode: Option<u32>) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some(e) if SCRIPT_EXTENSIONS.contains(&e) => ColorClass::Script,
            Some(e) if CONFIG_EXTENSIONS.contains(&e) => ColorClass::Config,
            _ if mode.is_some_and(|m| m & 0o111 != 0) => ColorClass::Executable,
            _ => ColorClass::Plain,
        }
    }
}

/// Whether a record describes a regular file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// A filesystem entry produced by traversal
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Bytes; for directories the total size of the subtree
    pub size: Option<u64>,
    pub modified: Option<DateTime<Local>>,
    /// Permission bits (lower 12 bits of st_mode)
    pub mode: Option<u32>,
    pub class: ColorClass,
}

impl FileRecord {
    /// Stat `path` and build a record; a failed stat yields a record with
    /// missing metadata.
    pub fn from_path(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let path = path.into();
        match fs::metadata(&path) {
            Ok(meta) => {
                let mode = permission_bits(&meta);
                let modified = meta.modified().ok().map(DateTime::<Local>::from);
                let size = match kind {
                    EntryKind::File => Some(meta.len()),
                    EntryKind::Dir => None,
                };
                let class = match kind {
                    EntryKind::File => ColorClass::classify(&path, mode),
                    EntryKind::Dir => ColorClass::Plain,
                };
                Self {
                    path,
                    kind,
                    size,
                    modified,
                    mode,
                    class,
                }
            }
            Err(_) => Self::missing(path, kind),
        }
    }

    /// A record whose metadata could not be read
    pub fn missing(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let path = path.into();
        let class = match kind {
            EntryKind::File => ColorClass::classify(&path, None),
            EntryKind::Dir => ColorClass::Plain,
        };
        Self {
            path,
            kind,
            size: None,
            modified: None,
            mode: None,
            class,
        }
    }

    pub fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }

    pub fn has_metadata(&self) -> bool {
        self.modified.is_some()
    }
}

#[cfg(unix)]
fn permission_bits(meta: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permission_bits(meta: &fs::Metadata) -> Option<u32> {
    Some(if meta.permissions().readonly() { 0o444 } else { 0o644 })
}

/// One line of a file that matched a content pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub path: PathBuf,
    /// 1-based
    pub line_number: u64,
    /// Full line text without the line terminator
    pub line: String,
}

impl MatchRecord {
    pub fn new(path: impl Into<PathBuf>, line_number: u64, line: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line_number,
            line: line.into(),
        }
    }
}

/// One output line of an exploit-database backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploitRecord {
    pub source: String,
    pub result: String,
}

/// Parameters collected for one search invocation
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub root: PathBuf,
    /// Case-insensitive glob matched against the entry name
    pub name_glob: Option<String>,
    /// Lower-case extensions without the leading dot
    pub extensions: Vec<String>,
    /// Regex for content search
    pub content_pattern: Option<String>,
    pub case_insensitive: bool,
    pub cap: usize,
}

impl SearchRequest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            name_glob: None,
            extensions: Vec::new(),
            content_pattern: None,
            case_insensitive: false,
            cap: crate::core::settings::DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_name_glob(mut self, glob: impl Into<String>) -> Self {
        self.name_glob = Some(glob.into());
        self
    }

    /// Parse a comma separated extension list such as `"log, .txt,sh"`
    pub fn with_extensions(mut self, list: &str) -> Self {
        self.extensions = list
            .split(',')
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn with_content_pattern(mut self, pattern: impl Into<String>, case_insensitive: bool) -> Self {
        self.content_pattern = Some(pattern.into());
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }
}

/// The first `cap` items of a sequence together with its full length
#[derive(Debug, Clone)]
pub struct Capped<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Capped<T> {
    /// Take at most `cap` items and count the rest
    pub fn collect(iter: impl Iterator<Item = T>, cap: usize) -> Self {
        let mut items = Vec::new();
        let mut total = 0;
        for item in iter {
            if items.len() < cap {
                items.push(item);
            }
            total += 1;
        }
        Self { items, total }
    }

    /// Number of results beyond the cap
    pub fn overflow(&self) -> usize {
        self.total.saturating_sub(self.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transform the kept items, preserving the total
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Capped<U> {
        Capped {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(
            ColorClass::classify(Path::new("run.sh"), Some(0o644)),
            ColorClass::Script
        );
        assert_eq!(
            ColorClass::classify(Path::new("app.YML"), Some(0o644)),
            ColorClass::Config
        );
        assert_eq!(
            ColorClass::classify(Path::new("notes.txt"), Some(0o644)),
            ColorClass::Plain
        );
        assert_eq!(ColorClass::classify(Path::new("Makefile"), None), ColorClass::Plain);
    }

    #[test]
    fn test_classify_extension_before_executable_bit() {
        assert_eq!(
            ColorClass::classify(Path::new("exploit.py"), Some(0o755)),
            ColorClass::Script
        );
        assert_eq!(
            ColorClass::classify(Path::new("sshd.conf"), Some(0o755)),
            ColorClass::Config
        );
        assert_eq!(
            ColorClass::classify(Path::new("nmap"), Some(0o700)),
            ColorClass::Executable
        );
    }

    #[test]
    fn test_from_path_missing_file() {
        let record = FileRecord::from_path("/definitely/not/here.conf", EntryKind::File);
        assert!(!record.has_metadata());
        assert_eq!(record.size, None);
        assert_eq!(record.class, ColorClass::Config);
    }

    #[test]
    fn test_from_path_reads_metadata() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("a.txt");
        std::fs::write(&path, "0123456789").unwrap();

        let record = FileRecord::from_path(&path, EntryKind::File);
        assert_eq!(record.size, Some(10));
        assert!(record.modified.is_some());
        assert!(record.mode.is_some());
    }

    #[test]
    fn test_extension_list_parsing() {
        let req = SearchRequest::new("/").with_extensions(" log, .TXT,,sh ");
        assert_eq!(req.extensions, vec!["log", "txt", "sh"]);
    }

    #[test]
    fn test_capped_reports_overflow() {
        let capped = Capped::collect(0..10, 3);
        assert_eq!(capped.items, vec![0, 1, 2]);
        assert_eq!(capped.total, 10);
        assert_eq!(capped.overflow(), 7);

        let small = Capped::collect(0..2, 3);
        assert_eq!(small.items.len(), 2);
        assert_eq!(small.overflow(), 0);
    }
}
