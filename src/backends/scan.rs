//! Filesystem traversal
//!
//! Uses walkdir with `filter_entry` so excluded subtrees are pruned before
//! they are read. Unreadable subdirectories are skipped.

use log::debug;
use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::error::{MpsaError, Result};
use crate::core::model::{EntryKind, SearchRequest};
use crate::core::paths::ExclusionFilter;

/// Resolve a user supplied root to an absolute, readable directory
pub fn validate_root(root: &Path) -> Result<PathBuf> {
    let invalid = || MpsaError::InvalidRoot(root.to_path_buf());
    let canonical = root.canonicalize().map_err(|_| invalid())?;
    if !canonical.is_dir() {
        return Err(invalid());
    }
    fs::read_dir(&canonical).map_err(|_| invalid())?;
    Ok(canonical)
}

/// Translate a shell glob (`*`, `?`, `[...]`) to an anchored regex
pub fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let close = chars[i + 1..]
                    .iter()
                    .enumerate()
                    .skip(1)
                    .find(|(_, c)| **c == ']')
                    .map(|(offset, _)| i + 1 + offset);
                match close {
                    Some(end) => {
                        out.push('[');
                        let mut body = &chars[i + 1..end];
                        if let Some(('!' | '^', rest)) = body.split_first() {
                            out.push('^');
                            body = rest;
                        }
                        for c in body {
                            match c {
                                '\\' | '[' | ']' | '&' | '~' => {
                                    out.push('\\');
                                    out.push(*c);
                                }
                                _ => out.push(*c),
                            }
                        }
                        out.push(']');
                        i = end;
                    }
                    None => out.push_str(r"\["),
                }
            }
            c => out.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Compile a case-insensitive glob matcher for entry names
pub fn compile_glob(glob: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(&glob_to_regex(glob))
        .case_insensitive(true)
        .build()?)
}

/// True when `glob` contains wildcard characters
pub fn has_wildcards(glob: &str) -> bool {
    glob.contains(['*', '?', '['])
}

/// A recursive walk under one root
#[derive(Debug, Clone)]
pub struct Traversal {
    root: PathBuf,
    kind: EntryKind,
    exclusions: ExclusionFilter,
    name: Option<Regex>,
    extensions: Vec<String>,
}

impl Traversal {
    /// Build a traversal; fails with `InvalidRoot` when the root is unusable
    pub fn new(root: &Path, kind: EntryKind, exclusions: &ExclusionFilter) -> Result<Self> {
        let root = validate_root(root)?;
        let exclusions = exclusions.for_root(&root);
        Ok(Self {
            root,
            kind,
            exclusions,
            name: None,
            extensions: Vec::new(),
        })
    }

    /// Traversal configured from a search request
    pub fn from_request(
        req: &SearchRequest,
        kind: EntryKind,
        exclusions: &ExclusionFilter,
    ) -> Result<Self> {
        let mut traversal = Self::new(&req.root, kind, exclusions)?;
        if let Some(glob) = &req.name_glob {
            traversal = traversal.with_name_glob(glob)?;
        }
        Ok(traversal.with_extensions(req.extensions.clone()))
    }

    pub fn with_name_glob(mut self, glob: &str) -> Result<Self> {
        self.name = Some(compile_glob(glob)?);
        Ok(self)
    }

    /// Only yield files with one of these (lower-case) extensions
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Lazily walk the tree, yielding matching paths in file-name order
    pub fn entries(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                entry.depth() == 0 || !self.exclusions.is_excluded(entry.path())
            })
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    debug!("walk: skipping {}", err);
                    None
                }
            })
            .filter(move |entry| match self.kind {
                EntryKind::File => entry.file_type().is_file(),
                EntryKind::Dir => entry.depth() > 0 && entry.file_type().is_dir(),
            })
            .filter(move |entry| self.matches_name(entry.path()))
            .map(|entry| entry.into_path())
    }

    fn matches_name(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy(),
            None => return false,
        };

        if let Some(re) = &self.name {
            if !re.is_match(&name) {
                return false;
            }
        }

        if self.kind == EntryKind::File && !self.extensions.is_empty() {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase());
            return ext.is_some_and(|e| self.extensions.contains(&e));
        }

        true
    }
}
