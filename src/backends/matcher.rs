//! Content matching over a list of candidate files
//!
//! Binary files are skipped and unreadable files are reported per file; the
//! remaining text files go to a `MatchBackend`. The default backend scans lines
//! in-process; `rg` is used instead when it is installed. Both produce the same
//! `(path, line number, line text)` triples.

use log::{debug, warn};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::backends::rg::Ripgrep;
use crate::backends::tools::{ToolError, ToolRegistry};
use crate::core::error::{MpsaError, Result};
use crate::core::file_reader::{matching_lines, sniff, Sniff};
use crate::core::model::{MatchRecord, SearchRequest};

/// Files handed to a backend per invocation
const BATCH_SIZE: usize = 64;

/// A compiled content pattern
#[derive(Debug, Clone)]
pub struct ContentPattern {
    source: String,
    case_insensitive: bool,
    regex: Regex,
}

impl ContentPattern {
    pub fn new(source: &str, case_insensitive: bool) -> Result<Self> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self {
            source: source.to_string(),
            case_insensitive,
            regex,
        })
    }

    /// The request's content pattern, if it has one
    pub fn for_request(request: &SearchRequest) -> Result<Option<Self>> {
        request
            .content_pattern
            .as_deref()
            .map(|source| Self::new(source, request.case_insensitive))
            .transpose()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// What a backend produced for one batch of text files
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<MatchRecord>,
    /// Files the backend could not report faithfully; scanned in-process
    pub rescan: Vec<PathBuf>,
    pub errors: Vec<MpsaError>,
}

/// A line-oriented search implementation
pub trait MatchBackend {
    fn name(&self) -> &'static str;

    fn search_batch(
        &self,
        files: &[PathBuf],
        pattern: &ContentPattern,
    ) -> std::result::Result<BatchOutcome, ToolError>;
}

/// The default in-process line scanner
#[derive(Debug, Default, Clone, Copy)]
pub struct LineScanner;

impl LineScanner {
    fn scan(&self, files: &[PathBuf], pattern: &ContentPattern) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for path in files {
            match matching_lines(path, pattern.regex()) {
                Ok(hits) => outcome.records.extend(
                    hits.into_iter()
                        .map(|(n, line)| MatchRecord::new(path.clone(), n, line)),
                ),
                Err(e) => outcome.errors.push(MpsaError::per_file(path, e.to_string())),
            }
        }
        outcome
    }
}

impl MatchBackend for LineScanner {
    fn name(&self) -> &'static str {
        "line scanner"
    }

    fn search_batch(
        &self,
        files: &[PathBuf],
        pattern: &ContentPattern,
    ) -> std::result::Result<BatchOutcome, ToolError> {
        Ok(self.scan(files, pattern))
    }
}

/// Result of a content search
#[derive(Debug, Default)]
pub struct ContentReport {
    pub matches: Vec<MatchRecord>,
    /// Non-fatal per-file failures
    pub errors: Vec<MpsaError>,
    pub binary_skipped: usize,
    pub files_searched: usize,
}

/// Runs a pattern over candidate files with the best available backend
pub struct ContentMatcher<'a> {
    backend: Box<dyn MatchBackend + 'a>,
}

impl<'a> ContentMatcher<'a> {
    /// Prefer rg when installed, else the in-process scanner
    pub fn select(tools: &'a ToolRegistry) -> Self {
        if Ripgrep::is_available(tools) {
            Self::with_backend(Box::new(Ripgrep::new(tools)))
        } else {
            Self::line_scanner()
        }
    }

    pub fn line_scanner() -> Self {
        Self::with_backend(Box::new(LineScanner))
    }

    pub fn with_backend(backend: Box<dyn MatchBackend + 'a>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Search `files` in order.
    ///
    /// `should_stop` is polled between batches; when it returns true the
    /// search ends with `UserAbort`.
    pub fn search(
        &self,
        files: &[PathBuf],
        pattern: &ContentPattern,
        should_stop: impl Fn() -> bool,
    ) -> Result<ContentReport> {
        let mut report = ContentReport::default();

        for chunk in files.chunks(BATCH_SIZE) {
            if should_stop() {
                return Err(MpsaError::UserAbort);
            }

            let mut text_files = Vec::with_capacity(chunk.len());
            let mut rescan = Vec::new();
            for path in chunk {
                match sniff(path) {
                    Ok(Sniff::Text) if path.to_str().is_some() => text_files.push(path.clone()),
                    Ok(Sniff::Text) => rescan.push(path.clone()),
                    Ok(Sniff::Binary) => report.binary_skipped += 1,
                    Err(e) => {
                        warn!("read failed: {}: {}", path.display(), e);
                        report.errors.push(MpsaError::per_file(path, e.to_string()));
                    }
                }
            }
            report.files_searched += text_files.len() + rescan.len();

            let mut outcome = match self.backend.search_batch(&text_files, pattern) {
                Ok(outcome) => outcome,
                Err(e) => {
                    debug!("{} failed ({}), scanning batch in-process", self.backend.name(), e);
                    LineScanner.scan(&text_files, pattern)
                }
            };
            rescan.append(&mut outcome.rescan);
            if !rescan.is_empty() {
                let extra = LineScanner.scan(&rescan, pattern);
                outcome.records.extend(extra.records);
                outcome.errors.extend(extra.errors);
            }

            report.matches.extend(order_records(chunk, outcome.records));
            report.errors.extend(outcome.errors);
        }

        Ok(report)
    }
}

/// Sort records by the position of their file in `order`, then by line
fn order_records(order: &[PathBuf], mut records: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let position: HashMap<&PathBuf, usize> =
        order.iter().enumerate().map(|(i, p)| (p, i)).collect();
    records.sort_by_key(|r| {
        (
            position.get(&r.path).copied().unwrap_or(usize::MAX),
            r.line_number,
        )
    });
    records
}
