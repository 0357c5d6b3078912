//! CSV / JSON export of result sets
//!
//! Files are written to a temporary file in the export directory and moved
//! into place only when complete, so an interrupted or failed export leaves
//! nothing behind. Existing files are never overwritten.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::core::error::{MpsaError, Result};
use crate::core::model::{EntryKind, ExploitRecord, FileRecord, MatchRecord};
use crate::core::util::format_mtime;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Menu answer: `1` CSV, `2` JSON, anything else means no export
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(ExportFormat::Csv),
            "2" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Which search produced the result set; selects the file name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Files,
    Folders,
    Content,
    Exploits,
}

impl ExportKind {
    pub fn prefix(self) -> &'static str {
        match self {
            ExportKind::Files => "mpsa_files_",
            ExportKind::Folders => "mpsa_folders_",
            ExportKind::Content => "mpsa_export_",
            ExportKind::Exploits => "mpsa_exploits_",
        }
    }
}

/// A record that can be written as one CSV row or one JSON object
pub trait ExportRow: Serialize {
    const HEADER: &'static [&'static str];

    /// Fields in `HEADER` order; unknown values are empty strings
    fn csv_fields(&self) -> Vec<String>;
}

/// Row for filename and folder search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRow {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtime: Option<String>,
}

impl From<&FileRecord> for EntryRow {
    fn from(record: &FileRecord) -> Self {
        Self {
            path: record.path.to_string_lossy().into_owned(),
            size: record.size,
            mtime: record.modified.as_ref().map(format_mtime),
        }
    }
}

impl ExportRow for EntryRow {
    const HEADER: &'static [&'static str] = &["path", "size", "mtime"];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.path.clone(),
            self.size.map(|s| s.to_string()).unwrap_or_default(),
            self.mtime.clone().unwrap_or_default(),
        ]
    }
}

/// Row for content search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRow {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtime: Option<String>,
    pub line_num: u64,
    pub matched_line: String,
}

impl MatchRow {
    /// Pair a match with a fresh stat of its file
    pub fn from_match(record: &MatchRecord) -> Self {
        let meta = FileRecord::from_path(&record.path, EntryKind::File);
        Self {
            path: record.path.to_string_lossy().into_owned(),
            size: meta.size,
            mtime: meta.modified.as_ref().map(format_mtime),
            line_num: record.line_number,
            matched_line: record.line.clone(),
        }
    }
}

impl ExportRow for MatchRow {
    const HEADER: &'static [&'static str] = &["path", "size", "mtime", "line_num", "matched_line"];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.path.clone(),
            self.size.map(|s| s.to_string()).unwrap_or_default(),
            self.mtime.clone().unwrap_or_default(),
            self.line_num.to_string(),
            self.matched_line.clone(),
        ]
    }
}

impl ExportRow for ExploitRecord {
    const HEADER: &'static [&'static str] = &["source", "result"];

    fn csv_fields(&self) -> Vec<String> {
        vec![self.source.clone(), self.result.clone()]
    }
}

fn write_csv<R: ExportRow, W: Write>(rows: &[R], out: W) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(R::HEADER)?;
    for row in rows {
        writer.write_record(row.csv_fields())?;
    }
    writer.flush()?;
    Ok(())
}

/// Serialize `rows` in `format`
pub fn write_rows<R: ExportRow, W: Write>(rows: &[R], format: ExportFormat, mut out: W) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(rows, out).map_err(|e| MpsaError::Export(e.to_string())),
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, rows)
                .map_err(|e| MpsaError::Export(e.to_string()))?;
            out.write_all(b"\n")?;
            Ok(())
        }
    }
}

/// `<prefix><unix seconds>[_<n>].<ext>`
pub fn export_file_name(kind: ExportKind, format: ExportFormat, timestamp: i64, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}{}.{}", kind.prefix(), timestamp, format.extension())
    } else {
        format!(
            "{}{}_{}.{}",
            kind.prefix(),
            timestamp,
            attempt,
            format.extension()
        )
    }
}

const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Write `rows` into `dir` and return the path of the new file
pub fn export<R: ExportRow>(
    dir: &Path,
    kind: ExportKind,
    format: ExportFormat,
    rows: &[R],
) -> Result<PathBuf> {
    let fail = |e: io::Error| MpsaError::Export(format!("{}: {}", dir.display(), e));

    fs::create_dir_all(dir).map_err(fail)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(fail)?;
    write_rows(rows, format, tmp.as_file_mut())?;
    tmp.as_file().sync_all().map_err(fail)?;

    let timestamp = chrono::Local::now().timestamp();
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let target = dir.join(export_file_name(kind, format, timestamp, attempt));
        match tmp.persist_noclobber(&target) {
            Ok(_) => {
                info!("EXPORT:{}:{} rows", target.display(), rows.len());
                return Ok(target);
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => tmp = e.file,
            Err(e) => return Err(fail(e.error)),
        }
    }

    Err(MpsaError::Export(format!(
        "no free file name for {} in {}",
        kind.prefix(),
        dir.display()
    )))
}
