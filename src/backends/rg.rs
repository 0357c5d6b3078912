//! ripgrep integration
//!
//! Calls rg with --json over an explicit list of files and converts match
//! events into MatchRecords. Flags are chosen so the output is line-for-line
//! identical to the in-process scanner.

use serde_json::Value;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::backends::matcher::{BatchOutcome, ContentPattern, MatchBackend};
use crate::backends::tools::{ToolError, ToolRegistry, RG};
use crate::core::file_reader::trim_line_ending;
use crate::core::model::MatchRecord;

/// Accelerated content search through `rg`
pub struct Ripgrep<'a> {
    tools: &'a ToolRegistry,
}

impl<'a> Ripgrep<'a> {
    pub fn new(tools: &'a ToolRegistry) -> Self {
        Self { tools }
    }

    /// Check if ripgrep is available
    pub fn is_available(tools: &ToolRegistry) -> bool {
        tools.has(RG)
    }
}

/// Command-line arguments for one rg invocation
pub fn rg_args(files: &[PathBuf], pattern: &ContentPattern) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "--json",
        "--no-config",
        "--text",
        "--crlf",
        "--encoding",
        "none",
        "--case-sensitive",
    ]
    .iter()
    .map(OsString::from)
    .collect();

    if pattern.case_insensitive() {
        args.push("--ignore-case".into());
    }
    args.push("-e".into());
    args.push(pattern.source().into());
    args.push("--".into());
    args.extend(files.iter().map(|f| f.as_os_str().to_os_string()));
    args
}

/// Parsed rg --json stream
#[derive(Debug, Default)]
pub struct RgParse {
    pub records: Vec<MatchRecord>,
    /// Files with lines rg could only report as raw bytes
    pub needs_rescan: HashSet<PathBuf>,
}

/// Convert rg --json output into match records
pub fn parse_rg_json(stdout: &str) -> RgParse {
    let mut parsed = RgParse::default();

    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let v: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(_) => continue,
        };

        if v.get("type").and_then(|t| t.as_str()) != Some("match") {
            continue;
        }

        let data = match v.get("data") {
            Some(d) => d,
            None => continue,
        };

        let path = match data
            .get("path")
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
        {
            Some(p) => PathBuf::from(p),
            None => continue,
        };

        let line_number = match data.get("line_number").and_then(|n| n.as_u64()) {
            Some(n) => n,
            None => continue,
        };

        match data
            .get("lines")
            .and_then(|l| l.get("text"))
            .and_then(|t| t.as_str())
        {
            Some(text) => parsed.records.push(MatchRecord::new(
                path,
                line_number,
                trim_line_ending(text),
            )),
            None => {
                parsed.needs_rescan.insert(path);
            }
        }
    }

    parsed
}

impl MatchBackend for Ripgrep<'_> {
    fn name(&self) -> &'static str {
        "ripgrep"
    }

    fn search_batch(
        &self,
        files: &[PathBuf],
        pattern: &ContentPattern,
    ) -> Result<BatchOutcome, ToolError> {
        let output = self.tools.run(RG, rg_args(files, pattern))?;

        // 0: matches, 1: no matches, 2: some files failed. Anything else
        // (including death by signal) means the output cannot be trusted.
        match output.code() {
            Some(0..=2) => {}
            code => {
                return Err(ToolError::Status {
                    tool: RG.to_string(),
                    code,
                })
            }
        }

        let RgParse {
            records,
            needs_rescan,
        } = parse_rg_json(&output.stdout);

        Ok(BatchOutcome {
            records: records
                .into_iter()
                .filter(|r| !needs_rescan.contains(&r.path))
                .collect(),
            rescan: files
                .iter()
                .filter(|f| needs_rescan.contains(*f))
                .cloned()
                .collect(),
            errors: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rg_args_case_flags() {
        let files = vec![PathBuf::from("/a.txt")];
        let sensitive = ContentPattern::new("PASS", false).unwrap();
        let args = rg_args(&files, &sensitive);
        assert!(!args.contains(&OsString::from("--ignore-case")));
        assert_eq!(args.last(), Some(&OsString::from("/a.txt")));

        let insensitive = ContentPattern::new("PASS", true).unwrap();
        let args = rg_args(&files, &insensitive);
        assert!(args.contains(&OsString::from("--ignore-case")));
    }

    #[test]
    fn test_parse_rg_json() {
        let stdout = concat!(
            r#"{"type":"begin","data":{"path":{"text":"/t/a.txt"}}}"#,
            "\n",
            r#"{"type":"match","data":{"path":{"text":"/t/a.txt"},"lines":{"text":"foo bar\r\n"},"line_number":2,"absolute_offset":4,"submatches":[]}}"#,
            "\n",
            r#"{"type":"match","data":{"path":{"text":"/t/b.txt"},"lines":{"bytes":"/w=="},"line_number":1,"absolute_offset":0,"submatches":[]}}"#,
            "\n",
            r#"{"type":"end","data":{"path":{"text":"/t/a.txt"}}}"#,
            "\n",
            "not json\n"
        );

        let parsed = parse_rg_json(stdout);
        assert_eq!(
            parsed.records,
            vec![MatchRecord::new("/t/a.txt", 2, "foo bar")]
        );
        assert!(parsed.needs_rescan.contains(&PathBuf::from("/t/b.txt")));
    }
}
