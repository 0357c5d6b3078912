//! Exploit database lookup
//!
//! Queries searchsploit first and Metasploit second. Each backend that
//! produces output contributes one labelled block.

use log::{debug, warn};

use crate::backends::tools::{ToolError, ToolRegistry, MSFCONSOLE, SEARCHSPLOIT};
use crate::core::error::{MpsaError, Result};
use crate::core::model::ExploitRecord;

/// Output of one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploitBlock {
    pub source: &'static str,
    pub lines: Vec<String>,
}

impl ExploitBlock {
    pub fn header(&self) -> String {
        format!("Results from {}:", self.source)
    }

    /// Export rows; blank lines and `===` separators are dropped
    pub fn records(&self) -> impl Iterator<Item = ExploitRecord> + '_ {
        self.lines
            .iter()
            .filter(|l| !l.trim().is_empty() && !l.starts_with("==="))
            .map(|l| ExploitRecord {
                source: self.source.to_string(),
                result: l.clone(),
            })
    }
}

/// An exploit-database backend
pub trait ExploitBackend {
    /// Label shown above this backend's results
    fn label(&self) -> &'static str;

    fn tool(&self) -> &'static str;

    /// Raw result lines for `term`; empty when nothing was found
    fn search(&self, tools: &ToolRegistry, term: &str) -> std::result::Result<Vec<String>, ToolError>;
}

/// Offline Exploit-DB via `searchsploit`
pub struct Searchsploit;

impl ExploitBackend for Searchsploit {
    fn label(&self) -> &'static str {
        "searchsploit"
    }

    fn tool(&self) -> &'static str {
        SEARCHSPLOIT
    }

    fn search(&self, tools: &ToolRegistry, term: &str) -> std::result::Result<Vec<String>, ToolError> {
        let output = tools.run(SEARCHSPLOIT, [term])?;
        if output.code().is_none() {
            return Err(ToolError::Status {
                tool: SEARCHSPLOIT.to_string(),
                code: None,
            });
        }
        Ok(output.lines())
    }
}

/// Module search through `msfconsole`
pub struct Metasploit;

impl ExploitBackend for Metasploit {
    fn label(&self) -> &'static str {
        "Metasploit"
    }

    fn tool(&self) -> &'static str {
        MSFCONSOLE
    }

    fn search(&self, tools: &ToolRegistry, term: &str) -> std::result::Result<Vec<String>, ToolError> {
        let command = format!("search {}; exit", term);
        let output = tools.run_checked(MSFCONSOLE, ["-q", "-x", command.as_str()])?;
        Ok(parse_msf_output(&output.stdout))
    }
}

/// Best-effort scrape of the msfconsole module table.
///
/// Takes the lines after the first `=====` rule up to the next blank line.
/// Blank lines directly after the rule are skipped. Yields nothing when the
/// layout is not recognised.
pub fn parse_msf_output(stdout: &str) -> Vec<String> {
    let mut lines = stdout.lines();
    if !lines.by_ref().any(|l| l.contains("=====")) {
        return Vec::new();
    }

    lines
        .map(|l| l.trim_end())
        .skip_while(|l| l.is_empty())
        .take_while(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Backends in priority order
pub fn default_backends() -> Vec<Box<dyn ExploitBackend>> {
    vec![Box::new(Searchsploit), Box::new(Metasploit)]
}

/// Query every available backend and keep the non-empty blocks.
///
/// Fails with `NoLookupBackend` only when none of the backends is installed.
pub fn lookup(
    tools: &ToolRegistry,
    backends: &[Box<dyn ExploitBackend>],
    term: &str,
) -> Result<Vec<ExploitBlock>> {
    let available: Vec<_> = backends.iter().filter(|b| tools.has(b.tool())).collect();
    if available.is_empty() {
        return Err(MpsaError::NoLookupBackend);
    }

    let mut blocks = Vec::new();
    for backend in available {
        match backend.search(tools, term) {
            Ok(lines) if lines.iter().any(|l| !l.trim().is_empty()) => {
                debug!("{}: {} lines", backend.label(), lines.len());
                blocks.push(ExploitBlock {
                    source: backend.label(),
                    lines,
                });
            }
            Ok(_) => debug!("{}: no output", backend.label()),
            Err(e) => warn!("{} lookup failed: {}", backend.label(), e),
        }
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned {
        label: &'static str,
        tool: &'static str,
        lines: Vec<&'static str>,
    }

    impl ExploitBackend for Canned {
        fn label(&self) -> &'static str {
            self.label
        }

        fn tool(&self) -> &'static str {
            self.tool
        }

        fn search(&self, _tools: &ToolRegistry, _term: &str) -> std::result::Result<Vec<String>, ToolError> {
            Ok(self.lines.iter().map(|l| l.to_string()).collect())
        }
    }

    fn canned(label: &'static str, tool: &'static str, lines: Vec<&'static str>) -> Box<dyn ExploitBackend> {
        Box::new(Canned { label, tool, lines })
    }

    #[test]
    fn test_parse_msf_output() {
        let stdout = "\
Matching Modules
================

   #  Name                                  Disclosure Date  Rank
   -  ----                                  ---------------  ----
   0  exploit/unix/ftp/vsftpd_234_backdoor  2011-07-03       excellent

Interact with a module by name or index.
";
        let lines = parse_msf_output(stdout);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Name"));
        assert!(lines[2].contains("vsftpd_234_backdoor"));
    }

    #[test]
    fn test_parse_msf_output_unrecognised() {
        assert!(parse_msf_output("[-] No results from search\n").is_empty());
        assert!(parse_msf_output("").is_empty());
    }

    #[test]
    fn test_lookup_orders_and_omits_empty() {
        let tools = ToolRegistry::with_known(&[("fake-a", true), ("fake-b", true), ("fake-c", true)]);
        let backends = vec![
            canned("first", "fake-a", vec!["a1", "a2"]),
            canned("empty", "fake-b", vec!["", "  "]),
            canned("second", "fake-c", vec!["c1"]),
        ];

        let blocks = lookup(&tools, &backends, "vsftpd").unwrap();
        let sources: Vec<_> = blocks.iter().map(|b| b.source).collect();
        assert_eq!(sources, vec!["first", "second"]);
        assert_eq!(blocks[0].header(), "Results from first:");
    }

    #[test]
    fn test_lookup_skips_missing_backend() {
        let tools = ToolRegistry::with_known(&[("fake-a", false), ("fake-c", true)]);
        let backends = vec![
            canned("first", "fake-a", vec!["a1"]),
            canned("second", "fake-c", vec!["c1"]),
        ];
        let blocks = lookup(&tools, &backends, "x").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source, "second");
    }

    #[test]
    fn test_no_backend_available() {
        let tools = ToolRegistry::with_known(&[(SEARCHSPLOIT, false), (MSFCONSOLE, false)]);
        let err = lookup(&tools, &default_backends(), "apache").unwrap_err();
        assert!(matches!(err, MpsaError::NoLookupBackend));
    }

    #[test]
    fn test_block_records_drop_separators() {
        let block = ExploitBlock {
            source: "searchsploit",
            lines: vec![
                "-------- ----".to_string(),
                " Exploit Title | Path".to_string(),
                "===".to_string(),
                String::new(),
                "vsftpd 2.3.4 - Backdoor | unix/remote/49757.py".to_string(),
            ],
        };
        let records: Vec<_> = block.records().collect();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.source == "searchsploit"));
    }
}
