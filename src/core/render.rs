//! Renderer module
//!
//! Turns records into colored display lines and decides how they reach the
//! terminal: through `less`, as a truncated direct print, or as a
//! "no results" notice.

use colored::{ColoredString, Colorize};
use log::warn;
use regex::Regex;
use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::backends::exploit::ExploitBlock;
use crate::backends::tools::{ToolRegistry, PAGER};
use crate::core::model::{ColorClass, EntryKind, FileRecord, MatchRecord};
use crate::core::settings::PAGE_SIZE;
use crate::core::util::{fit_column, format_mode, format_mtime, human_size, truncate_string};

/// Display width of the path column
pub const PATH_COLUMN: usize = 110;

/// Longest match line shown before it is cut
const MAX_LINE_BYTES: usize = 500;

const PAGER_ARGS: &[&str] = &["-R", "-N", "-S", "-F", "-X"];

fn paint(text: &str, class: ColorClass) -> ColoredString {
    match class {
        ColorClass::Executable => text.red(),
        ColorClass::Script => text.cyan(),
        ColorClass::Config => text.yellow(),
        ColorClass::Plain => text.green(),
    }
}

/// One line for a file or directory record
pub fn entry_line(record: &FileRecord) -> String {
    let path = record.path.to_string_lossy();
    let column = fit_column(&path, PATH_COLUMN);
    let column = match record.kind {
        EntryKind::File => paint(&column, record.class),
        EntryKind::Dir => column.cyan(),
    };

    if !record.has_metadata() {
        return format!("{} {}", column, "(metadata unavailable)".red());
    }

    let size = record.size.map(human_size).unwrap_or_else(|| "-".to_string());
    let mtime = record.modified.as_ref().map(format_mtime).unwrap_or_default();
    let perms = record.mode.map(format_mode).unwrap_or_else(|| "---".to_string());

    format!(
        "{} {} {:<6} {} {:<19} {} {}",
        column,
        "Size:".yellow(),
        size,
        "Modified:".yellow(),
        mtime,
        "Perms:".yellow(),
        perms
    )
}

/// Byte ranges of the non-empty matches of `pattern` in `line`
pub fn match_spans(line: &str, pattern: &Regex) -> Vec<(usize, usize)> {
    pattern
        .find_iter(line)
        .filter(|m| m.start() < m.end())
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Mark every match of `pattern` in `line` bold red
pub fn highlight(line: &str, pattern: &Regex) -> String {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for (start, end) in match_spans(line, pattern) {
        out.push_str(&line[last..start]);
        out.push_str(&line[start..end].red().bold().to_string());
        last = end;
    }
    out.push_str(&line[last..]);
    out
}

/// `path:line:text` with the matched parts highlighted
pub fn match_line(record: &MatchRecord, pattern: &Regex) -> String {
    let (text, truncated) = truncate_string(&record.line, MAX_LINE_BYTES);
    let mut rendered = format!(
        "{}:{}:{}",
        record.path.to_string_lossy().green(),
        record.line_number.to_string().yellow(),
        highlight(&text, pattern)
    );
    if truncated {
        rendered.push_str(" ...");
    }
    rendered
}

/// Header line followed by the block's output, blocks separated by a blank line
pub fn exploit_lines(blocks: &[ExploitBlock]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(block.header().yellow().bold().to_string());
        lines.extend(block.lines.iter().cloned());
    }
    lines
}

/// How a set of display lines is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPlan {
    Empty,
    Pager,
    Direct { shown: usize, remaining: usize },
}

/// Decide between pager, truncated print and the empty notice
pub fn plan_display(lines: usize, pager_requested: bool, pager_available: bool) -> DisplayPlan {
    if lines == 0 {
        DisplayPlan::Empty
    } else if pager_requested && pager_available && lines > PAGE_SIZE {
        DisplayPlan::Pager
    } else {
        let shown = lines.min(PAGE_SIZE);
        DisplayPlan::Direct {
            shown,
            remaining: lines - shown,
        }
    }
}

/// Writes display lines to the terminal
pub struct Presenter<'a> {
    tools: &'a ToolRegistry,
    pager_enabled: bool,
}

impl<'a> Presenter<'a> {
    pub fn new(tools: &'a ToolRegistry, pager_enabled: bool) -> Self {
        Self {
            tools,
            pager_enabled,
        }
    }

    /// Show `lines`, paging when asked for and possible
    pub fn show<W: Write>(&self, lines: &[String], use_pager: bool, out: &mut W) -> io::Result<()> {
        let requested = use_pager && self.pager_enabled;
        let available = requested && self.tools.has(PAGER);

        match plan_display(lines.len(), requested, available) {
            DisplayPlan::Empty => writeln!(out, "{}", "No results to display".yellow()),
            DisplayPlan::Pager => {
                out.flush()?;
                match page(lines) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        warn!("pager failed: {}", e);
                        writeln!(out, "{}", format!("Pager error: {}", e).red())?;
                        let shown = lines.len().min(PAGE_SIZE);
                        print_direct(&lines[..shown], lines.len() - shown, out)
                    }
                }
            }
            DisplayPlan::Direct { shown, remaining } => print_direct(&lines[..shown], remaining, out),
        }
    }
}

fn print_direct<W: Write>(lines: &[String], remaining: usize, out: &mut W) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    if remaining > 0 {
        writeln!(
            out,
            "\n{}",
            format!(
                "Showing first {} of {} lines",
                lines.len(),
                lines.len() + remaining
            )
            .yellow()
        )?;
    }
    Ok(())
}

/// Feed lines to `less` on stdin and wait for the user to quit it
fn page(lines: &[String]) -> io::Result<()> {
    let mut child = Command::new(PAGER)
        .args(PAGER_ARGS)
        .stdin(Stdio::piped())
        .spawn()?;

    if let Some(mut stdin) = child.stdin.take() {
        for line in lines {
            match writeln!(stdin, "{}", line) {
                Ok(()) => {}
                // user quit before reading everything
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => break,
                Err(e) => return Err(e),
            }
        }
    }

    child.wait()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::path::PathBuf;

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_plan_display() {
        assert_eq!(plan_display(0, true, true), DisplayPlan::Empty);
        assert_eq!(plan_display(40, true, true), DisplayPlan::Pager);
        assert_eq!(
            plan_display(40, true, false),
            DisplayPlan::Direct {
                shown: 25,
                remaining: 15
            }
        );
        assert_eq!(
            plan_display(40, false, true),
            DisplayPlan::Direct {
                shown: 25,
                remaining: 15
            }
        );
        assert_eq!(
            plan_display(10, true, true),
            DisplayPlan::Direct {
                shown: 10,
                remaining: 0
            }
        );
    }

    #[test]
    fn test_show_direct_reports_remaining() {
        no_color();
        let tools = ToolRegistry::with_known(&[(PAGER, false)]);
        let presenter = Presenter::new(&tools, true);
        let lines: Vec<String> = (1..=30).map(|i| format!("line {}", i)).collect();

        let mut out = Vec::new();
        presenter.show(&lines, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("line 25\n"));
        assert!(!text.contains("line 26"));
        assert!(text.contains("Showing first 25 of 30 lines"));
    }

    #[test]
    fn test_show_empty() {
        no_color();
        let tools = ToolRegistry::with_known(&[(PAGER, true)]);
        let presenter = Presenter::new(&tools, true);
        let mut out = Vec::new();
        presenter.show(&[], true, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No results to display\n");
    }

    #[test]
    fn test_highlight_follows_case_setting() {
        let sensitive = Regex::new("pass").unwrap();
        assert_eq!(match_spans("PASS pass", &sensitive), vec![(5, 9)]);

        let insensitive = regex::RegexBuilder::new("pass")
            .case_insensitive(true)
            .build()
            .unwrap();
        assert_eq!(match_spans("PASS pass", &insensitive), vec![(0, 4), (5, 9)]);
        assert!(match_spans("abc", &Regex::new("x*").unwrap()).is_empty());

        no_color();
        assert_eq!(highlight("PASS pass", &insensitive), "PASS pass");
    }

    #[test]
    fn test_match_line_plain() {
        no_color();
        let re = Regex::new("foo").unwrap();
        let record = MatchRecord::new("/tmp/fixture/a.txt", 2, "foo!");
        assert_eq!(match_line(&record, &re), "/tmp/fixture/a.txt:2:foo!");
    }

    #[test]
    fn test_entry_line_columns() {
        no_color();
        let record = FileRecord {
            path: PathBuf::from("/etc/passwd"),
            kind: EntryKind::File,
            size: Some(2048),
            modified: Some(Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            mode: Some(0o644),
            class: ColorClass::Plain,
        };
        let line = entry_line(&record);
        assert!(line.starts_with("/etc/passwd "));
        assert!(line.ends_with("Size: 2.0K   Modified: 2024-01-02 03:04:05 Perms: 644"));
    }

    #[test]
    fn test_entry_line_missing_metadata() {
        no_color();
        let record = FileRecord::missing("/gone.txt", EntryKind::File);
        assert!(entry_line(&record).ends_with("(metadata unavailable)"));
    }

    #[test]
    fn test_exploit_lines() {
        no_color();
        let blocks = vec![
            ExploitBlock {
                source: "searchsploit",
                lines: vec!["a".to_string()],
            },
            ExploitBlock {
                source: "Metasploit",
                lines: vec!["b".to_string()],
            },
        ];
        assert_eq!(
            exploit_lines(&blocks),
            vec![
                "Results from searchsploit:",
                "a",
                "",
                "Results from Metasploit:",
                "b"
            ]
        );
    }
}
