//! Content search

use log::{debug, info};
use std::io::{BufRead, Write};

use crate::backends::matcher::{ContentMatcher, ContentPattern};
use crate::backends::scan::Traversal;
use crate::core::error::Result;
use crate::core::model::{EntryKind, SearchRequest};
use crate::core::render::match_line;
use crate::export::{ExportKind, MatchRow};
use crate::flows::{ask_pager, offer_export, select_root};
use crate::session::prompt::Prompter;
use crate::session::Session;

pub fn run<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<()> {
    p.heading("CONTENT SEARCH")?;

    let root = match select_root(session, p, &["/var/log"])? {
        Some(root) => root,
        None => return Ok(()),
    };
    let term = match p.ask_required("Search term (regex supported): ", "Search term required")? {
        Some(term) => term,
        None => return Ok(()),
    };
    let extensions = p.ask("Limit by extension (e.g. log,txt,sh) [enter=all]: ")?;
    let case_insensitive = p.confirm("Case-insensitive? (y/N): ", false)?;
    let use_pager = ask_pager(p)?;

    let request = SearchRequest::new(&root)
        .with_extensions(&extensions)
        .with_content_pattern(&term, case_insensitive);
    let pattern = match ContentPattern::for_request(&request)? {
        Some(pattern) => pattern,
        None => return Ok(()),
    };

    info!("CONTENT_SEARCH:{}:{}", root.display(), term);
    p.info(&format!("\nSearching {} in {}", term, root.display()))?;

    let traversal = Traversal::from_request(&request, EntryKind::File, &session.settings.exclusions)?;
    let files: Vec<_> = traversal
        .entries()
        .take_while(|_| !session.is_interrupted())
        .collect();
    session.check_interrupt()?;

    if files.is_empty() {
        p.notice("No files to search in")?;
        return Ok(());
    }

    let matcher = ContentMatcher::select(&session.tools);
    debug!("content search: {} files via {}", files.len(), matcher.backend_name());
    let report = matcher.search(&files, &pattern, || session.is_interrupted())?;
    debug!(
        "content search: {} files searched, {} binary skipped",
        report.files_searched, report.binary_skipped
    );

    for err in &report.errors {
        p.error(&format!("Error searching {}", err))?;
    }
    if report.matches.is_empty() {
        p.notice("No matches found.")?;
        return Ok(());
    }

    let lines: Vec<String> = report
        .matches
        .iter()
        .map(|m| match_line(m, pattern.regex()))
        .collect();
    session.presenter().show(&lines, use_pager, p.out())?;

    offer_export(session, p, "Export results?", ExportKind::Content, || {
        report.matches.iter().map(MatchRow::from_match).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::session_without_tools;
    use crate::session::prompt::scripted;
    use std::fs;
    use tempfile::tempdir;

    fn fixture() -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path().join("fixture");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), "line1\nfoo!\n").unwrap();
        fs::write(root.join("b.bin"), b"foo\x00foo").unwrap();
        temp
    }

    #[test]
    fn test_content_search_exports_json() {
        let temp = fixture();
        let root = temp.path().join("fixture");
        let out_dir = temp.path().join("out");
        let session = session_without_tools(&out_dir);

        let answers = format!("5\n{}\nfoo\n\nn\nn\n2\n", root.display());
        let mut p = scripted(&answers);
        run(&session, &mut p).unwrap();

        let text = String::from_utf8(p.out().clone()).unwrap();
        assert!(text.contains("a.txt:2:foo!"));
        assert!(!text.contains("b.bin"));

        let exported: Vec<_> = fs::read_dir(&out_dir).unwrap().map(|e| e.unwrap().path()).collect();
        assert_eq!(exported.len(), 1);
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&exported[0]).unwrap()).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["line_num"], 2);
        assert_eq!(rows[0]["matched_line"], "foo!");
        assert_eq!(rows[0]["size"], 11);
    }

    #[test]
    fn test_case_insensitive_prompt() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("cfg.ini"), "password=hunter2\n").unwrap();
        let session = session_without_tools(temp.path());

        let sensitive = format!("5\n{}\nPASS\n\nn\nn\n", temp.path().display());
        let mut p = scripted(&sensitive);
        run(&session, &mut p).unwrap();
        assert!(String::from_utf8(p.out().clone()).unwrap().contains("No matches found."));

        let insensitive = format!("5\n{}\nPASS\n\ny\nn\n3\n", temp.path().display());
        let mut p = scripted(&insensitive);
        run(&session, &mut p).unwrap();
        assert!(String::from_utf8(p.out().clone())
            .unwrap()
            .contains("cfg.ini:1:password=hunter2"));
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "x\n").unwrap();
        let session = session_without_tools(temp.path());

        let answers = format!("5\n{}\n(unclosed\n\nn\nn\n", temp.path().display());
        let mut p = scripted(&answers);
        let err = run(&session, &mut p).unwrap_err();
        assert!(err.to_string().starts_with("Invalid pattern"));
    }
}
