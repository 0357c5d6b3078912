//! Folder search with an optional minimum total size

use log::info;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::backends::du::dir_size;
use crate::backends::scan::{has_wildcards, Traversal};
use crate::backends::tools::ToolRegistry;
use crate::core::error::Result;
use crate::core::model::{Capped, EntryKind, FileRecord, SearchRequest};
use crate::core::render::entry_line;
use crate::core::util::parse_size;
use crate::export::{EntryRow, ExportKind};
use crate::flows::{ask_pager, offer_export, select_root};
use crate::session::prompt::Prompter;
use crate::session::Session;

/// A bare word matches anywhere in the name
pub fn folder_glob(pattern: &str) -> String {
    if has_wildcards(pattern) {
        pattern.to_string()
    } else {
        format!("*{}*", pattern)
    }
}

fn sized_record(tools: &ToolRegistry, dir: PathBuf) -> FileRecord {
    let size = dir_size(tools, &dir);
    FileRecord::from_path(dir, EntryKind::Dir).with_size(size)
}

/// Size every directory and keep the first `cap`; with `min_size`, drop
/// directories below it or of unknown size
pub fn collect_folders(
    tools: &ToolRegistry,
    dirs: impl Iterator<Item = PathBuf>,
    min_size: Option<u64>,
    cap: usize,
) -> Capped<FileRecord> {
    match min_size {
        None => Capped::collect(dirs, cap).map(|dir| sized_record(tools, dir)),
        Some(min) => Capped::collect(
            dirs.map(|dir| sized_record(tools, dir))
                .filter(|record| record.size.is_some_and(|size| size >= min)),
            cap,
        ),
    }
}

pub fn run<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<()> {
    p.heading("FOLDER SEARCH")?;

    let root = match select_root(session, p, &["/var/www", "/var/log"])? {
        Some(root) => root,
        None => return Ok(()),
    };
    let pattern = match p.ask_required(
        "Folder name pattern (supports wildcards, e.g. '*backup*'): ",
        "Pattern required",
    )? {
        Some(pattern) => pattern,
        None => return Ok(()),
    };
    let min_text = p.ask("Minimum size (e.g. 10M) [enter=any]: ")?;
    let min_size = if min_text.is_empty() {
        None
    } else {
        match parse_size(&min_text) {
            Some(bytes) => Some(bytes),
            None => {
                p.error(&format!("Invalid size: {}", min_text))?;
                return Ok(());
            }
        }
    };
    let use_pager = ask_pager(p)?;

    info!("FOLDER_SEARCH:{}:{}:minsize={}", root.display(), pattern, min_text);
    p.info(&format!("\nSearching folders {} in {}", pattern, root.display()))?;

    let request = SearchRequest::new(&root)
        .with_name_glob(folder_glob(&pattern))
        .with_cap(session.settings.max_results);
    let traversal = Traversal::from_request(&request, EntryKind::Dir, &session.settings.exclusions)?;
    let found = collect_folders(
        &session.tools,
        traversal.entries().take_while(|_| !session.is_interrupted()),
        min_size,
        request.cap,
    );
    session.check_interrupt()?;

    if found.is_empty() {
        p.notice("No matching folders found.")?;
        return Ok(());
    }
    if found.overflow() > 0 {
        p.notice(&format!(
            "\nShowing first {} of {} results",
            found.items.len(),
            found.total
        ))?;
    }

    let lines: Vec<String> = found.items.iter().map(entry_line).collect();
    session.presenter().show(&lines, use_pager, p.out())?;

    offer_export(session, p, "Export folder results?", ExportKind::Folders, || {
        found.items.iter().map(EntryRow::from).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::tools::DU;
    use crate::core::paths::ExclusionFilter;
    use crate::flows::testing::session_without_tools;
    use crate::session::prompt::scripted;
    use std::fs::{self, File};
    use tempfile::tempdir;

    const TEN_MIB: u64 = 10 * 1024 * 1024;

    fn sparse(path: &std::path::Path, len: u64) {
        File::create(path).unwrap().set_len(len).unwrap();
    }

    #[test]
    fn test_folder_glob() {
        assert_eq!(folder_glob("backup"), "*backup*");
        assert_eq!(folder_glob("back*"), "back*");
    }

    #[test]
    fn test_min_size_ten_mib() {
        let temp = tempdir().unwrap();
        let big = temp.path().join("big_backup");
        let exact = temp.path().join("exact_backup");
        let small = temp.path().join("small_backup");
        for dir in [&big, &exact, &small] {
            fs::create_dir(dir).unwrap();
        }
        sparse(&big.join("dump.sql"), TEN_MIB + 1);
        sparse(&exact.join("dump.sql"), TEN_MIB);
        sparse(&small.join("dump.sql"), TEN_MIB / 2);

        let tools = ToolRegistry::with_known(&[(DU, false)]);
        let traversal = Traversal::new(temp.path(), EntryKind::Dir, &ExclusionFilter::default())
            .unwrap()
            .with_name_glob("*backup*")
            .unwrap();
        let found = collect_folders(&tools, traversal.entries(), parse_size("10M"), 200);

        let names: Vec<_> = found
            .items
            .iter()
            .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["big_backup", "exact_backup"]);
        assert!(found.items.iter().all(|r| r.size.unwrap() >= TEN_MIB));
    }

    #[test]
    fn test_without_min_size_only_capped_dirs_are_sized() {
        let temp = tempdir().unwrap();
        for i in 0..4 {
            fs::create_dir(temp.path().join(format!("d{}", i))).unwrap();
        }
        let tools = ToolRegistry::with_known(&[(DU, false)]);
        let traversal = Traversal::new(temp.path(), EntryKind::Dir, &ExclusionFilter::default()).unwrap();
        let found = collect_folders(&tools, traversal.entries(), None, 2);
        assert_eq!(found.items.len(), 2);
        assert_eq!(found.overflow(), 2);
        assert!(found.items.iter().all(|r| r.size == Some(0)));
    }

    #[test]
    fn test_folder_flow_rejects_bad_size() {
        let temp = tempdir().unwrap();
        let session = session_without_tools(temp.path());
        let answers = format!("6\n{}\nbackup\nlots\n", temp.path().display());
        let mut p = scripted(&answers);
        run(&session, &mut p).unwrap();
        let text = String::from_utf8(p.out().clone()).unwrap();
        assert!(text.contains("Invalid size: lots"));
    }

    #[test]
    fn test_folder_flow_lists_matches() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("www/site_backup")).unwrap();
        fs::create_dir_all(temp.path().join("www/logs")).unwrap();
        let session = session_without_tools(temp.path());

        let answers = format!("6\n{}\nBACKUP\n\nn\n3\n", temp.path().display());
        let mut p = scripted(&answers);
        run(&session, &mut p).unwrap();
        let text = String::from_utf8(p.out().clone()).unwrap();
        assert!(text.contains("site_backup"));
        assert!(!text.contains("www/logs"));
    }
}
