//! Filename search

use log::info;
use std::io::{BufRead, Write};

use crate::backends::scan::Traversal;
use crate::core::error::Result;
use crate::core::model::{Capped, EntryKind, FileRecord, SearchRequest};
use crate::core::render::entry_line;
use crate::export::{EntryRow, ExportKind};
use crate::flows::{ask_pager, offer_export, select_root};
use crate::session::prompt::Prompter;
use crate::session::Session;

pub fn run<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<()> {
    p.heading("FILENAME SEARCH")?;

    let root = match select_root(session, p, &["/etc", "/var/log"])? {
        Some(root) => root,
        None => return Ok(()),
    };
    let pattern = match p.ask_required(
        "Filename pattern (supports wildcards, e.g. passwd, *.conf): ",
        "Pattern required",
    )? {
        Some(pattern) => pattern,
        None => return Ok(()),
    };
    let extensions = p.ask("Limit to extension (e.g. log,txt) [enter=all]: ")?;
    let use_pager = ask_pager(p)?;

    info!("FILENAME_SEARCH:{}:{}", root.display(), pattern);
    p.info(&format!("\nSearching for {} in {}", pattern, root.display()))?;

    let request = SearchRequest::new(&root)
        .with_name_glob(format!("*{}*", pattern))
        .with_extensions(&extensions)
        .with_cap(session.settings.max_results);
    let traversal = Traversal::from_request(&request, EntryKind::File, &session.settings.exclusions)?;
    let found = Capped::collect(
        traversal.entries().take_while(|_| !session.is_interrupted()),
        request.cap,
    );
    session.check_interrupt()?;

    if found.is_empty() {
        p.notice("No files found matching pattern")?;
        return Ok(());
    }
    if found.overflow() > 0 {
        p.notice(&format!(
            "\nShowing first {} of {} results",
            found.items.len(),
            found.total
        ))?;
    }

    let records = found.map(|path| FileRecord::from_path(path, EntryKind::File)).items;
    let lines: Vec<String> = records.iter().map(entry_line).collect();
    session.presenter().show(&lines, use_pager, p.out())?;

    offer_export(session, p, "Export filename results?", ExportKind::Files, || {
        records.iter().map(EntryRow::from).collect()
    })
}
