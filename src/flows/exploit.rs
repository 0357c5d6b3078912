//! Exploit search across searchsploit and Metasploit

use log::info;
use std::io::{BufRead, Write};

use crate::backends::exploit::{default_backends, lookup};
use crate::core::error::{MpsaError, Result};
use crate::core::render::exploit_lines;
use crate::export::ExportKind;
use crate::flows::{ask_pager, offer_export};
use crate::session::prompt::Prompter;
use crate::session::Session;

pub fn run<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<()> {
    p.heading("EXPLOIT SEARCH")?;

    let backends = default_backends();
    if !backends.iter().any(|b| session.tools.has(b.tool())) {
        p.error(&MpsaError::NoLookupBackend.to_string())?;
        p.notice("Install with: sudo apt install exploitdb metasploit-framework")?;
        return Ok(());
    }

    let term = match p.ask_required("Enter exploit search term: ", "Search term required")? {
        Some(term) => term,
        None => return Ok(()),
    };
    let use_pager = ask_pager(p)?;

    info!("EXPLOIT_SEARCH:{}", term);
    p.info(&format!("\nSearching for exploits related to: {}", term))?;

    let blocks = lookup(&session.tools, &backends, &term)?;
    session.check_interrupt()?;

    if blocks.is_empty() {
        p.notice(&format!("No exploits found for '{}'", term))?;
        return Ok(());
    }

    session.presenter().show(&exploit_lines(&blocks), use_pager, p.out())?;

    offer_export(session, p, "Export exploit results?", ExportKind::Exploits, || {
        blocks.iter().flat_map(|b| b.records()).collect()
    })
}
