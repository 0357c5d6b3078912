//! Main menu loop

use colored::Colorize;
use log::{info, warn};
use std::io::{self, BufRead, Write};

use crate::backends::doctor::{check_dependencies, missing_notice};
use crate::core::error::Result;
use crate::core::util::parse_yes_no;
use crate::flows;
use crate::session::prompt::Prompter;
use crate::session::Session;

const MENU_ITEMS: &[&str] = &[
    "Browse SecLists categories (Top 5 / All)",
    "Exploit search (searchsploit / Metasploit)",
    "Content search",
    "Filename search",
    "Folder search",
    "Wordlists summary",
    "System info (one-shot)",
    "Exit",
];

fn print_menu<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> io::Result<()> {
    writeln!(
        p.out(),
        "\n{}",
        "===== MPSA: PENTEST SEARCH ASSISTANT =====".cyan().bold()
    )?;
    p.menu(MENU_ITEMS)
}

/// List optional tools that are missing and what degrades without them
pub fn startup_check<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> io::Result<()> {
    let notice = missing_notice(&check_dependencies(&session.tools));
    if notice.is_empty() {
        return Ok(());
    }
    p.notice("Some optional tools are missing; features degrade as follows:")?;
    for line in notice {
        p.info(&line)?;
    }
    Ok(())
}

const BACK_TO_MENU: &str = "\nInterrupted by user. Returning to main menu...";

/// Run one action, reporting any error it ends with. Returns true when the
/// action was cut short by Ctrl-C.
fn run_action<R, W, F>(session: &Session, p: &mut Prompter<R, W>, action: &mut F) -> Result<bool>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Session, &mut Prompter<R, W>) -> Result<()>,
{
    let result = action(session, p);
    let interrupted = session.interrupt.take_pending();

    match result {
        Err(e) if e.is_abort() => {
            p.notice(BACK_TO_MENU)?;
            Ok(true)
        }
        Err(e) => {
            warn!("action failed: {}", e);
            p.error(&format!("Error: {}", e))?;
            Ok(false)
        }
        Ok(()) if interrupted => {
            p.notice(BACK_TO_MENU)?;
            Ok(true)
        }
        Ok(()) => Ok(false),
    }
}

/// Repeat `action` until the user declines another run or presses Ctrl-C.
/// Returns false when input ended.
fn persistent_section<R, W, F>(
    session: &Session,
    p: &mut Prompter<R, W>,
    name: &str,
    mut action: F,
) -> Result<bool>
where
    R: BufRead,
    W: Write,
    F: FnMut(&Session, &mut Prompter<R, W>) -> Result<()>,
{
    loop {
        if run_action(session, p, &mut action)? {
            return Ok(true);
        }
        match p.read_line(&format!("Run another {}? (Y/n): ", name)) {
            Ok(None) => return Ok(false),
            Ok(Some(answer)) if !parse_yes_no(&answer, true) => return Ok(true),
            Ok(Some(_)) => {}
            Err(e) if e.is_abort() => {
                p.notice(BACK_TO_MENU)?;
                return Ok(true);
            }
            Err(e) => return Err(e),
        }
    }
}

fn dispatch<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>, choice: &str) -> Result<bool> {
    match choice {
        "1" => persistent_section(session, p, "SecLists browsing", flows::wordlists::browse_seclists::<R, W>),
        "2" => persistent_section(session, p, "exploit search", flows::exploit::run::<R, W>),
        "3" => persistent_section(session, p, "content search", flows::content::run::<R, W>),
        "4" => persistent_section(session, p, "filename search", flows::filename::run::<R, W>),
        "5" => persistent_section(session, p, "folder search", flows::folder::run::<R, W>),
        "6" => persistent_section(session, p, "wordlists summary", flows::wordlists::summary::<R, W>),
        "7" => {
            run_action(session, p, &mut flows::sysinfo::run::<R, W>)?;
            Ok(true)
        }
        _ => {
            p.error("Invalid choice. Try again.")?;
            Ok(true)
        }
    }
}

/// The interactive loop; returns when the user picks Exit or input ends
pub fn run_menu<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<()> {
    info!("Started MPSA session {}", std::process::id());
    startup_check(session, p)?;

    loop {
        print_menu(p)?;
        let choice = match p.read_line("Select option [1-8]: ")? {
            Some(c) if c == "8" => break,
            Some(c) => c,
            None => break,
        };

        // Ctrl-C anywhere inside the section brings the user back here
        session.interrupt.enter_action();
        let more_input = dispatch(session, p, &choice);
        session.interrupt.leave_action();
        if !more_input? {
            break;
        }
    }

    info!("Exit");
    p.success("Bye, happy hunting!")?;
    Ok(())
}
