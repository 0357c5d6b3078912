//! Flows module - one interactive workflow per menu entry
//!
//! Each flow collects its parameters through a `Prompter`, runs the search
//! pipeline (traverse, match, present, export) and returns to the menu.

pub mod content;
pub mod exploit;
pub mod filename;
pub mod folder;
pub mod sysinfo;
pub mod wordlists;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::backends::scan::validate_root;
use crate::core::error::Result;
use crate::export::{export, ExportFormat, ExportKind, ExportRow};
use crate::session::prompt::{Prompter, Target};
use crate::session::Session;

/// `/`, SecLists, Wordlists, the flow's own directories and "Custom path"
pub(crate) fn targets(session: &Session, extra: &[&str]) -> Vec<Target> {
    let mut targets = vec![
        Target::fixed("Whole filesystem", "/"),
        Target::fixed("SecLists", &session.settings.seclists_base),
        Target::fixed("Wordlists", &session.settings.wordlists_dir),
    ];
    targets.extend(extra.iter().map(|dir| Target::fixed(*dir, *dir)));
    targets.push(Target::Custom);
    targets
}

/// Pick a target and check it is a readable directory; `None` ends the flow
pub(crate) fn select_root<R: BufRead, W: Write>(
    session: &Session,
    p: &mut Prompter<R, W>,
    extra: &[&str],
) -> Result<Option<PathBuf>> {
    let root = match p.pick_target(&targets(session, extra))? {
        Some(root) => root,
        None => return Ok(None),
    };
    match validate_root(&root) {
        Ok(root) => Ok(Some(root)),
        Err(e) => {
            p.error(&e.to_string())?;
            Ok(None)
        }
    }
}

pub(crate) fn ask_pager<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<bool> {
    p.confirm("Use pagination (Y/n): ", true)
}

/// CSV / JSON / No menu; export failures are reported and do not end the flow
pub(crate) fn offer_export<R, W, Row, F>(
    session: &Session,
    p: &mut Prompter<R, W>,
    title: &str,
    kind: ExportKind,
    rows: F,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    Row: ExportRow,
    F: FnOnce() -> Vec<Row>,
{
    p.info(&format!("\n{}", title))?;
    p.menu(&["CSV", "JSON", "No"])?;
    let choice = p.ask("Choice [1-3]: ")?;
    let format = match ExportFormat::from_choice(&choice) {
        Some(format) => format,
        None => return Ok(()),
    };

    match export(&session.settings.export_dir, kind, format, &rows()) {
        Ok(path) => p.success(&format!(
            "\nExported {} to: {}",
            format.extension().to_uppercase(),
            path.display()
        ))?,
        Err(e) => p.error(&e.to_string())?,
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::backends::tools::{ToolRegistry, DU, MSFCONSOLE, PAGER, RG, SEARCHSPLOIT};
    use crate::core::settings::Settings;
    use crate::session::Session;
    use std::path::Path;

    /// Session with every optional tool reported missing
    pub fn session_without_tools(export_dir: &Path) -> Session {
        colored::control::set_override(false);
        let settings = Settings {
            export_dir: export_dir.to_path_buf(),
            ..Settings::default()
        };
        let tools = ToolRegistry::with_known(&[
            (RG, false),
            (PAGER, false),
            (DU, false),
            (SEARCHSPLOIT, false),
            (MSFCONSOLE, false),
        ]);
        Session::with_tools(settings, tools)
    }
}
