//! System information screen

use std::io::{BufRead, Write};

use crate::backends::doctor::check_dependencies;
use crate::core::error::Result;
use crate::flows::wordlists::{count_entries, count_files, CATEGORIES};
use crate::session::prompt::Prompter;
use crate::session::Session;

pub fn run<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<()> {
    let settings = &session.settings;
    p.heading("SYSTEM INFORMATION")?;

    p.info(&format!("SecLists Location: {}", settings.seclists_base.display()))?;
    if settings.seclists_base.is_dir() {
        p.success("SecLists is installed")?;
        p.info(&format!("Total categories: {}", CATEGORIES.len()))?;
        for category in CATEGORIES {
            let path = settings.seclists_base.join(category.subdir);
            let count = if path.is_dir() {
                count_entries(&path)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "Cannot read directory".to_string())
            } else {
                "Not found".to_string()
            };
            p.info(&format!("  {} files: {}", category.name, count))?;
        }
    } else {
        p.error("SecLists is not installed!")?;
        p.notice("Install with: sudo apt install seclists")?;
    }

    p.info(&format!("\nWordlists Location: {}", settings.wordlists_dir.display()))?;
    match count_files(&settings.wordlists_dir) {
        Some(n) => p.info(&format!("Total wordlists: {}", n))?,
        None => {
            p.error("Wordlists package is not installed!")?;
            p.notice("Install with: sudo apt install wordlists")?;
        }
    }

    p.info("\nExcluded directories:")?;
    for prefix in settings.exclusions.prefixes() {
        p.info(&format!("  - {}", prefix.display()))?;
    }

    p.info("\nAvailable tools:")?;
    for status in check_dependencies(&session.tools) {
        p.info(&status.status_line())?;
    }

    p.info(&format!(
        "\nNote: Showing top {} results for all searches",
        settings.max_results
    ))?;
    p.read_line("\nPress Enter to return to main menu...")?;
    Ok(())
}
