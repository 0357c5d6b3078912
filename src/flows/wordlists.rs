//! SecLists browsing and the wordlists summary

use log::info;
use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use walkdir::WalkDir;

use crate::backends::scan::Traversal;
use crate::core::error::Result;
use crate::core::model::{EntryKind, FileRecord};
use crate::core::render::entry_line;
use crate::session::prompt::Prompter;
use crate::session::Session;

/// A SecLists category and its curated short list
#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub name: &'static str,
    pub subdir: &'static str,
    pub top5: &'static [&'static str],
}

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Fuzzing",
        subdir: "Fuzzing",
        top5: &[
            "burp-parameter-names.txt",
            "fuzzdb-attack-payloads.txt",
            "jbrofuzz-headers.txt",
            "xss-payload-list.txt",
            "fuzz.txt",
        ],
    },
    Category {
        name: "Usernames",
        subdir: "Usernames",
        top5: &[
            "top-usernames-shortlist.txt",
            "names.txt",
            "xato-net-10-million-usernames.txt",
            "common-usernames.txt",
            "admin-usernames.txt",
        ],
    },
    Category {
        name: "Passwords",
        subdir: "Passwords/Common-Credentials",
        top5: &[
            "rockyou.txt",
            "10-million-password-list-top-10000.txt",
            "darkweb2017-top10000.txt",
            "best1050.txt",
            "10k-most-common.txt",
        ],
    },
    Category {
        name: "Directories",
        subdir: "Discovery/Web-Content",
        top5: &[
            "directory-list-2.3-small.txt",
            "directory-list-2.3-medium.txt",
            "directory-list-2.3-big.txt",
            "directory-list-2.3-quick.txt",
            "directory-list-2.3-extended.txt",
        ],
    },
    Category {
        name: "Web Shells",
        subdir: "Web-Shells",
        top5: &[
            "php-reverse-shell.php",
            "jsp-shell.jsp",
            "asp-shell.asp",
            "aspx-shell.aspx",
            "python-reverse-shell.py",
        ],
    },
    Category {
        name: "Sensitive Data",
        subdir: "Sensitive-Data",
        top5: &[],
    },
    Category {
        name: "DNS",
        subdir: "Discovery/DNS",
        top5: &[],
    },
    Category {
        name: "API Endpoints",
        subdir: "Miscellaneous/api",
        top5: &[],
    },
];

/// Well-known lists shipped by the wordlists package
pub const COMMON_WORDLISTS: &[&str] = &[
    "rockyou.txt",
    "dirb/common.txt",
    "dirbuster/directory-list-2.3-small.txt",
    "wfuzz/general/common.txt",
    "metasploit/unix_users.txt",
    "sqlmap.txt",
    "cewl.txt",
    "john.txt",
    "wfuzz/injections/xss.txt",
    "wfuzz/injections/sql.txt",
    "dnsmap.txt",
    "subdomains-top1million-5000.txt",
];

/// Number of direct entries of `dir`
pub fn count_entries(dir: &Path) -> Option<usize> {
    fs::read_dir(dir).ok().map(|entries| entries.count())
}

/// Number of regular files anywhere under `dir`
pub fn count_files(dir: &Path) -> Option<usize> {
    if !dir.is_dir() {
        return None;
    }
    Some(
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .count(),
    )
}

fn install_hint<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<()> {
    let base = session.settings.seclists_base.display();
    p.notice(&format!("\nSecLists missing or incomplete at: {}", base))?;
    p.info("Suggested commands (copy & paste to run):")?;
    p.info("  sudo apt update && sudo apt install seclists -y")?;
    p.info(&format!(
        "  git clone https://github.com/danielmiessler/SecLists.git {}",
        base
    ))?;
    Ok(())
}

fn seclists_summary<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<bool> {
    let base = &session.settings.seclists_base;
    p.heading("SecLists summary")?;
    if !base.is_dir() {
        p.error(&format!("SecLists not found at {}.", base.display()))?;
        install_hint(session, p)?;
        return Ok(false);
    }

    p.info(&format!("SecLists base: {}", base.display()))?;
    for category in CATEGORIES {
        let path = base.join(category.subdir);
        let status = if !path.is_dir() {
            format!("Not installed ({})", path.display())
        } else {
            match count_entries(&path) {
                Some(n) => format!("{} files in {}", n, path.display()),
                None => "Cannot read directory".to_string(),
            }
        };
        p.info(&format!("  {}: {}", category.name, status))?;
    }
    Ok(true)
}

fn show_top5<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>, category: &Category) -> Result<()> {
    let dir = session.settings.seclists_base.join(category.subdir);
    p.info(&format!("\nTop 5 for {}:", category.name))?;

    let (present, missing): (Vec<_>, Vec<_>) = category
        .top5
        .iter()
        .map(|name| dir.join(name))
        .partition(|path| path.is_file());

    for path in &present {
        let line = entry_line(&FileRecord::from_path(path, EntryKind::File));
        p.info(&line)?;
    }
    for path in &missing {
        p.notice(&format!("  (missing) {}", path.display()))?;
    }

    if present.is_empty() {
        p.notice("No Top 5 files were found (maybe SecLists is not fully installed)")?;
        install_hint(session, p)?;
    } else if !missing.is_empty() {
        p.notice("\nSome Top 5 lists were missing.")?;
    }
    Ok(())
}

fn show_all<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>, category: &Category) -> Result<()> {
    let dir = session.settings.seclists_base.join(category.subdir);
    p.info(&format!("\nAll files for {} (paged):", category.name))?;

    if !dir.is_dir() {
        p.error(&format!("Category path not found: {}", dir.display()))?;
        return install_hint(session, p);
    }

    let traversal = Traversal::new(&dir, EntryKind::File, &session.settings.exclusions)?;
    let lines: Vec<String> = traversal
        .entries()
        .take_while(|_| !session.is_interrupted())
        .map(|path| entry_line(&FileRecord::from_path(path, EntryKind::File)))
        .collect();
    session.check_interrupt()?;

    session.presenter().show(&lines, true, p.out())?;
    Ok(())
}

pub fn browse_seclists<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<()> {
    if !seclists_summary(session, p)? {
        return Ok(());
    }

    p.info("\nChoose a category to inspect:")?;
    let mut labels: Vec<&str> = CATEGORIES.iter().map(|c| c.name).collect();
    labels.push("Back");
    p.menu(&labels)?;
    let category = match p.choose("Choice: ", labels.len())? {
        Some(n) if n <= CATEGORIES.len() => &CATEGORIES[n - 1],
        _ => return Ok(()),
    };

    p.info(&format!("Selected: {}", category.name))?;
    p.menu(&["Top 5 (recommended)", "All (paged)", "Back"])?;
    match p.ask("Choose: ")?.as_str() {
        "1" => {
            info!("SECLISTS_TOP5:{}", category.name);
            show_top5(session, p, category)
        }
        "2" => {
            info!("SECLISTS_ALL:{}", category.name);
            show_all(session, p, category)
        }
        _ => Ok(()),
    }
}

/// Well-known wordlists present under the wordlists directory
pub fn summary<R: BufRead, W: Write>(session: &Session, p: &mut Prompter<R, W>) -> Result<()> {
    let dir = &session.settings.wordlists_dir;
    info!("WORDLISTS_SUMMARY:{}", dir.display());
    p.info(&format!("\nWordlists in: {}", dir.display()))?;

    if !dir.is_dir() {
        p.error(&format!("{} missing", dir.display()))?;
        p.notice("Install with: sudo apt install wordlists")?;
        return Ok(());
    }

    let present: Vec<_> = COMMON_WORDLISTS
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .collect();
    if present.is_empty() {
        p.notice("No common wordlists found")?;
        return Ok(());
    }

    for path in &present {
        p.info(&entry_line(&FileRecord::from_path(path, EntryKind::File)))?;
    }
    p.notice(&format!(
        "\nTotal: {} wordlists",
        count_files(dir).unwrap_or(0)
    ))?;
    Ok(())
}
