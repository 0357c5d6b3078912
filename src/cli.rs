//! CLI module - Command-line flags and session start-up

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

use crate::core::paths::ExclusionFilter;
use crate::core::settings::{default_log_file, Settings, DEFAULT_MAX_RESULTS, DEFAULT_SECLISTS, DEFAULT_WORDLISTS};
use crate::session::menu::run_menu;
use crate::session::prompt::Prompter;
use crate::session::{log, Session};

/// mpsa - interactive search assistant for wordlists, exploits and files.
#[derive(Parser, Debug)]
#[command(name = "mpsa")]
#[command(
    author,
    version,
    about,
    long_about = r#"mpsa is a menu-driven assistant for locating wordlists, exploit database
entries, and files or file contents on the local filesystem.

All search parameters are collected interactively. The flags below only
change where things live and how results are shown.

Menu:
  1) Browse SecLists categories (Top 5 / All)
  2) Exploit search (searchsploit / Metasploit)
  3) Content search
  4) Filename search
  5) Folder search
  6) Wordlists summary
  7) System info
  8) Exit

Examples:
    mpsa
    mpsa --seclists ~/SecLists --export-dir ~/loot
    MPSA_LOG=debug mpsa --log-file ./mpsa.log
"#
)]
pub struct Cli {
    /// SecLists installation directory.
    #[arg(long, env = "MPSA_SECLISTS", value_name = "DIR", default_value = DEFAULT_SECLISTS)]
    pub seclists: PathBuf,

    /// Wordlists directory.
    #[arg(long, env = "MPSA_WORDLISTS", value_name = "DIR", default_value = DEFAULT_WORDLISTS)]
    pub wordlists: PathBuf,

    /// Directory export files are written to.
    #[arg(
        long,
        env = "MPSA_EXPORT_DIR",
        value_name = "DIR",
        default_value = ".",
        long_help = "Directory CSV/JSON exports are written to (created if missing).\n\n\
Files are named <prefix><unix time>.<csv|json>; an existing file is never overwritten."
    )]
    pub export_dir: PathBuf,

    /// Session log file (appended to).
    #[arg(
        long,
        env = "MPSA_LOG_FILE",
        value_name = "FILE",
        long_help = "Session log file, opened in append mode. Defaults to\n\
<tmp>/mpsa_search_<pid>.log. Set MPSA_LOG=debug to also record external\n\
command lines. If the file cannot be opened the session runs without a log."
    )]
    pub log_file: Option<PathBuf>,

    /// Maximum number of results shown by filename and folder search.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: usize,

    /// Additional path prefix to exclude from every traversal (repeatable).
    #[arg(long = "exclude", value_name = "PREFIX")]
    pub excludes: Vec<PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Never open results in the external pager.
    #[arg(long)]
    pub no_pager: bool,
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            seclists_base: self.seclists.clone(),
            wordlists_dir: self.wordlists.clone(),
            export_dir: self.export_dir.clone(),
            log_file: self.log_file.clone().unwrap_or_else(default_log_file),
            max_results: self.max_results,
            exclusions: ExclusionFilter::default().with_extra(self.excludes.iter().cloned()),
            pager_enabled: !self.no_pager,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let session = Session::new(cli.settings());
    log::init(&session.settings.log_file);

    session
        .interrupt
        .install()
        .context("failed to install Ctrl-C handler")?;

    let stdin = io::stdin();
    let mut prompter =
        Prompter::new(stdin.lock(), io::stdout()).with_interrupt(session.interrupt.clone());
    run_menu(&session, &mut prompter).context("terminal I/O failed")?;

    ::log::logger().flush();
    Ok(())
}
