//! mpsa - an interactive pentester search assistant
//!
//! mpsa provides:
//! - SecLists and wordlists browsing
//! - Filename, content and folder search with exclusion rules
//! - Exploit lookup through searchsploit and Metasploit
//! - Paged display and CSV/JSON export of every result set

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod export;
mod flows;
mod session;

fn main() -> Result<()> {
    // Check for unsupported platforms
    #[cfg(windows)]
    {
        eprintln!("Error: Windows is not supported. Please use WSL (not guaranteed to work).");
        std::process::exit(1);
    }

    let cli = cli::Cli::parse();
    cli::run(cli)
}
