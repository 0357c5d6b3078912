//! Session-wide settings resolved from the command line and environment

use std::path::PathBuf;

use crate::core::paths::ExclusionFilter;

pub const DEFAULT_SECLISTS: &str = "/usr/share/seclists";
pub const DEFAULT_WORDLISTS: &str = "/usr/share/wordlists";
pub const DEFAULT_MAX_RESULTS: usize = 200;
/// Lines printed directly when the pager is not used
pub const PAGE_SIZE: usize = 25;

#[derive(Debug, Clone)]
pub struct Settings {
    pub seclists_base: PathBuf,
    pub wordlists_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub max_results: usize,
    pub exclusions: ExclusionFilter,
    pub pager_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seclists_base: PathBuf::from(DEFAULT_SECLISTS),
            wordlists_dir: PathBuf::from(DEFAULT_WORDLISTS),
            export_dir: PathBuf::from("."),
            log_file: default_log_file(),
            max_results: DEFAULT_MAX_RESULTS,
            exclusions: ExclusionFilter::default(),
            pager_enabled: true,
        }
    }
}

/// `<tmp>/mpsa_search_<pid>.log`
pub fn default_log_file() -> PathBuf {
    std::env::temp_dir().join(format!("mpsa_search_{}.log", std::process::id()))
}
