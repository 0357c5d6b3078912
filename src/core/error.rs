//! Error taxonomy shared by every search workflow

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::backends::tools::ToolError;

#[derive(Error, Debug)]
pub enum MpsaError {
    /// Search root missing, not a directory, or unreadable
    #[error("Directory not found or not accessible: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("{tool} is not available")]
    ToolUnavailable { tool: String },

    /// Read/stat failure on a single file during a batch
    #[error("{}: {message}", path.display())]
    PerFile { path: PathBuf, message: String },

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Interrupted by user")]
    UserAbort,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("No lookup backend available (install exploitdb or metasploit-framework)")]
    NoLookupBackend,

    #[error(transparent)]
    Tool(ToolError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl MpsaError {
    pub fn per_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        MpsaError::PerFile {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, MpsaError::UserAbort)
    }
}

impl From<ToolError> for MpsaError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::NotFound { tool } => MpsaError::ToolUnavailable { tool },
            other => MpsaError::Tool(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, MpsaError>;
