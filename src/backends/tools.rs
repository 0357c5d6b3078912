//! External tool availability and invocation
//!
//! `ToolRegistry` probes `PATH` lazily and remembers the answer for the rest of
//! the process. A tool installed mid-session is not picked up.

use log::debug;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Mutex;
use thiserror::Error;

pub const RG: &str = "rg";
pub const PAGER: &str = "less";
pub const DU: &str = "du";
pub const SEARCHSPLOIT: &str = "searchsploit";
pub const MSFCONSOLE: &str = "msfconsole";

/// Why an external invocation did not produce usable output
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{tool} is not installed")]
    NotFound { tool: String },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("{tool} exited with status {}", code.map(|c| c.to_string()).unwrap_or_else(|| "signal".to_string()))]
    Status { tool: String, code: Option<i32> },
}

/// Captured result of a finished external process
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
}

impl ToolOutput {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Non-empty stdout lines with trailing whitespace removed
    pub fn lines(&self) -> Vec<String> {
        self.stdout
            .lines()
            .map(|l| l.trim_end().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }
}

/// Process-wide cache of which executables are on `PATH`
#[derive(Debug, Default)]
pub struct ToolRegistry {
    cache: Mutex<HashMap<String, bool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with pre-seeded answers; unknown tools are still probed
    #[cfg(test)]
    pub fn with_known(known: &[(&str, bool)]) -> Self {
        let cache = known
            .iter()
            .map(|(name, present)| (name.to_string(), *present))
            .collect();
        Self {
            cache: Mutex::new(cache),
        }
    }

    /// Check if a command is available in PATH
    pub fn has(&self, tool: &str) -> bool {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(present) = cache.get(tool) {
            return *present;
        }
        let present = command_exists(tool);
        debug!("tool probe: {} -> {}", tool, present);
        cache.insert(tool.to_string(), present);
        present
    }

    /// Run `tool` with `args`, capturing stdout and discarding stderr.
    ///
    /// The exit status is not interpreted here; callers decide which codes
    /// mean "no results" and which mean failure.
    pub fn run<I, S>(&self, tool: &str, args: I) -> Result<ToolOutput, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        if !self.has(tool) {
            return Err(ToolError::NotFound {
                tool: tool.to_string(),
            });
        }

        let mut cmd = Command::new(tool);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        debug!("exec: {:?}", cmd);

        let output = cmd.output().map_err(|source| ToolError::Spawn {
            tool: tool.to_string(),
            source,
        })?;

        Ok(ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    /// Like [`run`](Self::run) but any non-zero exit is an error
    pub fn run_checked<I, S>(&self, tool: &str, args: I) -> Result<ToolOutput, ToolError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = self.run(tool, args)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(ToolError::Status {
                tool: tool.to_string(),
                code: output.code(),
            })
        }
    }
}

fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
