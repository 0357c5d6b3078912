//! Doctor - optional tool checking

use colored::Colorize;

use crate::backends::tools::{ToolRegistry, DU, MSFCONSOLE, PAGER, RG, SEARCHSPLOIT};

/// What a known external tool is used for and what happens without it
#[derive(Debug, Clone, Copy)]
pub struct KnownTool {
    pub name: &'static str,
    pub purpose: &'static str,
    pub without: &'static str,
}

pub const KNOWN_TOOLS: &[KnownTool] = &[
    KnownTool {
        name: RG,
        purpose: "Fast content searching (ripgrep)",
        without: "content search uses the built-in line scanner",
    },
    KnownTool {
        name: PAGER,
        purpose: "Paging long result lists",
        without: "only the first page of results is printed",
    },
    KnownTool {
        name: DU,
        purpose: "Directory sizes for folder search",
        without: "folder sizes are summed in-process",
    },
    KnownTool {
        name: SEARCHSPLOIT,
        purpose: "Exploit database",
        without: "exploit search skips the offline database",
    },
    KnownTool {
        name: MSFCONSOLE,
        purpose: "Metasploit Framework",
        without: "exploit search skips Metasploit modules",
    },
];

/// Dependency status
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    pub tool: KnownTool,
    pub available: bool,
}

impl DependencyStatus {
    /// `  rg: available - Fast content searching (ripgrep)`
    pub fn status_line(&self) -> String {
        let status = if self.available {
            "available".green()
        } else {
            "missing".red()
        };
        format!("  {}: {} - {}", self.tool.name, status, self.tool.purpose)
    }
}

/// Check all known tools
pub fn check_dependencies(tools: &ToolRegistry) -> Vec<DependencyStatus> {
    KNOWN_TOOLS
        .iter()
        .map(|tool| DependencyStatus {
            tool: *tool,
            available: tools.has(tool.name),
        })
        .collect()
}

/// One notice line per missing tool, empty when everything is installed
pub fn missing_notice(statuses: &[DependencyStatus]) -> Vec<String> {
    statuses
        .iter()
        .filter(|s| !s.available)
        .map(|s| format!("  {} not found: {}", s.tool.name, s.tool.without))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dependencies() {
        let tools = ToolRegistry::with_known(&[
            (RG, true),
            (PAGER, true),
            (DU, true),
            (SEARCHSPLOIT, false),
            (MSFCONSOLE, false),
        ]);
        let deps = check_dependencies(&tools);

        let names: Vec<_> = deps.iter().map(|d| d.tool.name).collect();
        assert_eq!(names, vec!["rg", "less", "du", "searchsploit", "msfconsole"]);

        let notice = missing_notice(&deps);
        assert_eq!(notice.len(), 2);
        assert!(notice[0].contains("searchsploit"));
    }

    #[test]
    fn test_status_line() {
        colored::control::set_override(false);
        let status = DependencyStatus {
            tool: KNOWN_TOOLS[0],
            available: false,
        };
        assert_eq!(
            status.status_line(),
            "  rg: missing - Fast content searching (ripgrep)"
        );
    }
}
