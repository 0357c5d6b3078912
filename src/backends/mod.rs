//! Backends module - External tool integrations and file operations
//!
//! Provides:
//! - tools: external program discovery and invocation
//! - scan: filesystem traversal with walkdir
//! - matcher: content matching (in-process or ripgrep)
//! - rg: ripgrep integration
//! - du: directory sizes
//! - exploit: searchsploit / Metasploit lookup
//! - doctor: optional tool checking

pub mod doctor;
pub mod du;
pub mod exploit;
pub mod matcher;
pub mod rg;
pub mod scan;
pub mod tools;
