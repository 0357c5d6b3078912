//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Record types produced by every search (FileRecord, MatchRecord)
//! - Error taxonomy
//! - Session settings
//! - Display rendering and pagination
//! - Path exclusion rules
//! - Common utilities
//! - File reading strategies

pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod render;
pub mod settings;
pub mod util;
