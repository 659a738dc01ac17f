//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod diff;
mod dump;
mod merge;
mod validate;

pub use diff::run_diff;
pub use dump::run_dump;
pub use merge::run_merge;
pub use validate::{run_validate, ValidateFormat};

// Re-export config types used by handlers
pub use crate::config::{DiffConfig, DumpCommandConfig, MergeConfig};
