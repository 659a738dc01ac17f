//! Merge command handler.
//!
//! Implements the `merge` subcommand for combining per-library dumps.

use crate::config::{ensure_valid, MergeConfig};
use crate::pipeline::{exit_codes, merge_dumps, write_dump_output};
use anyhow::Result;

/// Run the merge command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_merge(config: MergeConfig) -> Result<i32> {
    ensure_valid(&config)?;
    let merged = merge_dumps(&config)?;
    write_dump_output(&merged, config.output.as_deref(), &config.dump)?;
    Ok(exit_codes::SUCCESS)
}
