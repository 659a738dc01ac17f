//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing two ABI dumps.

use crate::config::{ensure_valid, DiffConfig};
use crate::pipeline::{compute_diff, load_dump_with_context, load_reference, output_report};
use anyhow::Result;

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_diff(config: DiffConfig) -> Result<i32> {
    ensure_valid(&config)?;
    let quiet = config.behavior.quiet;

    let old = load_reference(
        &config.paths.old,
        config.behavior.allow_missing_reference,
        quiet,
    )?;
    let new = load_dump_with_context(&config.paths.new, quiet)?;

    let diff = compute_diff(&config, &old.repr, &new.repr)?;
    let outcome = output_report(&config, diff, old.missing)?;

    Ok(outcome.exit_code(&config.behavior))
}
