//! Diff computation stage.
//!
//! Encapsulates the core diff logic: building the engine from configuration
//! and running the comparison.

use crate::config::{DiffConfig, EngineConfig};
use crate::diff::{DiffEngine, DiffReport};
use crate::model::AbiRepresentation;
use anyhow::{Context, Result};

/// Build a diff engine from the engine section of the configuration.
pub fn build_engine(config: &EngineConfig) -> Result<DiffEngine> {
    DiffEngine::new()
        .with_function_matching(config.function_matching)
        .parallel(config.parallel)
        .with_ignore_patterns(&config.ignore_patterns)
        .context("Failed to initialize diff engine")
}

/// Run the core diff computation between two snapshots.
pub fn compute_diff(
    config: &DiffConfig,
    old: &AbiRepresentation,
    new: &AbiRepresentation,
) -> Result<DiffReport> {
    let quiet = config.behavior.quiet;
    let engine = build_engine(&config.engine)?;

    if !quiet {
        tracing::info!(
            "Computing ABI diff (function matching: {})...",
            engine.function_matching()
        );
        if engine.has_ignore_patterns() {
            tracing::info!(
                "Ignoring entries matching {} pattern(s)",
                config.engine.ignore_patterns.len()
            );
        }
    }

    let diff = engine.compare(old, new);

    if !quiet {
        tracing::info!(
            "Diff complete: {} changes ({} breaking, {} non-breaking, {} informational)",
            diff.summary.total,
            diff.summary.breaking,
            diff.summary.non_breaking,
            diff.summary.informational
        );
    }

    Ok(diff)
}
