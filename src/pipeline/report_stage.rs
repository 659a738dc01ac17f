//! Report output stage.
//!
//! Builds the compatibility report, renders it in the configured format,
//! writes it out and maps the verdict onto an exit code.

use super::{exit_codes, should_use_color, write_output, OutputTarget, PipelineError};
use crate::config::{BehaviorConfig, DiffConfig};
use crate::diff::DiffReport;
use crate::reports::{
    create_reporter_with_options, CompatibilityReport, ReportConfig, ReportMetadata,
};
use anyhow::Result;

/// Everything a finished comparison produced.
#[derive(Debug, Clone)]
pub struct ComparisonOutcome {
    /// The raw diff
    pub diff: DiffReport,
    /// The grouped report with its verdict
    pub report: CompatibilityReport,
    /// The reference dump was absent and an empty ABI stood in
    pub reference_missing: bool,
}

impl ComparisonOutcome {
    /// Exit code under the given behavior flags.
    #[must_use]
    pub fn exit_code(&self, behavior: &BehaviorConfig) -> i32 {
        if self.reference_missing {
            return exit_codes::SUCCESS;
        }
        exit_code(&self.diff, behavior)
    }
}

/// Map a diff onto an exit code.
///
/// Advice-only mode always succeeds. Otherwise breaking changes give
/// `INCOMPATIBLE`, and extensions give `EXTENDED` when the caller asked to
/// fail on them.
#[must_use]
pub fn exit_code(diff: &DiffReport, behavior: &BehaviorConfig) -> i32 {
    if behavior.advice_only {
        exit_codes::SUCCESS
    } else if diff.has_breaking() {
        exit_codes::INCOMPATIBLE
    } else if behavior.fail_on_extension && diff.has_extensions() {
        exit_codes::EXTENDED
    } else {
        exit_codes::SUCCESS
    }
}

/// Render the report for `diff` and write it to the configured destination.
pub fn output_report(
    config: &DiffConfig,
    diff: DiffReport,
    reference_missing: bool,
) -> Result<ComparisonOutcome> {
    let output_target = OutputTarget::from_option(config.output.file.clone());

    let report_config = ReportConfig {
        min_impact: config.filtering.min_impact,
        max_items: config.filtering.max_items,
        title: config.output.title.clone(),
        metadata: ReportMetadata::for_comparison(
            Some(config.paths.old.to_string_lossy().to_string()),
            Some(config.paths.new.to_string_lossy().to_string()),
        ),
    };

    let report = CompatibilityReport::from_diff_with(&diff, &report_config);

    let use_color = should_use_color(config.output.no_color, &output_target);
    let reporter = create_reporter_with_options(config.output.format, use_color);
    let rendered = reporter
        .generate(&report, &report_config)
        .map_err(|e| PipelineError::ReportFailed { source: e.into() })?;

    write_output(&rendered, &output_target, config.behavior.quiet)?;

    if !config.behavior.quiet {
        tracing::info!("Verdict: {}", report.verdict);
    }

    Ok(ComparisonOutcome {
        diff,
        report,
        reference_missing,
    })
}
