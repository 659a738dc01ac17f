//! Report generation for compatibility diffs.
//!
//! This module provides multiple output formats for ABI diff results:
//! - JSON: Structured data for programmatic gating
//! - SARIF: CI/CD code-scanning integration
//! - CSV: Spreadsheet import
//! - Markdown: Human-readable documentation
//! - Summary: Compact shell-friendly output
//! - Table: Aligned tabular terminal output
//!
//! Every reporter renders the same [`CompatibilityReport`], so the structured
//! and textual forms of one run always agree.
//!
//! # Security
//!
//! The `escape` module provides utilities for safe output generation.
//! Names coming from headers should be escaped before embedding them in
//! Markdown or CSV reports.

mod compatibility;
mod csv;
pub mod escape;
mod json;
mod markdown;
mod sarif;
mod summary;
mod types;

pub use compatibility::{CategoryGroup, CompatibilityReport, ImpactGroup, Verdict};
pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;
pub use sarif::SarifReporter;
pub use summary::{SummaryReporter, TableReporter};
pub use types::{ReportConfig, ReportFormat, ReportMetadata};

use crate::error::Result;
use std::io::Write;

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a compatibility report
    fn generate(&self, report: &CompatibilityReport, config: &ReportConfig) -> Result<String>;

    /// Write report to a writer
    fn write_report(
        &self,
        report: &CompatibilityReport,
        config: &ReportConfig,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let rendered = self.generate(report, config)?;
        writer.write_all(rendered.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Sarif => Box::new(SarifReporter::new()),
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Table => {
            if use_color {
                Box::new(TableReporter::new())
            } else {
                Box::new(TableReporter::new().no_color())
            }
        }
        ReportFormat::Csv => Box::new(CsvReporter::new()),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::diff::{ChangeKind, DiffEntry, DiffReport, Impact};
    use crate::model::{Category, Uid};

    /// A small diff touching three categories.
    pub fn sample_diff() -> DiffReport {
        DiffReport::new(vec![
            DiffEntry::new(
                &Uid::new("S"),
                Category::Records,
                ChangeKind::Changed,
                Impact::Breaking,
                "size 32 → 64 bits",
            ),
            DiffEntry::new(
                &Uid::new("S"),
                Category::Records,
                ChangeKind::Added,
                Impact::NonBreaking,
                "field 'b' of type int added at offset 32",
            )
            .with_member("b"),
            DiffEntry::new(
                &Uid::new("Color"),
                Category::Enums,
                ChangeKind::Added,
                Impact::NonBreaking,
                "enumerator 'BLUE' = 3 added",
            )
            .with_member("BLUE"),
            DiffEntry::new(
                &Uid::new("f(int)"),
                Category::Functions,
                ChangeKind::Removed,
                Impact::Breaking,
                "function 'f' removed",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_format_renders() {
        let report = CompatibilityReport::from_diff(&test_support::sample_diff());
        let config = ReportConfig::default();
        for format in [
            ReportFormat::Summary,
            ReportFormat::Json,
            ReportFormat::Sarif,
            ReportFormat::Markdown,
            ReportFormat::Table,
            ReportFormat::Csv,
        ] {
            let reporter = create_reporter_with_options(format, false);
            assert_eq!(reporter.format(), format);
            let rendered = reporter.generate(&report, &config).unwrap();
            assert!(rendered.contains("S"), "{format} output lacks the record UID");
        }
    }

    #[test]
    fn test_write_report() {
        let report = CompatibilityReport::from_diff(&test_support::sample_diff());
        let mut out = Vec::new();
        JsonReporter::new()
            .write_report(&report, &ReportConfig::default(), &mut out)
            .unwrap();
        assert!(!out.is_empty());
    }
}
