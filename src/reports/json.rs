//! JSON report generator.

use super::{CompatibilityReport, ReportConfig, ReportFormat, ReportGenerator, Verdict};
use crate::diff::{DiffEntry, DiffSummary};
use crate::error::{AbiToolsError, ReportErrorKind, Result};
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Whether to only include summary
    summary_only: bool,
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            summary_only: false,
            pretty: true,
        }
    }

    /// Create a summary-only reporter
    #[must_use]
    pub const fn summary_only() -> Self {
        Self {
            summary_only: true,
            pretty: true,
        }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, report: &CompatibilityReport, config: &ReportConfig) -> Result<String> {
        let document = JsonDiffReport {
            metadata: JsonReportMetadata {
                tool: ToolInfo {
                    name: env!("CARGO_PKG_NAME").to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
                title: config.title().to_string(),
                generated_at: config.metadata.timestamp(),
                old_dump: config.metadata.old_dump_path.clone(),
                new_dump: config.metadata.new_dump_path.clone(),
            },
            verdict: report.verdict,
            summary: &report.summary,
            entries: if self.summary_only {
                None
            } else {
                Some(report.entries().collect())
            },
            omitted: report.omitted(),
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        rendered.map_err(|e| {
            AbiToolsError::report(
                "rendering JSON report",
                ReportErrorKind::JsonSerializationError(e.to_string()),
            )
        })
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

// JSON structures

#[derive(Serialize)]
struct JsonDiffReport<'a> {
    metadata: JsonReportMetadata,
    verdict: Verdict,
    summary: &'a DiffSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    entries: Option<Vec<&'a DiffEntry>>,
    omitted: usize,
}

#[derive(Serialize)]
struct JsonReportMetadata {
    tool: ToolInfo,
    title: String,
    generated_at: String,
    old_dump: Option<String>,
    new_dump: Option<String>,
}

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    version: String,
}
