//! Report type definitions.

use crate::diff::Impact;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Brief colored summary
    #[default]
    Summary,
    /// Structured JSON output
    Json,
    /// SARIF 2.1.0 for CI/CD
    Sarif,
    /// Human-readable Markdown
    Markdown,
    /// Aligned table for terminal
    Table,
    /// CSV for spreadsheet import
    Csv,
}

impl ReportFormat {
    /// True for formats meant for machines rather than people.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Json | Self::Sarif | Self::Csv)
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Summary => write!(f, "summary"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Sarif => write!(f, "sarif"),
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Table => write!(f, "table"),
            ReportFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Configuration for report generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Entries below this impact are left out of the rendering
    pub min_impact: Impact,
    /// Maximum entries per category/impact group
    pub max_items: Option<usize>,
    /// Title for the report
    pub title: Option<String>,
    /// Additional metadata to include
    pub metadata: ReportMetadata,
}

impl ReportConfig {
    /// Show only entries at or above `impact`.
    #[must_use]
    pub fn with_min_impact(mut self, impact: Impact) -> Self {
        self.min_impact = impact;
        self
    }

    #[must_use]
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title to print, falling back to a generic one.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("ABI Compatibility Report")
    }
}

/// Metadata included in reports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Old dump file path
    pub old_dump_path: Option<String>,
    /// New dump file path
    pub new_dump_path: Option<String>,
    /// Tool version
    pub tool_version: String,
    /// Generation timestamp
    pub generated_at: Option<String>,
    /// Custom properties
    pub custom: BTreeMap<String, String>,
}

impl ReportMetadata {
    pub fn new() -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            ..Default::default()
        }
    }

    /// Metadata for a comparison of two dump files, stamped now.
    pub fn for_comparison(old: Option<String>, new: Option<String>) -> Self {
        Self {
            old_dump_path: old,
            new_dump_path: new,
            generated_at: Some(chrono::Utc::now().to_rfc3339()),
            ..Self::new()
        }
    }

    /// The timestamp, or now if none was recorded.
    pub fn timestamp(&self) -> String {
        self.generated_at
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339())
    }
}
