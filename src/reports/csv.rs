//! CSV report generator.
//!
//! One row per shown entry, suitable for spreadsheet import and data
//! analysis pipelines.

use super::{CompatibilityReport, ReportConfig, ReportFormat, ReportGenerator};
use crate::error::Result;

/// CSV report generator.
pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for CsvReporter {
    fn generate(&self, report: &CompatibilityReport, _config: &ReportConfig) -> Result<String> {
        let mut content = String::new();
        content.push_str("Category,UID,Member,Kind,Impact,Detail\n");

        for entry in report.entries() {
            content.push_str(&format!(
                "{},\"{}\",\"{}\",{},{},\"{}\"\n",
                entry.category.key(),
                escape_csv(entry.uid.as_str()),
                entry.member.as_deref().map(escape_csv).unwrap_or_default(),
                entry.kind,
                entry.impact.label(),
                escape_csv(&entry.detail)
            ));
        }

        Ok(content)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

/// Escape a string for CSV embedding: double-quote escaping per RFC 4180,
/// plus newline flattening since fields are already wrapped in double quotes.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"").replace('\n', " ")
}
