//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{CompatibilityReport, ReportConfig, ReportFormat, ReportGenerator};
use crate::diff::{ChangeKind, Impact};
use crate::error::Result;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn impact_color(impact: Impact) -> &'static str {
    match impact {
        Impact::Breaking => "red",
        Impact::NonBreaking => "yellow",
        Impact::Informational => "dim",
    }
}

const fn kind_marker(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Added => "+",
        ChangeKind::Removed => "-",
        ChangeKind::Changed => "~",
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(&self, report: &CompatibilityReport, config: &ReportConfig) -> Result<String> {
        let mut lines = Vec::new();

        // Header
        lines.push(self.color(config.title(), "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        if let (Some(old), Some(new)) = (
            config.metadata.old_dump_path.as_deref(),
            config.metadata.new_dump_path.as_deref(),
        ) {
            lines.push(format!("{}  {} → {}", self.color("Dumps:", "cyan"), old, new));
        }

        let verdict_color = if report.is_compatible() { "green" } else { "red" };
        lines.push(format!(
            "{}  {}",
            self.color("Verdict:", "cyan"),
            self.color(&report.verdict.to_string(), verdict_color)
        ));
        lines.push(String::new());

        // Counts
        lines.push(self.color("Changes:", "bold"));
        if report.summary.total == 0 {
            lines.push(format!("  {}", self.color("No changes", "dim")));
        }
        for impact in Impact::ALL {
            let count = report.summary.count(impact);
            if count > 0 {
                lines.push(format!(
                    "  {} {}",
                    self.color(&count.to_string(), impact_color(impact)),
                    impact
                ));
            }
        }

        // Entries
        for group in &report.groups {
            lines.push(String::new());
            lines.push(self.color(&format!("{}:", group.category.title()), "bold"));
            for impact_group in &group.impacts {
                for entry in &impact_group.entries {
                    lines.push(format!(
                        "  {} {} {}",
                        self.color(kind_marker(entry.kind), impact_color(entry.impact)),
                        entry.location(),
                        self.color(&format!("({})", entry.detail), "dim")
                    ));
                }
                if impact_group.omitted > 0 {
                    lines.push(format!(
                        "  {}",
                        self.color(
                            &format!("… {} more {} entries", impact_group.omitted, impact_group.impact),
                            "dim"
                        )
                    ));
                }
            }
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

/// Table reporter for terminal output with aligned columns
pub struct TableReporter {
    /// Use colored output
    colored: bool,
}

impl TableReporter {
    /// Create a new table reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

const IMPACT_WIDTH: usize = 14;
const KIND_WIDTH: usize = 8;
const CATEGORY_WIDTH: usize = 16;
const LOCATION_WIDTH: usize = 40;

impl ReportGenerator for TableReporter {
    fn generate(&self, report: &CompatibilityReport, _config: &ReportConfig) -> Result<String> {
        let mut lines = Vec::new();

        // Header; padding is applied before coloring so escapes do not skew it
        lines.push(format!(
            "{} {} {} {} {}",
            self.color(&pad("IMPACT", IMPACT_WIDTH), "bold"),
            self.color(&pad("KIND", KIND_WIDTH), "bold"),
            self.color(&pad("CATEGORY", CATEGORY_WIDTH), "bold"),
            self.color(&pad("LOCATION", LOCATION_WIDTH), "bold"),
            self.color("DETAIL", "bold")
        ));
        lines.push("─".repeat(100));

        for entry in report.entries() {
            lines.push(format!(
                "{} {} {} {} {}",
                self.color(&pad(&entry.impact.to_string(), IMPACT_WIDTH), impact_color(entry.impact)),
                pad(&entry.kind.to_string(), KIND_WIDTH),
                pad(entry.category.key(), CATEGORY_WIDTH),
                pad(&truncate(&entry.location(), LOCATION_WIDTH), LOCATION_WIDTH),
                entry.detail
            ));
        }

        // Summary footer
        lines.push(String::new());
        lines.push(format!(
            "Total: {} breaking, {} non-breaking, {} informational | Verdict: {}",
            report.summary.breaking,
            report.summary.non_breaking,
            report.summary.informational,
            report.verdict
        ));

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}

/// Left-align `s` in a column of `width` display cells.
fn pad(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(used)))
}

/// Truncate a string with ellipsis, using Unicode display width for accuracy.
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut width = 0;
    let mut truncated: String = s
        .chars()
        .take_while(|ch| {
            let w = UnicodeWidthChar::width(*ch).unwrap_or(0);
            if width + w > max_width.saturating_sub(1) {
                return false;
            }
            width += w;
            true
        })
        .collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffReport;
    use crate::reports::test_support::sample_diff;

    #[test]
    fn test_summary_lists_verdict_and_entries() {
        let report = CompatibilityReport::from_diff(&sample_diff());
        let text = SummaryReporter::new()
            .no_color()
            .generate(&report, &ReportConfig::default())
            .unwrap();
        assert!(text.contains("Verdict:  Incompatible"));
        assert!(text.contains("2 Breaking"));
        assert!(text.contains("+ S::b"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_summary_without_changes() {
        let report = CompatibilityReport::from_diff(&DiffReport::default());
        let text = SummaryReporter::new()
            .no_color()
            .generate(&report, &ReportConfig::default())
            .unwrap();
        assert!(text.contains("Compatible"));
        assert!(text.contains("No changes"));
    }

    #[test]
    fn test_table_columns_align() {
        let report = CompatibilityReport::from_diff(&sample_diff());
        let text = TableReporter::new()
            .no_color()
            .generate(&report, &ReportConfig::default())
            .unwrap();
        let detail_starts: Vec<usize> = report
            .entries()
            .zip(text.lines().skip(2))
            .map(|(entry, row)| {
                let idx = row.rfind(entry.detail.as_str()).unwrap();
                UnicodeWidthStr::width(&row[..idx])
            })
            .collect();
        assert_eq!(detail_starts.len(), 4);
        assert!(detail_starts.windows(2).all(|w| w[0] == w[1]), "{detail_starts:?}");
    }

    #[test]
    fn test_truncate_by_display_width() {
        assert_eq!(truncate("short", 10), "short");
        let t = truncate("ns::VeryLongRecordName::member", 10);
        assert_eq!(UnicodeWidthStr::width(t.as_str()), 10);
        assert!(t.ends_with('…'));
    }
}
