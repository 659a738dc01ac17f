//! Markdown report generator.

use super::escape::{escape_markdown_inline, escape_markdown_table};
use super::{CompatibilityReport, ReportConfig, ReportFormat, ReportGenerator};
use crate::diff::Impact;
use crate::error::Result;

/// Markdown report generator
pub struct MarkdownReporter {
    /// Render one table per category instead of bullet lists
    tables: bool,
}

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: true }
    }

    /// Use bullet lists instead of tables
    #[must_use]
    pub const fn lists(mut self) -> Self {
        self.tables = false;
        self
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

const fn impact_badge(impact: Impact) -> &'static str {
    match impact {
        Impact::Breaking => "🔴 Breaking",
        Impact::NonBreaking => "🟡 NonBreaking",
        Impact::Informational => "⚪ Informational",
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, report: &CompatibilityReport, config: &ReportConfig) -> Result<String> {
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", escape_markdown_inline(config.title())));
        md.push_str(&format!("**Verdict:** {}\n\n", report.verdict));

        let meta = &config.metadata;
        if let Some(old) = &meta.old_dump_path {
            md.push_str(&format!("- Reference dump: `{old}`\n"));
        }
        if let Some(new) = &meta.new_dump_path {
            md.push_str(&format!("- Candidate dump: `{new}`\n"));
        }
        md.push_str(&format!(
            "- Generated: {} by {} {}\n\n",
            meta.timestamp(),
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        ));

        // Summary
        md.push_str("## Summary\n\n");
        md.push_str("| Impact | Count |\n|---|---:|\n");
        for impact in Impact::ALL {
            md.push_str(&format!(
                "| {} | {} |\n",
                impact_badge(impact),
                report.summary.count(impact)
            ));
        }
        md.push('\n');

        if report.groups.is_empty() {
            md.push_str("_No differences to report._\n");
            return Ok(md);
        }

        for group in &report.groups {
            md.push_str(&format!("## {} ({})\n\n", group.category.title(), group.shown()));
            if self.tables {
                md.push_str("| Impact | Kind | Location | Detail |\n|---|---|---|---|\n");
            }
            for impact_group in &group.impacts {
                for entry in &impact_group.entries {
                    if self.tables {
                        md.push_str(&format!(
                            "| {} | {} | `{}` | {} |\n",
                            impact_badge(entry.impact),
                            entry.kind,
                            escape_markdown_table(&entry.location()),
                            escape_markdown_table(&entry.detail)
                        ));
                    } else {
                        md.push_str(&format!(
                            "- **{}** {} `{}`: {}\n",
                            entry.impact,
                            entry.kind,
                            entry.location(),
                            escape_markdown_inline(&entry.detail)
                        ));
                    }
                }
                if impact_group.omitted > 0 {
                    let note = format!(
                        "{} more {} entries not shown",
                        impact_group.omitted, impact_group.impact
                    );
                    if self.tables {
                        md.push_str(&format!("| … | | | {note} |\n"));
                    } else {
                        md.push_str(&format!("- _{note}_\n"));
                    }
                }
            }
            md.push('\n');
        }

        Ok(md)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }
}
