//! The structured compatibility report every renderer works from.

use super::ReportConfig;
use crate::diff::{DiffEntry, DiffReport, DiffSummary, Impact};
use crate::model::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// No breaking entry
    Compatible,
    /// At least one breaking entry
    Incompatible,
}

impl Verdict {
    #[must_use]
    pub const fn is_compatible(&self) -> bool {
        matches!(self, Self::Compatible)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compatible => "Compatible",
            Self::Incompatible => "Incompatible",
        })
    }
}

/// Entries of one impact inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactGroup {
    pub impact: Impact,
    pub entries: Vec<DiffEntry>,
    /// Entries cut by the per-group limit
    pub omitted: usize,
}

/// Entries of one category, most severe impact first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub impacts: Vec<ImpactGroup>,
}

impl CategoryGroup {
    /// Number of entries shown in this category.
    #[must_use]
    pub fn shown(&self) -> usize {
        self.impacts.iter().map(|g| g.entries.len()).sum()
    }
}

/// Grouped view of a [`DiffReport`] with its verdict.
///
/// The verdict and summary always describe the whole diff; the display
/// options in [`ReportConfig`] only shape `groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub verdict: Verdict,
    pub summary: DiffSummary,
    pub groups: Vec<CategoryGroup>,
}

impl CompatibilityReport {
    /// Group every entry of `diff`.
    pub fn from_diff(diff: &DiffReport) -> Self {
        Self::from_diff_with(diff, &ReportConfig::default())
    }

    /// Group `diff`, applying the minimum impact and per-group limit of `config`.
    pub fn from_diff_with(diff: &DiffReport, config: &ReportConfig) -> Self {
        let verdict = if diff.has_breaking() {
            Verdict::Incompatible
        } else {
            Verdict::Compatible
        };

        let mut groups = Vec::new();
        for category in Category::ALL {
            let mut impacts = Vec::new();
            for impact in Impact::ALL {
                if impact < config.min_impact {
                    continue;
                }
                let mut entries: Vec<DiffEntry> = diff
                    .in_category(category)
                    .filter(|e| e.impact == impact)
                    .cloned()
                    .collect();
                if entries.is_empty() {
                    continue;
                }
                let omitted = match config.max_items {
                    Some(max) if entries.len() > max => {
                        let cut = entries.len() - max;
                        entries.truncate(max);
                        cut
                    }
                    _ => 0,
                };
                impacts.push(ImpactGroup {
                    impact,
                    entries,
                    omitted,
                });
            }
            if !impacts.is_empty() {
                groups.push(CategoryGroup { category, impacts });
            }
        }

        Self {
            verdict,
            summary: diff.summary.clone(),
            groups,
        }
    }

    /// Shown entries in group order.
    pub fn entries(&self) -> impl Iterator<Item = &DiffEntry> {
        self.groups
            .iter()
            .flat_map(|g| g.impacts.iter())
            .flat_map(|g| g.entries.iter())
    }

    /// Total entries cut by the per-group limit.
    #[must_use]
    pub fn omitted(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.impacts.iter())
            .map(|g| g.omitted)
            .sum()
    }

    #[must_use]
    pub fn is_compatible(&self) -> bool {
        self.verdict.is_compatible()
    }
}
