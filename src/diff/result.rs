//! Diff result structures.

use crate::model::{Category, Uid};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to an entity or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

impl ChangeKind {
    /// The kind seen when comparing in the opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Added => Self::Removed,
            Self::Removed => Self::Added,
            Self::Changed => Self::Changed,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        })
    }
}

/// Compatibility impact, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// No effect on binary compatibility
    #[default]
    Informational,
    /// Additive extension of the ABI surface
    NonBreaking,
    /// Binaries built against the old ABI may misbehave
    Breaking,
}

impl Impact {
    /// All impacts, most severe first.
    pub const ALL: [Impact; 3] = [Impact::Breaking, Impact::NonBreaking, Impact::Informational];

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Breaking => "breaking",
            Self::NonBreaking => "non_breaking",
            Self::Informational => "informational",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Breaking => "Breaking",
            Self::NonBreaking => "NonBreaking",
            Self::Informational => "Informational",
        })
    }
}

/// One detected difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Entity the difference belongs to
    pub uid: Uid,
    pub category: Category,
    pub kind: ChangeKind,
    pub impact: Impact,
    /// Field, enumerator, base or slot for nested differences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    /// Human-readable description
    pub detail: String,
}

impl DiffEntry {
    pub fn new(
        uid: &Uid,
        category: Category,
        kind: ChangeKind,
        impact: Impact,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.clone(),
            category,
            kind,
            impact,
            member: None,
            detail: detail.into(),
        }
    }

    /// Attach the nested member this entry is about.
    #[must_use]
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    #[must_use]
    pub fn is_breaking(&self) -> bool {
        self.impact == Impact::Breaking
    }

    /// True for entries about a whole entity rather than a member.
    #[must_use]
    pub fn is_entity_level(&self) -> bool {
        self.member.is_none()
    }

    /// `uid` or `uid::member`, for display.
    #[must_use]
    pub fn location(&self) -> String {
        match &self.member {
            Some(member) => format!("{}::{member}", self.uid),
            None => self.uid.to_string(),
        }
    }
}

/// Counts over a diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total: usize,
    pub breaking: usize,
    pub non_breaking: usize,
    pub informational: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl DiffSummary {
    fn from_entries(entries: &[DiffEntry]) -> Self {
        let mut summary = Self {
            total: entries.len(),
            ..Self::default()
        };
        for entry in entries {
            match entry.impact {
                Impact::Breaking => summary.breaking += 1,
                Impact::NonBreaking => summary.non_breaking += 1,
                Impact::Informational => summary.informational += 1,
            }
            match entry.kind {
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Removed => summary.removed += 1,
                ChangeKind::Changed => summary.changed += 1,
            }
        }
        summary
    }

    #[must_use]
    pub fn count(&self, impact: Impact) -> usize {
        match impact {
            Impact::Breaking => self.breaking,
            Impact::NonBreaking => self.non_breaking,
            Impact::Informational => self.informational,
        }
    }
}

/// Ordered result of comparing two snapshots.
///
/// Entries are in category order, then UID order, with the detection order
/// kept for entries on the same entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct DiffReport {
    pub entries: Vec<DiffEntry>,
    pub summary: DiffSummary,
}

impl DiffReport {
    pub fn new(entries: Vec<DiffEntry>) -> Self {
        let summary = DiffSummary::from_entries(&entries);
        Self { entries, summary }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn has_breaking(&self) -> bool {
        self.summary.breaking > 0
    }

    /// True when something was added or extended but nothing broke.
    #[must_use]
    pub fn has_extensions(&self) -> bool {
        self.summary.non_breaking > 0
    }

    pub fn breaking(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(|e| e.is_breaking())
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &DiffEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// Entries about the given UID, in detection order.
    pub fn for_uid<'a>(&'a self, uid: &'a str) -> impl Iterator<Item = &'a DiffEntry> {
        self.entries.iter().filter(move |e| e.uid.as_str() == uid)
    }

    /// Keep only entries at or above `min`.
    pub fn filtered(&self, min: Impact) -> Self {
        Self::new(
            self.entries
                .iter()
                .filter(|e| e.impact >= min)
                .cloned()
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: ChangeKind, impact: Impact) -> DiffEntry {
        DiffEntry::new(&Uid::new("S"), Category::Records, kind, impact, "detail")
    }

    #[test]
    fn test_summary_counts() {
        let report = DiffReport::new(vec![
            entry(ChangeKind::Changed, Impact::Breaking),
            entry(ChangeKind::Added, Impact::NonBreaking).with_member("b"),
            entry(ChangeKind::Changed, Impact::Informational),
        ]);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.breaking, 1);
        assert_eq!(report.summary.added, 1);
        assert!(report.has_breaking());
        assert_eq!(report.filtered(Impact::NonBreaking).entries.len(), 2);
    }

    #[test]
    fn test_impact_order() {
        assert!(Impact::Breaking > Impact::NonBreaking);
        assert!(Impact::NonBreaking > Impact::Informational);
    }

    #[test]
    fn test_entry_json_field_names() {
        let json = serde_json::to_value(entry(ChangeKind::Removed, Impact::Breaking)).unwrap();
        assert_eq!(json["uid"], "S");
        assert_eq!(json["category"], "records");
        assert_eq!(json["kind"], "removed");
        assert_eq!(json["impact"], "breaking");
        assert!(json.get("member").is_none());
    }

    #[test]
    fn test_location() {
        let e = entry(ChangeKind::Added, Impact::NonBreaking).with_member("b");
        assert_eq!(e.location(), "S::b");
    }
}
