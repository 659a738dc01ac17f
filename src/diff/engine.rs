//! Diff engine implementation.

use super::changes::{
    EnumChangeComputer, FunctionChangeComputer, GlobalVarChangeComputer, RecordChangeComputer,
};
use super::traits::{ChangeComputer, ChangeSet};
use super::{DiffEntry, DiffReport, FunctionMatching};
use crate::error::{AbiToolsError, Result};
use crate::model::AbiRepresentation;
use regex::RegexSet;

/// Compatibility diff engine for comparing ABI snapshots.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    function_matching: FunctionMatching,
    parallel: bool,
    ignore: Option<RegexSet>,
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffEngine {
    /// Create a new diff engine with default settings
    pub fn new() -> Self {
        Self {
            function_matching: FunctionMatching::default(),
            parallel: true,
            ignore: None,
        }
    }

    /// Set how functions with changed signatures are matched
    #[must_use]
    pub fn with_function_matching(mut self, matching: FunctionMatching) -> Self {
        self.function_matching = matching;
        self
    }

    /// Run the category computers concurrently
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Drop entries whose UID matches any of these regular expressions
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.ignore = if patterns.is_empty() {
            None
        } else {
            Some(RegexSet::new(patterns).map_err(|e| {
                AbiToolsError::config(format!("invalid ignore pattern: {e}"))
            })?)
        };
        Ok(self)
    }

    pub fn function_matching(&self) -> FunctionMatching {
        self.function_matching
    }

    /// Check if any ignore patterns are configured
    pub fn has_ignore_patterns(&self) -> bool {
        self.ignore.is_some()
    }

    /// Compare two snapshots and return the ordered report
    pub fn compare(&self, old: &AbiRepresentation, new: &AbiRepresentation) -> DiffReport {
        // Quick check: identical content means no differences
        if old.content_hash() == new.content_hash() && old == new {
            tracing::debug!("snapshots are identical");
            return DiffReport::default();
        }

        let records = RecordChangeComputer::new();
        let enums = EnumChangeComputer::new();
        let functions = FunctionChangeComputer::new(self.function_matching);
        let globals = GlobalVarChangeComputer::new();

        let sets = if self.parallel {
            let ((r, e), (f, g)) = rayon::join(
                || rayon::join(|| run(&records, old, new), || run(&enums, old, new)),
                || rayon::join(|| run(&functions, old, new), || run(&globals, old, new)),
            );
            [r, e, f, g]
        } else {
            [
                run(&records, old, new),
                run(&enums, old, new),
                run(&functions, old, new),
                run(&globals, old, new),
            ]
        };

        let mut entries: Vec<DiffEntry> = sets
            .into_iter()
            .flat_map(ChangeSet::into_entries)
            .collect();

        // Stable: entries on the same entity keep detection order
        entries.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.uid.cmp(&b.uid)));

        if let Some(ignore) = &self.ignore {
            let before = entries.len();
            entries.retain(|e| !ignore.is_match(e.uid.as_str()));
            tracing::debug!(dropped = before - entries.len(), "applied ignore patterns");
        }

        DiffReport::new(entries)
    }
}

fn run(computer: &dyn ChangeComputer, old: &AbiRepresentation, new: &AbiRepresentation) -> ChangeSet {
    let set = computer.compute(old, new);
    tracing::debug!(
        computer = computer.name(),
        category = %computer.category(),
        entries = set.total(),
        "computed changes"
    );
    set
}
