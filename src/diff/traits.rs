//! Trait definitions for diff computation strategies.
//!
//! Each category of the ABI is compared by its own [`ChangeComputer`], so the
//! engine can run them independently and concurrently.

use super::{ChangeKind, DiffEntry, Impact};
use crate::model::{AbiEntity, AbiRepresentation, Category, Uid};
use indexmap::IndexMap;

/// Computes the differences for one category of entities.
pub trait ChangeComputer: Send + Sync {
    /// Category this computer covers.
    fn category(&self) -> Category;

    /// Compare the category between two snapshots.
    fn compute(&self, old: &AbiRepresentation, new: &AbiRepresentation) -> ChangeSet;

    /// Get the name of this change computer for logging/debugging.
    fn name(&self) -> &str;
}

/// Entries produced by one computer, in detection order.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    entries: Vec<DiffEntry>,
}

impl ChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: DiffEntry) {
        self.entries.push(entry);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<DiffEntry> {
        self.entries
    }

    /// Record additions and removals of whole entities and return the pairs
    /// present on both sides, in UID order.
    ///
    /// Removing an entity is breaking unless it had internal linkage; adding
    /// one is always non-breaking.
    pub fn presence<'a, T: AbiEntity>(
        &mut self,
        old: &'a IndexMap<Uid, T>,
        new: &'a IndexMap<Uid, T>,
    ) -> Vec<(&'a T, &'a T)> {
        let mut uids: Vec<&Uid> = old.keys().chain(new.keys().filter(|k| !old.contains_key(*k))).collect();
        uids.sort();

        let mut matched = Vec::new();
        for uid in uids {
            match (old.get(uid), new.get(uid)) {
                (Some(o), Some(n)) => matched.push((o, n)),
                (Some(o), None) => self.push(removed_entry(o)),
                (None, Some(n)) => self.push(added_entry(n)),
                (None, None) => {}
            }
        }
        matched
    }
}

/// Entry for an entity present only in the old snapshot.
pub(crate) fn removed_entry<T: AbiEntity>(entity: &T) -> DiffEntry {
    let (impact, detail) = if entity.is_externally_visible() {
        (Impact::Breaking, format!("{} '{}' removed", T::CATEGORY, entity.name()))
    } else {
        (
            Impact::Informational,
            format!("{} '{}' with internal linkage removed", T::CATEGORY, entity.name()),
        )
    };
    DiffEntry::new(entity.uid(), T::CATEGORY, ChangeKind::Removed, impact, detail)
}

/// Entry for an entity present only in the new snapshot.
pub(crate) fn added_entry<T: AbiEntity>(entity: &T) -> DiffEntry {
    DiffEntry::new(
        entity.uid(),
        T::CATEGORY,
        ChangeKind::Added,
        Impact::NonBreaking,
        format!("{} '{}' added", T::CATEGORY, entity.name()),
    )
}
