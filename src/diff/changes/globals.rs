//! Global variable change computer implementation.

use super::{arrow, linkage_impact};
use crate::diff::traits::{ChangeComputer, ChangeSet};
use crate::diff::{ChangeKind, DiffEntry, Impact};
use crate::model::{AbiRepresentation, Category};

/// Computes type and linkage changes of global variables.
pub struct GlobalVarChangeComputer;

impl GlobalVarChangeComputer {
    /// Create a new global variable change computer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for GlobalVarChangeComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeComputer for GlobalVarChangeComputer {
    fn category(&self) -> Category {
        Category::GlobalVars
    }

    fn compute(&self, old: &AbiRepresentation, new: &AbiRepresentation) -> ChangeSet {
        let mut result = ChangeSet::new();
        for (o, n) in result.presence(old.global_vars(), new.global_vars()) {
            if o.type_ref != n.type_ref {
                result.push(DiffEntry::new(
                    &n.uid,
                    Category::GlobalVars,
                    ChangeKind::Changed,
                    Impact::Breaking,
                    format!("type {}", arrow(&o.type_ref, &n.type_ref)),
                ));
            }
            if o.linkage != n.linkage {
                result.push(DiffEntry::new(
                    &n.uid,
                    Category::GlobalVars,
                    ChangeKind::Changed,
                    linkage_impact(o.linkage, n.linkage),
                    format!("linkage {}", arrow(o.linkage, n.linkage)),
                ));
            }
        }
        result
    }

    fn name(&self) -> &str {
        "global_vars"
    }
}
