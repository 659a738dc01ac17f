//! Function change computer implementation.

use super::{arrow, linkage_impact};
use crate::diff::traits::{ChangeComputer, ChangeSet};
use crate::diff::{ChangeKind, DiffEntry, FunctionMatching, Impact};
use crate::model::{AbiRepresentation, Category, FunctionDecl, Uid};
use std::collections::{HashMap, HashSet};

/// Computes signature, linkage and dispatch changes of functions.
pub struct FunctionChangeComputer {
    matching: FunctionMatching,
}

impl FunctionChangeComputer {
    /// Create a new function change computer.
    #[must_use]
    pub const fn new(matching: FunctionMatching) -> Self {
        Self { matching }
    }
}

impl Default for FunctionChangeComputer {
    fn default() -> Self {
        Self::new(FunctionMatching::default())
    }
}

impl ChangeComputer for FunctionChangeComputer {
    fn category(&self) -> Category {
        Category::Functions
    }

    fn compute(&self, old: &AbiRepresentation, new: &AbiRepresentation) -> ChangeSet {
        let mut presence = ChangeSet::new();
        let matched = presence.presence(old.functions(), new.functions());

        let renamed = match self.matching {
            FunctionMatching::ByUid => Vec::new(),
            FunctionMatching::ByName => pair_by_name(old, new),
        };
        let paired_old: HashSet<&Uid> = renamed.iter().map(|(o, _)| &o.uid).collect();
        let paired_new: HashSet<&Uid> = renamed.iter().map(|(_, n)| &n.uid).collect();

        let mut result = ChangeSet::new();
        for entry in presence.into_entries() {
            let paired = match entry.kind {
                ChangeKind::Removed => paired_old.contains(&entry.uid),
                ChangeKind::Added => paired_new.contains(&entry.uid),
                ChangeKind::Changed => false,
            };
            if !paired {
                result.push(entry);
            }
        }

        for (o, n) in matched {
            compare_functions(o, n, &mut result);
        }
        for (o, n) in renamed {
            result.push(DiffEntry::new(
                &n.uid,
                Category::Functions,
                ChangeKind::Changed,
                Impact::Breaking,
                format!("signature changed: {}", arrow(&o.uid, &n.uid)),
            ));
            compare_functions(o, n, &mut result);
        }
        result
    }

    fn name(&self) -> &str {
        "functions"
    }
}

/// Pair functions whose UID vanished with functions whose UID appeared,
/// when the qualified name is unique among the unmatched on both sides.
fn pair_by_name<'a>(
    old: &'a AbiRepresentation,
    new: &'a AbiRepresentation,
) -> Vec<(&'a FunctionDecl, &'a FunctionDecl)> {
    fn unmatched<'a>(
        side: &'a AbiRepresentation,
        other: &AbiRepresentation,
    ) -> HashMap<&'a str, Vec<&'a FunctionDecl>> {
        let mut by_name: HashMap<&str, Vec<&FunctionDecl>> = HashMap::new();
        for f in side.functions().values() {
            if other.function(f.uid.as_str()).is_none() {
                by_name.entry(f.name.as_str()).or_default().push(f);
            }
        }
        by_name
    }

    let old_by_name = unmatched(old, new);
    let new_by_name = unmatched(new, old);

    let mut pairs: Vec<(&FunctionDecl, &FunctionDecl)> = old_by_name
        .iter()
        .filter_map(|(name, olds)| match (olds.as_slice(), new_by_name.get(name)) {
            ([o], Some(news)) if news.len() == 1 => Some((*o, news[0])),
            _ => None,
        })
        .collect();
    pairs.sort_by(|a, b| a.1.uid.cmp(&b.1.uid));
    pairs
}

fn compare_functions(old: &FunctionDecl, new: &FunctionDecl, out: &mut ChangeSet) {
    let mut push = |impact: Impact, detail: String| {
        out.push(DiffEntry::new(
            &new.uid,
            Category::Functions,
            ChangeKind::Changed,
            impact,
            detail,
        ));
    };

    if old.return_type != new.return_type {
        push(
            Impact::Breaking,
            format!("return type {}", arrow(&old.return_type, &new.return_type)),
        );
    }
    if old.parameters.len() == new.parameters.len() {
        for (i, (o, n)) in old.parameters.iter().zip(&new.parameters).enumerate() {
            if o != n {
                push(Impact::Breaking, format!("parameter {i} type {}", arrow(o, n)));
            }
        }
    } else {
        push(
            Impact::Breaking,
            format!(
                "parameter count {}",
                arrow(old.parameters.len(), new.parameters.len())
            ),
        );
    }
    if old.variadic != new.variadic {
        push(
            Impact::Breaking,
            format!("variadic {}", arrow(old.variadic, new.variadic)),
        );
    }
    if old.calling_convention != new.calling_convention {
        push(
            Impact::Breaking,
            format!(
                "calling convention {}",
                arrow(&old.calling_convention, &new.calling_convention)
            ),
        );
    }
    if old.linkage != new.linkage {
        push(
            linkage_impact(old.linkage, new.linkage),
            format!("linkage {}", arrow(old.linkage, new.linkage)),
        );
    }

    match (old.virtual_info, new.virtual_info) {
        (None, Some(_)) => push(Impact::Breaking, "became virtual".to_string()),
        (Some(_), None) => push(Impact::Breaking, "no longer virtual".to_string()),
        (Some(o), Some(n)) => {
            if o.vtable_index != n.vtable_index {
                push(
                    Impact::Breaking,
                    format!("vtable index {}", arrow(o.vtable_index, n.vtable_index)),
                );
            }
            if o.is_pure != n.is_pure {
                push(
                    Impact::Informational,
                    format!("pure virtual {}", arrow(o.is_pure, n.is_pure)),
                );
            }
        }
        (None, None) => {}
    }

    if old.access != new.access {
        push(
            Impact::Informational,
            format!("access {}", arrow(old.access, new.access)),
        );
    }
}
