//! Enum change computer implementation.

use super::arrow;
use crate::diff::traits::{ChangeComputer, ChangeSet};
use crate::diff::{ChangeKind, DiffEntry, Impact};
use crate::model::{AbiRepresentation, Category, EnumType};

/// Computes underlying-type and enumerator changes of enums.
pub struct EnumChangeComputer;

impl EnumChangeComputer {
    /// Create a new enum change computer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for EnumChangeComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeComputer for EnumChangeComputer {
    fn category(&self) -> Category {
        Category::Enums
    }

    fn compute(&self, old: &AbiRepresentation, new: &AbiRepresentation) -> ChangeSet {
        let mut result = ChangeSet::new();
        for (o, n) in result.presence(old.enums(), new.enums()) {
            compare_enums(o, n, &mut result);
        }
        result
    }

    fn name(&self) -> &str {
        "enums"
    }
}

fn compare_enums(old: &EnumType, new: &EnumType, out: &mut ChangeSet) {
    let entry = |kind, impact, detail: String| {
        DiffEntry::new(&new.uid, Category::Enums, kind, impact, detail)
    };

    if old.underlying != new.underlying {
        out.push(entry(
            ChangeKind::Changed,
            Impact::Breaking,
            format!("underlying type {}", arrow(&old.underlying, &new.underlying)),
        ));
    }

    for enumerator in &old.enumerators {
        match new.enumerator(&enumerator.name) {
            Some(current) if current.value.as_i128() != enumerator.value.as_i128() => {
                out.push(
                    entry(
                        ChangeKind::Changed,
                        Impact::Breaking,
                        format!(
                            "enumerator '{}' value {}",
                            enumerator.name,
                            arrow(enumerator.value, current.value)
                        ),
                    )
                    .with_member(&enumerator.name),
                );
            }
            Some(_) => {}
            None => out.push(
                entry(
                    ChangeKind::Removed,
                    Impact::Breaking,
                    format!("enumerator '{}' = {} removed", enumerator.name, enumerator.value),
                )
                .with_member(&enumerator.name),
            ),
        }
    }

    for enumerator in new.enumerators.iter().filter(|e| old.enumerator(&e.name).is_none()) {
        let (impact, detail) = if old.has_value(enumerator.value) {
            (
                Impact::Informational,
                format!(
                    "enumerator '{}' = {} added as an alias of an existing value",
                    enumerator.name, enumerator.value
                ),
            )
        } else {
            (
                Impact::NonBreaking,
                format!("enumerator '{}' = {} added", enumerator.name, enumerator.value),
            )
        };
        out.push(entry(ChangeKind::Added, impact, detail).with_member(&enumerator.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AbiRepresentationBuilder, TypeReference};

    fn diff(old: EnumType, new: EnumType) -> Vec<DiffEntry> {
        let build = |e: EnumType| {
            let mut builder = AbiRepresentationBuilder::new();
            builder.add_enum(e).unwrap();
            builder.build().unwrap()
        };
        EnumChangeComputer::new()
            .compute(&build(old), &build(new))
            .into_entries()
    }

    #[test]
    fn test_value_change_is_breaking() {
        let entries = diff(
            EnumType::new("Color").with("RED", 1),
            EnumType::new("Color").with("RED", 2),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, ChangeKind::Changed);
        assert_eq!(entries[0].impact, Impact::Breaking);
        assert_eq!(entries[0].category, Category::Enums);
        assert!(entries[0].detail.contains("1 → 2"));
    }

    #[test]
    fn test_appended_enumerator() {
        let old = EnumType::new("Color").with("RED", 1).with("GREEN", 2);
        let entries = diff(old.clone(), old.with("BLUE", 3));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, ChangeKind::Added);
        assert_eq!(entries[0].impact, Impact::NonBreaking);
        assert_eq!(entries[0].member.as_deref(), Some("BLUE"));
    }

    #[test]
    fn test_alias_addition_is_informational() {
        let old = EnumType::new("Color").with("RED", 1);
        let entries = diff(old.clone(), old.with("CRIMSON", 1));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].impact, Impact::Informational);
    }

    #[test]
    fn test_removal_and_underlying_change() {
        let old = EnumType::new("Mode").with("A", 0).with("B", 1);
        let new = EnumType::new("Mode")
            .with_underlying(TypeReference::named("unsigned char"))
            .with("A", 0);
        let entries = diff(old, new);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].detail.starts_with("underlying type"));
        assert_eq!(entries[1].kind, ChangeKind::Removed);
        assert_eq!(entries[1].impact, Impact::Breaking);
    }
}
