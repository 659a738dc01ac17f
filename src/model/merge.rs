//! Union of per-unit snapshots into one.

use super::{AbiEntity, AbiRepresentation, Category, RecordType, Uid};
use crate::error::{ErrorContext, ModelErrorKind, Result};
use std::collections::HashMap;

/// Merge snapshots from several header units, in the order given.
///
/// Identical declarations of the same UID collapse. A complete record
/// definition supersedes a forward declaration of it. Any other difference
/// is a `ConflictingDeclaration` naming both units.
pub fn merge_units<I>(parts: I) -> Result<AbiRepresentation>
where
    I: IntoIterator<Item = (String, AbiRepresentation)>,
{
    let mut merged = AbiRepresentation::empty();
    let mut origins: HashMap<(Category, Uid), String> = HashMap::new();

    for (unit, part) in parts {
        tracing::debug!(unit = %unit, entities = part.len(), "merging unit");
        for record in part.records().values() {
            merge_record(&mut merged, &mut origins, &unit, record)?;
        }
        for enumeration in part.enums().values() {
            merge_entity(&mut merged, &mut origins, &unit, enumeration)?;
        }
        for function in part.functions().values() {
            merge_entity(&mut merged, &mut origins, &unit, function)?;
        }
        for global in part.global_vars().values() {
            merge_entity(&mut merged, &mut origins, &unit, global)?;
        }
    }

    merged.seal().context("validating merged representation")
}

fn conflict<T: AbiEntity>(entity: &T, first_unit: &str, second_unit: &str) -> ModelErrorKind {
    ModelErrorKind::ConflictingDeclaration {
        category: T::CATEGORY,
        uid: entity.uid().to_string(),
        first_unit: first_unit.to_string(),
        second_unit: second_unit.to_string(),
    }
}

fn merge_entity<T: AbiEntity>(
    merged: &mut AbiRepresentation,
    origins: &mut HashMap<(Category, Uid), String>,
    unit: &str,
    entity: &T,
) -> Result<()> {
    let key = (T::CATEGORY, entity.uid().clone());
    match T::collection(merged).get(entity.uid()) {
        None => {
            merged.replace(entity.clone());
            origins.insert(key, unit.to_string());
            Ok(())
        }
        Some(existing) if existing == entity => Ok(()),
        Some(_) => {
            let first = origins.get(&key).map_or("<unknown>", String::as_str);
            Err(conflict(entity, first, unit).into())
        }
    }
}

fn merge_record(
    merged: &mut AbiRepresentation,
    origins: &mut HashMap<(Category, Uid), String>,
    unit: &str,
    record: &RecordType,
) -> Result<()> {
    let key = (Category::Records, record.uid.clone());
    let Some(existing) = merged.record(record.uid.as_str()) else {
        merged.replace(record.clone());
        origins.insert(key, unit.to_string());
        return Ok(());
    };

    if existing == record || record.is_opaque {
        return Ok(());
    }
    if existing.is_opaque {
        merged.replace(record.clone());
        origins.insert(key, unit.to_string());
        return Ok(());
    }

    let first = origins.get(&key).map_or("<unknown>", String::as_str);
    Err(conflict(record, first, unit).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AbiRepresentationBuilder, EnumType, FunctionDecl, RecordKind, TypeReference,
    };

    fn unit_with(name: &str, build: impl FnOnce(&mut AbiRepresentationBuilder)) -> (String, AbiRepresentation) {
        let mut builder = AbiRepresentationBuilder::for_unit(name);
        build(&mut builder);
        (name.to_string(), builder.build().unwrap())
    }

    #[test]
    fn test_identical_duplicates_collapse() {
        let a = unit_with("a.h", |b| {
            b.add_enum(EnumType::new("E").with("X", 0)).unwrap();
        });
        let b = unit_with("b.h", |b| {
            b.add_enum(EnumType::new("E").with("X", 0)).unwrap();
            b.add_function(FunctionDecl::new("f", TypeReference::named("void"), vec![]))
                .unwrap();
        });
        let merged = merge_units([a, b]).unwrap();
        assert_eq!(merged.count(Category::Enums), 1);
        assert_eq!(merged.count(Category::Functions), 1);
    }

    #[test]
    fn test_conflict_names_both_units() {
        let a = unit_with("a.h", |b| {
            b.add_enum(EnumType::new("E").with("X", 0)).unwrap();
        });
        let b = unit_with("b.h", |b| {
            b.add_enum(EnumType::new("E").with("X", 1)).unwrap();
        });
        let err = merge_units([a, b]).unwrap_err();
        assert_eq!(
            err.model_kind(),
            Some(&ModelErrorKind::ConflictingDeclaration {
                category: Category::Enums,
                uid: "E".to_string(),
                first_unit: "a.h".to_string(),
                second_unit: "b.h".to_string(),
            })
        );
    }

    #[test]
    fn test_definition_supersedes_forward_declaration() {
        let fwd = unit_with("fwd.h", |b| {
            b.add_record(RecordType::opaque("S", RecordKind::Struct)).unwrap();
        });
        let def = unit_with("s.h", |b| {
            b.add_record(
                RecordType::new("S", RecordKind::Struct, 32, 32)
                    .with_field("a", TypeReference::named("int"), 0),
            )
            .unwrap();
        });
        let later_fwd = unit_with("other.h", |b| {
            b.add_record(RecordType::opaque("S", RecordKind::Struct)).unwrap();
        });

        let merged = merge_units([fwd, def, later_fwd]).unwrap();
        let s = merged.record("S").unwrap();
        assert!(!s.is_opaque);
        assert_eq!(s.size_bits, 32);
    }
}
