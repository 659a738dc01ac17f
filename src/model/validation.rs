//! Invariant checks run whenever a snapshot is sealed.
//!
//! Two families: every type reference held by a non-opaque entity must
//! resolve, and every complete record must have a consistent layout.

use super::{builtins, AbiEntity, AbiRepresentation, Category, Field, RecordType, TypeReference};
use crate::error::{ModelErrorKind, Result};
use indexmap::IndexMap;

pub(crate) fn validate(repr: &AbiRepresentation) -> Result<()> {
    check_references(repr, repr.records())?;
    check_references(repr, repr.enums())?;
    check_references(repr, repr.functions())?;
    check_references(repr, repr.global_vars())?;

    for record in repr.records().values() {
        check_record_links(repr, record)?;
    }
    for function in repr.functions().values() {
        if let Some(parent) = &function.parent {
            if repr.record(parent.as_str()).is_none() {
                return Err(unresolved(Category::Functions, function.uid.as_str(), parent.as_str()));
            }
        }
    }

    for record in repr.records().values() {
        if !record.is_opaque {
            check_layout(repr, record)?;
        }
    }
    Ok(())
}

fn check_references<T: AbiEntity>(
    repr: &AbiRepresentation,
    entities: &IndexMap<super::Uid, T>,
) -> Result<()> {
    for entity in entities.values() {
        let nested = entity.type_references().into_iter().flat_map(TypeReference::walk);
        for type_ref in nested {
            if !type_ref.is_function() && !repr.resolves(type_ref.uid.as_str()) {
                return Err(unresolved(
                    T::CATEGORY,
                    entity.uid().as_str(),
                    type_ref.uid.as_str(),
                ));
            }
        }
    }
    Ok(())
}

fn check_record_links(repr: &AbiRepresentation, record: &RecordType) -> Result<()> {
    if record.is_opaque {
        return Ok(());
    }
    for base in &record.bases {
        if repr.record(base.uid.as_str()).is_none() {
            return Err(unresolved(Category::Records, record.uid.as_str(), base.uid.as_str()));
        }
    }
    Ok(())
}

fn unresolved(category: Category, referrer: &str, target: &str) -> crate::error::AbiToolsError {
    ModelErrorKind::UnresolvedTypeReference {
        category,
        referrer: referrer.to_string(),
        target: target.to_string(),
    }
    .into()
}

fn invalid_layout(record: &RecordType, reason: String) -> crate::error::AbiToolsError {
    ModelErrorKind::InvalidLayout {
        uid: record.uid.to_string(),
        reason,
    }
    .into()
}

/// Bits occupied by a value of the referenced type, or 0 when not known
/// (pointers, opaque records, ABI-dependent built-ins).
pub(crate) fn type_extent(repr: &AbiRepresentation, type_ref: &TypeReference) -> u64 {
    if type_ref.is_indirect() {
        return 0;
    }
    let element = element_size(repr, type_ref.uid.as_str());
    type_ref
        .array_extents
        .iter()
        .fold(element, |acc, extent| acc.saturating_mul(extent.unwrap_or(0)))
}

fn element_size(repr: &AbiRepresentation, uid: &str) -> u64 {
    if let Some(record) = repr.record(uid) {
        return if record.is_opaque { 0 } else { record.size_bits };
    }
    if let Some(enumeration) = repr.enumeration(uid) {
        return builtin_size(enumeration.underlying.uid.as_str());
    }
    builtin_size(uid)
}

fn builtin_size(name: &str) -> u64 {
    builtins::lookup(name)
        .and_then(|b| b.size_bits)
        .unwrap_or(0)
}

fn field_extent(repr: &AbiRepresentation, field: &Field) -> u64 {
    match field.bit_width {
        Some(width) => u64::from(width),
        None => type_extent(repr, &field.type_ref),
    }
}

fn check_layout(repr: &AbiRepresentation, record: &RecordType) -> Result<()> {
    let mut previous: Option<(&Field, u64)> = None;

    for field in &record.fields {
        let end = field.offset_bits.saturating_add(field_extent(repr, field));

        if !record.is_union() {
            if let Some((prev, prev_end)) = previous {
                if field.offset_bits < prev.offset_bits {
                    return Err(invalid_layout(
                        record,
                        format!(
                            "field '{}' at offset {} precedes field '{}' at offset {}",
                            field.label(),
                            field.offset_bits,
                            prev.label(),
                            prev.offset_bits
                        ),
                    ));
                }
                if field.offset_bits < prev_end {
                    return Err(invalid_layout(
                        record,
                        format!(
                            "field '{}' at offset {} overlaps field '{}' ending at {}",
                            field.label(),
                            field.offset_bits,
                            prev.label(),
                            prev_end
                        ),
                    ));
                }
            }
            previous = Some((field, end));
        }

        if end > record.size_bits {
            return Err(invalid_layout(
                record,
                format!(
                    "size {} is smaller than the end of field '{}' ({})",
                    record.size_bits,
                    field.label(),
                    end
                ),
            ));
        }
    }

    for base in record.bases.iter().filter(|b| !b.is_virtual) {
        let Some(base_record) = repr.record(base.uid.as_str()) else {
            continue;
        };
        if base_record.is_opaque || base_record.is_empty_layout() {
            continue;
        }
        let end = base.offset_bits.saturating_add(base_record.size_bits);
        if end > record.size_bits {
            return Err(invalid_layout(
                record,
                format!(
                    "size {} is smaller than the end of base '{}' ({})",
                    record.size_bits, base.uid, end
                ),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::error::ModelErrorKind;
    use crate::model::{
        AbiRepresentationBuilder, EnumType, FunctionDecl, FunctionType, RecordKind, RecordType,
        TypeReference,
    };

    fn build_with(records: Vec<RecordType>) -> crate::error::Result<crate::model::AbiRepresentation> {
        let mut builder = AbiRepresentationBuilder::new();
        for r in records {
            builder.add_record(r)?;
        }
        builder.build()
    }

    #[test]
    fn test_unresolved_field_type() {
        let s = RecordType::new("S", RecordKind::Struct, 32, 32)
            .with_field("t", TypeReference::named("Missing"), 0);
        let err = build_with(vec![s]).unwrap_err();
        assert!(matches!(
            err.model_kind(),
            Some(ModelErrorKind::UnresolvedTypeReference { target, .. }) if target == "Missing"
        ));
    }

    #[test]
    fn test_callback_field_resolves_structurally() {
        let callback = TypeReference::function(FunctionType::new(
            TypeReference::named("void"),
            vec![TypeReference::named("Event").pointer()],
        ))
        .pointer();
        let event = RecordType::opaque("Event", RecordKind::Struct);
        let s = RecordType::new("Handler", RecordKind::Struct, 64, 64)
            .with_field("cb", callback.clone(), 0);
        assert!(build_with(vec![event, s]).is_ok());

        // The signature's own types must resolve
        let s = RecordType::new("Handler", RecordKind::Struct, 64, 64).with_field("cb", callback, 0);
        let err = build_with(vec![s]).unwrap_err();
        assert!(matches!(
            err.model_kind(),
            Some(ModelErrorKind::UnresolvedTypeReference { target, .. }) if target == "Event"
        ));
    }

    #[test]
    fn test_type_may_name_a_function() {
        let mut builder = AbiRepresentationBuilder::new();
        builder
            .add_function(FunctionDecl::new(
                "cb_t",
                TypeReference::named("void"),
                vec![TypeReference::named("int")],
            ))
            .unwrap()
            .add_record(
                RecordType::new("S", RecordKind::Struct, 64, 64)
                    .with_field("cb", TypeReference::named("cb_t(int)").pointer(), 0),
            )
            .unwrap();
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_pointer_to_opaque_is_fine() {
        let fwd = RecordType::opaque("Impl", RecordKind::Struct);
        let s = RecordType::new("S", RecordKind::Struct, 64, 64)
            .with_field("p", TypeReference::named("Impl").pointer(), 0);
        assert!(build_with(vec![fwd, s]).is_ok());
    }

    #[test]
    fn test_overlapping_fields_rejected() {
        let s = RecordType::new("S", RecordKind::Struct, 64, 32)
            .with_field("a", TypeReference::named("int"), 0)
            .with_field("b", TypeReference::named("int"), 16);
        let err = build_with(vec![s]).unwrap_err();
        assert!(matches!(err.model_kind(), Some(ModelErrorKind::InvalidLayout { .. })));
    }

    #[test]
    fn test_decreasing_offsets_rejected() {
        let s = RecordType::new("S", RecordKind::Struct, 64, 32)
            .with_field("a", TypeReference::named("int"), 32)
            .with_field("b", TypeReference::named("int"), 0);
        assert!(build_with(vec![s]).is_err());
    }

    #[test]
    fn test_size_smaller_than_last_field() {
        let s = RecordType::new("S", RecordKind::Struct, 32, 32)
            .with_field("a", TypeReference::named("int"), 0)
            .with_field("b", TypeReference::named("int"), 32);
        let err = build_with(vec![s]).unwrap_err();
        match err.model_kind() {
            Some(ModelErrorKind::InvalidLayout { uid, reason }) => {
                assert_eq!(uid, "S");
                assert!(reason.contains("'b'"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bitfields_pack() {
        let s = RecordType::new("Flags", RecordKind::Struct, 32, 32)
            .with_bitfield("a", TypeReference::named("unsigned int"), 0, 3)
            .with_bitfield("b", TypeReference::named("unsigned int"), 3, 5);
        assert!(build_with(vec![s]).is_ok());
    }

    #[test]
    fn test_union_members_share_offset() {
        let u = RecordType::new("U", RecordKind::Union, 64, 64)
            .with_field("i", TypeReference::named("int"), 0)
            .with_field("d", TypeReference::named("double"), 0);
        assert!(build_with(vec![u]).is_ok());
    }

    #[test]
    fn test_base_extent_checked() {
        let base = RecordType::new("B", RecordKind::Struct, 64, 32)
            .with_field("x", TypeReference::named("long long"), 0);
        let derived = RecordType::new("D", RecordKind::Struct, 32, 32).with_base("B", 0);
        assert!(build_with(vec![base, derived]).is_err());
    }

    #[test]
    fn test_empty_base_ignored() {
        let empty = RecordType::new("Tag", RecordKind::Struct, 8, 8);
        let derived = RecordType::new("D", RecordKind::Struct, 32, 32)
            .with_base("Tag", 0)
            .with_field("x", TypeReference::named("int"), 0);
        assert!(build_with(vec![empty, derived]).is_ok());
    }

    #[test]
    fn test_enum_field_uses_underlying_size() {
        let mut builder = AbiRepresentationBuilder::new();
        builder
            .add_enum(EnumType::new("Small").with_underlying(TypeReference::named("unsigned char")))
            .unwrap()
            .add_record(
                RecordType::new("S", RecordKind::Struct, 16, 8)
                    .with_field("e", TypeReference::named("Small"), 0)
                    .with_field("c", TypeReference::named("char"), 8),
            )
            .unwrap();
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_method_parent_must_exist() {
        let mut builder = AbiRepresentationBuilder::new();
        builder
            .add_function(
                FunctionDecl::new("C::f", TypeReference::named("void"), vec![])
                    .as_virtual_member("C", 0),
            )
            .unwrap();
        assert!(builder.build().is_err());
    }
}
