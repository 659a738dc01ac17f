//! Record types: structs, classes and unions with their layout.

use super::{Access, TypeReference, Uid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    #[default]
    Struct,
    Class,
    Union,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Struct => "struct",
            Self::Class => "class",
            Self::Union => "union",
        })
    }
}

/// A direct base class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseSpecifier {
    /// UID of the base record
    pub uid: Uid,
    /// Offset of the base subobject in bits (0 for virtual bases)
    pub offset_bits: u64,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub is_virtual: bool,
}

/// A data member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeReference,
    pub offset_bits: u64,
    /// Width for bitfields, `None` for ordinary members
    #[serde(default)]
    pub bit_width: Option<u32>,
    #[serde(default)]
    pub access: Access,
}

impl Field {
    /// True for bitfield members.
    #[must_use]
    pub fn is_bitfield(&self) -> bool {
        self.bit_width.is_some()
    }

    /// Unnamed padding bitfields and anonymous struct or union members.
    #[must_use]
    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }

    /// Name for messages; unnamed members are labelled by offset.
    #[must_use]
    pub fn label(&self) -> String {
        if self.is_unnamed() {
            format!("<unnamed@{}>", self.offset_bits)
        } else {
            self.name.clone()
        }
    }
}

/// Kind of a vtable slot, following the Itanium C++ ABI component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VtableComponentKind {
    VCallOffset,
    VBaseOffset,
    OffsetToTop,
    Rtti,
    FunctionPointer,
    CompleteDtorPointer,
    DeletingDtorPointer,
    UnusedFunctionPointer,
}

impl fmt::Display for VtableComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::VCallOffset => "vcall offset",
            Self::VBaseOffset => "vbase offset",
            Self::OffsetToTop => "offset to top",
            Self::Rtti => "rtti",
            Self::FunctionPointer => "function pointer",
            Self::CompleteDtorPointer => "complete dtor pointer",
            Self::DeletingDtorPointer => "deleting dtor pointer",
            Self::UnusedFunctionPointer => "unused function pointer",
        })
    }
}

/// One slot of a record's vtable. The slot index is the position in
/// [`RecordType::vtable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VtableComponent {
    pub kind: VtableComponentKind,
    /// Function UID for pointer slots, symbol or numeric value otherwise
    pub value: String,
    #[serde(default)]
    pub is_pure: bool,
}

impl fmt::Display for VtableComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.value)?;
        if self.is_pure {
            f.write_str(" = 0")?;
        }
        Ok(())
    }
}

/// Whether a record is a plain type or a flattened template instantiation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateInfo {
    #[default]
    Plain,
    Instantiation {
        template_name: String,
        arguments: Vec<String>,
    },
}

impl TemplateInfo {
    #[must_use]
    pub fn is_instantiation(&self) -> bool {
        matches!(self, Self::Instantiation { .. })
    }
}

/// A struct, class or union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    pub uid: Uid,
    /// Qualified name as written (without template arguments)
    pub name: String,
    #[serde(default)]
    pub kind: RecordKind,
    #[serde(default)]
    pub size_bits: u64,
    #[serde(default)]
    pub align_bits: u64,
    #[serde(default)]
    pub bases: Vec<BaseSpecifier>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub vtable: Vec<VtableComponent>,
    #[serde(default)]
    pub template: TemplateInfo,
    /// Forward-declared only; no layout information
    #[serde(default)]
    pub is_opaque: bool,
}

impl RecordType {
    /// A complete record with no members yet.
    pub fn new(name: impl Into<String>, kind: RecordKind, size_bits: u64, align_bits: u64) -> Self {
        let name = name.into();
        Self {
            uid: Uid::from_name(&name),
            name,
            kind,
            size_bits,
            align_bits,
            bases: Vec::new(),
            fields: Vec::new(),
            vtable: Vec::new(),
            template: TemplateInfo::Plain,
            is_opaque: false,
        }
    }

    /// A forward-declared record.
    pub fn opaque(name: impl Into<String>, kind: RecordKind) -> Self {
        let mut record = Self::new(name, kind, 0, 0);
        record.is_opaque = true;
        record
    }

    /// Append a field.
    #[must_use]
    pub fn with_field(mut self, name: &str, type_ref: TypeReference, offset_bits: u64) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            type_ref,
            offset_bits,
            bit_width: None,
            access: Access::Public,
        });
        self
    }

    /// Append a bitfield.
    #[must_use]
    pub fn with_bitfield(
        mut self,
        name: &str,
        type_ref: TypeReference,
        offset_bits: u64,
        width: u32,
    ) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            type_ref,
            offset_bits,
            bit_width: Some(width),
            access: Access::Public,
        });
        self
    }

    /// Append a base.
    #[must_use]
    pub fn with_base(mut self, uid: impl Into<Uid>, offset_bits: u64) -> Self {
        self.bases.push(BaseSpecifier {
            uid: uid.into(),
            offset_bits,
            access: Access::Public,
            is_virtual: false,
        });
        self
    }

    /// Append a function-pointer vtable slot.
    #[must_use]
    pub fn with_virtual(mut self, function_uid: &str) -> Self {
        self.vtable.push(VtableComponent {
            kind: VtableComponentKind::FunctionPointer,
            value: function_uid.to_string(),
            is_pure: false,
        });
        self
    }

    #[must_use]
    pub fn is_union(&self) -> bool {
        self.kind == RecordKind::Union
    }

    /// True if the record has a vtable.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        !self.vtable.is_empty()
    }

    /// No fields, no bases and no vtable: an empty base class takes no space
    /// in a derived object.
    #[must_use]
    pub fn is_empty_layout(&self) -> bool {
        !self.is_opaque && self.fields.is_empty() && self.bases.is_empty() && self.vtable.is_empty()
    }

    /// Look up a field by name. With duplicate names this is the first.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builders() {
        let s = RecordType::new("ns::S", RecordKind::Struct, 64, 32)
            .with_field("a", TypeReference::named("int"), 0)
            .with_bitfield("flags", TypeReference::named("unsigned int"), 32, 3);

        assert_eq!(s.uid.as_str(), "ns::S");
        assert!(s.field("flags").is_some_and(Field::is_bitfield));
        assert!(!s.is_dynamic());
        assert!(!s.is_empty_layout());
    }

    #[test]
    fn test_unnamed_field_label() {
        let s = RecordType::new("S", RecordKind::Struct, 32, 32)
            .with_bitfield("a", TypeReference::named("int"), 0, 3)
            .with_bitfield("", TypeReference::named("int"), 3, 5);
        assert_eq!(s.fields[0].label(), "a");
        assert!(s.fields[1].is_unnamed());
        assert_eq!(s.fields[1].label(), "<unnamed@3>");
    }

    #[test]
    fn test_opaque_record_is_not_empty_layout() {
        let fwd = RecordType::opaque("Handle", RecordKind::Struct);
        assert!(fwd.is_opaque);
        assert!(!fwd.is_empty_layout());
    }

    #[test]
    fn test_vtable_component_display() {
        let slot = VtableComponent {
            kind: VtableComponentKind::FunctionPointer,
            value: "Shape::area()".to_string(),
            is_pure: true,
        };
        assert_eq!(slot.to_string(), "function pointer Shape::area() = 0");
    }
}
