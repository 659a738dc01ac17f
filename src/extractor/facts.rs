//! Declaration facts emitted by a compiler frontend for one header unit.
//!
//! The facts schema is deliberately close to what a Clang AST walk yields
//! after type resolution: every type is a spelling plus decorations, every
//! record either carries a layout or is a forward declaration.

use crate::model::{
    Access, Indirection, Linkage, Qualifiers, RecordKind, VirtualInfo, VtableComponentKind,
};
use serde::{Deserialize, Serialize};

/// Facts schema version understood by this build.
pub const FACTS_VERSION: u32 = 1;

/// All declarations of one header unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnitFacts {
    pub facts_version: u32,
    /// Header path or unit name
    pub unit: String,
    #[serde(default)]
    pub declarations: Vec<DeclFact>,
}

impl TranslationUnitFacts {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            facts_version: FACTS_VERSION,
            unit: unit.into(),
            declarations: Vec::new(),
        }
    }

    /// Append a declaration.
    #[must_use]
    pub fn with(mut self, decl: impl Into<DeclFact>) -> Self {
        self.declarations.push(decl.into());
        self
    }
}

/// One publicly reachable declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclFact {
    Record(RecordFact),
    Enum(EnumFact),
    Function(FunctionFact),
    Variable(VariableFact),
}

impl DeclFact {
    /// Declared name, for error messages.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Record(r) => &r.name,
            Self::Enum(e) => &e.name,
            Self::Function(f) => &f.name,
            Self::Variable(v) => &v.name,
        }
    }
}

impl From<RecordFact> for DeclFact {
    fn from(fact: RecordFact) -> Self {
        Self::Record(fact)
    }
}

impl From<EnumFact> for DeclFact {
    fn from(fact: EnumFact) -> Self {
        Self::Enum(fact)
    }
}

impl From<FunctionFact> for DeclFact {
    fn from(fact: FunctionFact) -> Self {
        Self::Function(fact)
    }
}

impl From<VariableFact> for DeclFact {
    fn from(fact: VariableFact) -> Self {
        Self::Variable(fact)
    }
}

/// A type as spelled by the frontend after typedef resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRefFact {
    /// Qualified name of a record or enum, or a built-in spelling
    #[serde(default)]
    pub name: String,
    /// Template arguments when `name` is a class template
    #[serde(default)]
    pub template_args: Vec<String>,
    #[serde(default)]
    pub qualifiers: Qualifiers,
    #[serde(default)]
    pub indirection: Vec<Indirection>,
    #[serde(default)]
    pub array_extents: Vec<Option<u64>>,
    /// Set for function types; `name` is then ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<Box<FunctionTypeFact>>,
}

impl TypeRefFact {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_args: Vec::new(),
            qualifiers: Qualifiers::NONE,
            indirection: Vec::new(),
            array_extents: Vec::new(),
            function: None,
        }
    }

    /// A function type, as the pointee of a callback.
    pub fn function(signature: FunctionTypeFact) -> Self {
        Self {
            function: Some(Box::new(signature)),
            ..Self::named("")
        }
    }

    #[must_use]
    pub fn pointer(mut self) -> Self {
        self.indirection.push(Indirection::Pointer(Qualifiers::NONE));
        self
    }

    #[must_use]
    pub fn constant(mut self) -> Self {
        self.qualifiers.is_const = true;
        self
    }
}

/// Signature of a function type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionTypeFact {
    pub return_type: TypeRefFact,
    #[serde(default)]
    pub parameters: Vec<TypeRefFact>,
    #[serde(default)]
    pub variadic: bool,
    #[serde(default)]
    pub calling_convention: Option<String>,
}

impl FunctionTypeFact {
    pub fn new(return_type: TypeRefFact, parameters: Vec<TypeRefFact>) -> Self {
        Self {
            return_type,
            parameters,
            variadic: false,
            calling_convention: None,
        }
    }
}

/// A struct, class or union. `layout: None` means forward-declared only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFact {
    pub name: String,
    #[serde(default)]
    pub record_kind: RecordKind,
    #[serde(default)]
    pub template_args: Vec<String>,
    #[serde(default)]
    pub layout: Option<LayoutFact>,
}

impl RecordFact {
    /// A forward declaration.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_kind: RecordKind::Struct,
            template_args: Vec::new(),
            layout: None,
        }
    }

    /// A complete struct with no members yet.
    pub fn complete(name: impl Into<String>, size_bits: u64, align_bits: u64) -> Self {
        Self {
            name: name.into(),
            record_kind: RecordKind::Struct,
            template_args: Vec::new(),
            layout: Some(LayoutFact {
                size_bits,
                align_bits,
                bases: Vec::new(),
                fields: Vec::new(),
                vtable: Vec::new(),
            }),
        }
    }

    /// Append a field to a complete record.
    #[must_use]
    pub fn field(mut self, name: &str, type_ref: TypeRefFact, offset_bits: u64) -> Self {
        if let Some(layout) = self.layout.as_mut() {
            layout.fields.push(FieldFact {
                name: name.to_string(),
                type_ref,
                offset_bits,
                is_bitfield: false,
                bit_width: None,
                access: Access::Public,
            });
        }
        self
    }

    /// Append a virtual method slot to a complete record.
    #[must_use]
    pub fn virtual_method(mut self, method: MethodRefFact) -> Self {
        if let Some(layout) = self.layout.as_mut() {
            layout.vtable.push(VtableFact {
                component: VtableComponentKind::FunctionPointer,
                value: String::new(),
                method: Some(method),
                is_pure: false,
            });
        }
        self
    }
}

/// Layout of a complete record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFact {
    pub size_bits: u64,
    pub align_bits: u64,
    #[serde(default)]
    pub bases: Vec<BaseFact>,
    #[serde(default)]
    pub fields: Vec<FieldFact>,
    #[serde(default)]
    pub vtable: Vec<VtableFact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseFact {
    pub type_ref: TypeRefFact,
    pub offset_bits: u64,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub is_virtual: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFact {
    pub name: String,
    pub type_ref: TypeRefFact,
    pub offset_bits: u64,
    #[serde(default)]
    pub is_bitfield: bool,
    #[serde(default)]
    pub bit_width: Option<u32>,
    #[serde(default)]
    pub access: Access,
}

/// A method named by signature, used to derive its function UID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRefFact {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<TypeRefFact>,
    #[serde(default)]
    pub variadic: bool,
}

impl MethodRefFact {
    pub fn new(name: impl Into<String>, parameters: Vec<TypeRefFact>) -> Self {
        Self {
            name: name.into(),
            parameters,
            variadic: false,
        }
    }
}

/// One vtable slot. Function slots name their method; other slots carry a
/// raw value (offset or RTTI symbol).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VtableFact {
    pub component: VtableComponentKind,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub method: Option<MethodRefFact>,
    #[serde(default)]
    pub is_pure: bool,
}

/// Enumerator value as it appears in JSON: negative or small values parse as
/// signed, values above `i64::MAX` as unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValueFact {
    Signed(i64),
    Unsigned(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumeratorFact {
    pub name: String,
    pub value: EnumValueFact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumFact {
    pub name: String,
    /// Defaults to `int` when the frontend omits it
    #[serde(default)]
    pub underlying: Option<TypeRefFact>,
    #[serde(default)]
    pub enumerators: Vec<EnumeratorFact>,
}

impl EnumFact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            underlying: None,
            enumerators: Vec::new(),
        }
    }

    #[must_use]
    pub fn enumerator(mut self, name: &str, value: i64) -> Self {
        self.enumerators.push(EnumeratorFact {
            name: name.to_string(),
            value: EnumValueFact::Signed(value),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionFact {
    pub name: String,
    pub return_type: TypeRefFact,
    #[serde(default)]
    pub parameters: Vec<TypeRefFact>,
    #[serde(default)]
    pub variadic: bool,
    /// Frontend spelling, e.g. `cdecl` or `ms_abi`
    #[serde(default)]
    pub calling_convention: Option<String>,
    #[serde(default)]
    pub linkage: Linkage,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub virtual_info: Option<VirtualInfo>,
    /// Owning record for member functions
    #[serde(default)]
    pub parent: Option<TypeRefFact>,
}

impl FunctionFact {
    pub fn new(name: impl Into<String>, return_type: TypeRefFact, parameters: Vec<TypeRefFact>) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters,
            variadic: false,
            calling_convention: None,
            linkage: Linkage::External,
            access: Access::Public,
            virtual_info: None,
            parent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableFact {
    pub name: String,
    pub type_ref: TypeRefFact,
    #[serde(default)]
    pub linkage: Linkage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facts_json_shape() {
        let json = r#"{
            "facts_version": 1,
            "unit": "color.h",
            "declarations": [
                {"kind": "enum", "name": "Color",
                 "enumerators": [{"name": "RED", "value": 1},
                                 {"name": "BIG", "value": 18446744073709551615}]},
                {"kind": "record", "name": "Handle"},
                {"kind": "function", "name": "paint",
                 "return_type": {"name": "void"},
                 "parameters": [{"name": "Handle", "indirection": [{"pointer": {}}]}]}
            ]
        }"#;
        let facts: TranslationUnitFacts = serde_json::from_str(json).unwrap();
        assert_eq!(facts.declarations.len(), 3);

        match &facts.declarations[0] {
            DeclFact::Enum(e) => {
                assert_eq!(e.enumerators[0].value, EnumValueFact::Signed(1));
                assert_eq!(e.enumerators[1].value, EnumValueFact::Unsigned(u64::MAX));
            }
            other => panic!("unexpected {other:?}"),
        }
        match &facts.declarations[1] {
            DeclFact::Record(r) => assert!(r.layout.is_none()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(facts.declarations[2].name(), "paint");
    }

    #[test]
    fn test_callback_type_json_shape() {
        let json = r#"{"kind": "variable", "name": "g_on_exit",
            "type_ref": {"indirection": [{"pointer": {}}],
                         "function": {"return_type": {"name": "void"},
                                      "parameters": [{"name": "int"}],
                                      "calling_convention": "__fastcall"}}}"#;
        let decl: DeclFact = serde_json::from_str(json).unwrap();
        let DeclFact::Variable(var) = decl else {
            panic!("unexpected {decl:?}");
        };
        let signature = var.type_ref.function.expect("function type");
        assert!(var.type_ref.name.is_empty());
        assert_eq!(signature.parameters, vec![TypeRefFact::named("int")]);
        assert_eq!(signature.calling_convention.as_deref(), Some("__fastcall"));
    }
}
