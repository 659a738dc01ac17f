//! Mapping of facts onto the ABI model.

use super::facts::{
    DeclFact, EnumFact, EnumValueFact, FieldFact, FunctionFact, FunctionTypeFact, MethodRefFact,
    RecordFact, TypeRefFact, VariableFact, VtableFact,
};
use super::source::TypeGraphSource;
use crate::error::{AbiToolsError, ErrorContext, Result};
use crate::model::{
    builtins, merge_units, AbiRepresentation, AbiRepresentationBuilder, BaseSpecifier,
    CallingConvention, EnumType, Enumerator, EnumeratorValue, Field, FunctionDecl, FunctionType,
    GlobalVarDecl, RecordType, TemplateInfo, TypeReference, Uid, VtableComponent, VtableComponentKind,
};
use indexmap::IndexMap;
use rayon::prelude::*;

/// Turns declaration facts into validated [`AbiRepresentation`]s.
#[derive(Debug, Clone)]
pub struct Extractor {
    parallel: bool,
}

impl Default for Extractor {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl Extractor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract units one at a time instead of on the rayon pool.
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Extract one header unit.
    pub fn extract(&self, source: &dyn TypeGraphSource) -> Result<AbiRepresentation> {
        let facts = source.load()?;
        let unit = if facts.unit.is_empty() {
            source.unit_name().to_string()
        } else {
            facts.unit.clone()
        };
        tracing::debug!(unit = %unit, declarations = facts.declarations.len(), "extracting unit");

        let mut records: IndexMap<Uid, RecordType> = IndexMap::new();
        let mut builder = AbiRepresentationBuilder::for_unit(&unit);
        let mapper = UnitMapper { unit: &unit };

        for decl in &facts.declarations {
            match decl {
                DeclFact::Record(fact) => {
                    let record = mapper.record(fact)?;
                    match records.get(&record.uid) {
                        None => {
                            records.insert(record.uid.clone(), record);
                        }
                        Some(existing) if existing.is_opaque => {
                            records.insert(record.uid.clone(), record);
                        }
                        Some(_) if record.is_opaque => {
                            tracing::trace!(uid = %record.uid, "skipping redundant forward declaration");
                        }
                        Some(_) => {
                            // Second definition in one unit; the builder reports it.
                            builder.add_record(record)?;
                        }
                    }
                }
                DeclFact::Enum(fact) => {
                    builder.add_enum(mapper.enumeration(fact)?)?;
                }
                DeclFact::Function(fact) => {
                    builder.add_function(mapper.function(fact)?)?;
                }
                DeclFact::Variable(fact) => {
                    builder.add_global_var(mapper.variable(fact)?)?;
                }
            }
        }

        for record in records.into_values() {
            builder.add_record(record)?;
        }
        builder
            .build()
            .with_context(|| format!("extracting unit {unit}"))
    }

    /// Extract every unit, in parallel when enabled, and merge the results in
    /// input order.
    pub fn extract_all<S>(&self, sources: &[S]) -> Result<AbiRepresentation>
    where
        S: AsRef<dyn TypeGraphSource> + Sync,
    {
        let extract_one = |source: &S| -> Result<(String, AbiRepresentation)> {
            let source = source.as_ref();
            let repr = self.extract(source)?;
            Ok((source.unit_name().to_string(), repr))
        };

        let parts: Vec<(String, AbiRepresentation)> = if self.parallel {
            sources
                .par_iter()
                .map(extract_one)
                .collect::<Result<Vec<_>>>()?
        } else {
            sources
                .iter()
                .map(extract_one)
                .collect::<Result<Vec<_>>>()?
        };

        tracing::info!(units = parts.len(), "merging extracted units");
        merge_units(parts)
    }
}

/// Per-unit conversion state.
struct UnitMapper<'a> {
    unit: &'a str,
}

impl UnitMapper<'_> {
    fn invalid(&self, name: &str, reason: impl Into<String>) -> AbiToolsError {
        AbiToolsError::invalid_declaration(self.unit, name, reason)
    }

    fn require_name(&self, name: &str, what: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(self.invalid("<anonymous>", format!("{what} has an empty name")));
        }
        Ok(())
    }

    fn type_uid(&self, owner: &str, fact: &TypeRefFact) -> Result<Uid> {
        if fact.name.trim().is_empty() {
            return Err(self.invalid(owner, "type reference has an empty name"));
        }
        if !fact.template_args.is_empty() {
            let args: Vec<String> = fact.template_args.iter().map(|a| canonical_arg(a)).collect();
            return Ok(Uid::for_instantiation(&fact.name, &args));
        }
        Ok(match builtins::canonical_name(&fact.name) {
            Some(builtin) => Uid::new(builtin),
            None => Uid::from_name(&fact.name),
        })
    }

    fn type_ref(&self, owner: &str, fact: &TypeRefFact) -> Result<TypeReference> {
        let base = match &fact.function {
            Some(signature) => TypeReference::function(self.function_type(owner, signature)?),
            None => TypeReference::named(self.type_uid(owner, fact)?),
        };
        Ok(TypeReference {
            qualifiers: fact.qualifiers,
            indirection: fact.indirection.clone(),
            array_extents: fact.array_extents.clone(),
            ..base
        })
    }

    fn function_type(&self, owner: &str, fact: &FunctionTypeFact) -> Result<FunctionType> {
        Ok(FunctionType {
            return_type: self.type_ref(owner, &fact.return_type)?,
            parameters: fact
                .parameters
                .iter()
                .map(|p| self.type_ref(owner, p))
                .collect::<Result<Vec<_>>>()?,
            variadic: fact.variadic,
            calling_convention: parse_convention(fact.calling_convention.as_deref()),
        })
    }

    fn function_uid(
        &self,
        owner: &str,
        name: &str,
        parameters: &[TypeRefFact],
        variadic: bool,
    ) -> Result<(Uid, Vec<TypeReference>)> {
        let params = parameters
            .iter()
            .map(|p| self.type_ref(owner, p))
            .collect::<Result<Vec<_>>>()?;
        let spellings: Vec<String> = params.iter().map(ToString::to_string).collect();
        Ok((Uid::for_function(name, &spellings, variadic), params))
    }

    fn record(&self, fact: &RecordFact) -> Result<RecordType> {
        self.require_name(&fact.name, "record")?;
        let arguments: Vec<String> = fact.template_args.iter().map(|a| canonical_arg(a)).collect();
        let uid = Uid::for_instantiation(&fact.name, &arguments);
        let template = if arguments.is_empty() {
            TemplateInfo::Plain
        } else {
            TemplateInfo::Instantiation {
                template_name: fact.name.trim().to_string(),
                arguments,
            }
        };

        let mut record = RecordType {
            uid,
            name: fact.name.trim().to_string(),
            kind: fact.record_kind,
            size_bits: 0,
            align_bits: 0,
            bases: Vec::new(),
            fields: Vec::new(),
            vtable: Vec::new(),
            template,
            is_opaque: true,
        };

        let Some(layout) = &fact.layout else {
            return Ok(record);
        };
        let owner = record.uid.to_string();

        record.is_opaque = false;
        record.size_bits = layout.size_bits;
        record.align_bits = layout.align_bits;
        record.bases = layout
            .bases
            .iter()
            .map(|b| {
                Ok(BaseSpecifier {
                    uid: self.type_uid(&owner, &b.type_ref)?,
                    offset_bits: b.offset_bits,
                    access: b.access,
                    is_virtual: b.is_virtual,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        record.fields = layout
            .fields
            .iter()
            .map(|f| self.field(&owner, f))
            .collect::<Result<Vec<_>>>()?;
        record.vtable = layout
            .vtable
            .iter()
            .map(|v| self.vtable_slot(&owner, v))
            .collect::<Result<Vec<_>>>()?;
        Ok(record)
    }

    /// Unnamed members (padding bitfields, anonymous structs and unions)
    /// keep an empty name; the diff pairs them by offset.
    fn field(&self, owner: &str, fact: &FieldFact) -> Result<Field> {
        if fact.is_bitfield && fact.bit_width.is_none() {
            return Err(self.invalid(owner, format!("bitfield '{}' has no width", fact.name)));
        }
        Ok(Field {
            name: fact.name.clone(),
            type_ref: self.type_ref(owner, &fact.type_ref)?,
            offset_bits: fact.offset_bits,
            bit_width: fact.bit_width,
            access: fact.access,
        })
    }

    fn vtable_slot(&self, owner: &str, fact: &VtableFact) -> Result<VtableComponent> {
        let value = match (&fact.method, fact.component) {
            (Some(method), _) => self.method_uid(owner, method)?.to_string(),
            (
                None,
                VtableComponentKind::FunctionPointer
                | VtableComponentKind::CompleteDtorPointer
                | VtableComponentKind::DeletingDtorPointer,
            ) if fact.value.is_empty() => {
                return Err(self.invalid(owner, "function vtable slot names no method"));
            }
            (None, _) => fact.value.clone(),
        };
        Ok(VtableComponent {
            kind: fact.component,
            value,
            is_pure: fact.is_pure,
        })
    }

    fn method_uid(&self, owner: &str, method: &MethodRefFact) -> Result<Uid> {
        self.function_uid(owner, &method.name, &method.parameters, method.variadic)
            .map(|(uid, _)| uid)
    }

    fn enumeration(&self, fact: &EnumFact) -> Result<EnumType> {
        self.require_name(&fact.name, "enum")?;
        let underlying = match &fact.underlying {
            Some(t) => self.type_ref(&fact.name, t)?,
            None => TypeReference::named("int"),
        };
        let mut enumerators = Vec::with_capacity(fact.enumerators.len());
        for e in &fact.enumerators {
            if e.name.trim().is_empty() {
                return Err(self.invalid(&fact.name, "enumerator has an empty name"));
            }
            enumerators.push(Enumerator {
                name: e.name.clone(),
                value: match e.value {
                    EnumValueFact::Signed(v) => EnumeratorValue::Signed(v),
                    EnumValueFact::Unsigned(v) => EnumeratorValue::Unsigned(v),
                },
            });
        }
        Ok(EnumType {
            uid: Uid::from_name(&fact.name),
            name: fact.name.trim().to_string(),
            underlying,
            enumerators,
        })
    }

    fn function(&self, fact: &FunctionFact) -> Result<FunctionDecl> {
        self.require_name(&fact.name, "function")?;
        let (uid, parameters) =
            self.function_uid(&fact.name, &fact.name, &fact.parameters, fact.variadic)?;
        let parent = fact
            .parent
            .as_ref()
            .map(|p| self.type_uid(&fact.name, p))
            .transpose()?;
        if fact.virtual_info.is_some() && parent.is_none() {
            return Err(self.invalid(&fact.name, "virtual function without an owning record"));
        }
        Ok(FunctionDecl {
            uid,
            name: fact.name.trim().to_string(),
            return_type: self.type_ref(&fact.name, &fact.return_type)?,
            parameters,
            variadic: fact.variadic,
            calling_convention: parse_convention(fact.calling_convention.as_deref()),
            linkage: fact.linkage,
            access: fact.access,
            virtual_info: fact.virtual_info,
            parent,
        })
    }

    fn variable(&self, fact: &VariableFact) -> Result<GlobalVarDecl> {
        self.require_name(&fact.name, "variable")?;
        Ok(GlobalVarDecl {
            uid: Uid::from_name(&fact.name),
            name: fact.name.trim().to_string(),
            type_ref: self.type_ref(&fact.name, &fact.type_ref)?,
            linkage: fact.linkage,
        })
    }
}

fn parse_convention(spelling: Option<&str>) -> CallingConvention {
    spelling.map(CallingConvention::parse).unwrap_or_default()
}

/// Template arguments that spell built-ins are canonicalized so that
/// `Vec<unsigned>` and `Vec<unsigned int>` share a UID.
fn canonical_arg(arg: &str) -> String {
    builtins::canonical_name(arg).map_or_else(|| arg.trim().to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractErrorKind, ModelErrorKind};
    use crate::extractor::{InMemorySource, LayoutFact, TranslationUnitFacts};
    use crate::model::{Category, Linkage};

    fn extract(facts: TranslationUnitFacts) -> Result<AbiRepresentation> {
        Extractor::new().extract(&InMemorySource::new(facts))
    }

    #[test]
    fn test_builtin_spellings_canonicalized() {
        let facts = TranslationUnitFacts::new("a.h").with(FunctionFact::new(
            "f",
            TypeRefFact::named("long int"),
            vec![TypeRefFact::named("unsigned")],
        ));
        let repr = extract(facts).unwrap();
        let f = repr.function("f(unsigned int)").expect("canonical uid");
        assert_eq!(f.return_type.uid.as_str(), "long");
    }

    #[test]
    fn test_template_instantiation_flattened() {
        let mut vec_fact = RecordFact::complete("ns::Vec", 64, 32)
            .field("len", TypeRefFact::named("int"), 0)
            .field("cap", TypeRefFact::named("int"), 32);
        vec_fact.template_args = vec!["unsigned".to_string(), "4".to_string()];

        let repr = extract(TranslationUnitFacts::new("vec.h").with(vec_fact)).unwrap();
        let record = repr.record("ns::Vec<unsigned int, 4>").expect("instantiation");
        assert_eq!(
            record.template,
            TemplateInfo::Instantiation {
                template_name: "ns::Vec".to_string(),
                arguments: vec!["unsigned int".to_string(), "4".to_string()],
            }
        );
    }

    #[test]
    fn test_forward_declaration_then_definition() {
        let facts = TranslationUnitFacts::new("s.h")
            .with(RecordFact::opaque("S"))
            .with(RecordFact::complete("S", 32, 32).field("a", TypeRefFact::named("int"), 0))
            .with(RecordFact::opaque("S"));
        let repr = extract(facts).unwrap();
        assert_eq!(repr.count(Category::Records), 1);
        assert!(!repr.record("S").unwrap().is_opaque);
    }

    #[test]
    fn test_two_definitions_in_one_unit() {
        let facts = TranslationUnitFacts::new("s.h")
            .with(RecordFact::complete("S", 32, 32))
            .with(RecordFact::complete("S", 64, 32));
        let err = extract(facts).unwrap_err();
        assert!(matches!(
            err.model_kind(),
            Some(ModelErrorKind::DuplicateDeclaration { unit: Some(u), .. }) if u == "s.h"
        ));
    }

    #[test]
    fn test_bitfield_without_width_rejected() {
        let mut record = RecordFact::complete("Flags", 32, 32);
        if let Some(LayoutFact { fields, .. }) = record.layout.as_mut() {
            fields.push(FieldFact {
                name: "bad".to_string(),
                type_ref: TypeRefFact::named("unsigned int"),
                offset_bits: 0,
                is_bitfield: true,
                bit_width: None,
                access: crate::model::Access::Public,
            });
        }
        let err = extract(TranslationUnitFacts::new("flags.h").with(record)).unwrap_err();
        match err {
            AbiToolsError::Extraction {
                context,
                source: ExtractErrorKind::InvalidDeclaration { name, reason },
            } => {
                assert!(context.contains("flags.h"));
                assert_eq!(name, "Flags");
                assert!(reason.contains("bad"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn bitfield(name: &str, offset_bits: u64, width: u32) -> FieldFact {
        FieldFact {
            name: name.to_string(),
            type_ref: TypeRefFact::named("unsigned int"),
            offset_bits,
            is_bitfield: true,
            bit_width: Some(width),
            access: crate::model::Access::Public,
        }
    }

    #[test]
    fn test_unnamed_members_accepted() {
        let mut record = RecordFact::complete("S", 64, 32);
        if let Some(layout) = record.layout.as_mut() {
            layout.fields.push(bitfield("a", 0, 3));
            layout.fields.push(bitfield("", 3, 5));
            layout.fields.push(bitfield("", 32, 0));
            layout.fields.push(bitfield("b", 32, 4));
        }
        let repr = extract(TranslationUnitFacts::new("s.h").with(record)).unwrap();
        let s = repr.record("S").unwrap();
        let unnamed: Vec<String> = s.fields.iter().filter(|f| f.is_unnamed()).map(Field::label).collect();
        assert_eq!(unnamed, ["<unnamed@3>", "<unnamed@32>"]);
    }

    #[test]
    fn test_callback_types_extracted() {
        let mut callback = FunctionTypeFact::new(
            TypeRefFact::named("void"),
            vec![TypeRefFact::named("Event").pointer(), TypeRefFact::named("unsigned")],
        );
        callback.calling_convention = Some("__stdcall".to_string());
        let facts = TranslationUnitFacts::new("events.h")
            .with(RecordFact::opaque("Event"))
            .with(
                RecordFact::complete("Listener", 64, 64)
                    .field("cb", TypeRefFact::function(callback.clone()).pointer(), 0),
            )
            .with(FunctionFact::new(
                "listen",
                TypeRefFact::named("int"),
                vec![TypeRefFact::function(callback).pointer()],
            ));

        let repr = extract(facts).unwrap();
        let cb = &repr.record("Listener").unwrap().fields[0].type_ref;
        let signature = cb.function.as_deref().expect("function type");
        assert_eq!(signature.calling_convention, CallingConvention::StdCall);
        assert_eq!(signature.parameters[1].uid.as_str(), "unsigned int");
        assert!(repr
            .function("listen(void (*)(Event *, unsigned int) [stdcall])")
            .is_some());
    }

    #[test]
    fn test_callback_with_unknown_type_rejected() {
        let callback = FunctionTypeFact::new(TypeRefFact::named("Missing"), vec![]);
        let facts = TranslationUnitFacts::new("a.h").with(VariableFact {
            name: "g_hook".to_string(),
            type_ref: TypeRefFact::function(callback).pointer(),
            linkage: Linkage::External,
        });
        let err = extract(facts).unwrap_err();
        assert!(matches!(
            err.model_kind(),
            Some(ModelErrorKind::UnresolvedTypeReference { target, .. }) if target == "Missing"
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let facts = TranslationUnitFacts::new("a.h").with(EnumFact::new("  "));
        assert!(matches!(extract(facts), Err(AbiToolsError::Extraction { .. })));
    }

    #[test]
    fn test_vtable_slots_use_function_uids() {
        let shape = RecordFact::complete("Shape", 64, 64)
            .virtual_method(MethodRefFact::new("Shape::area", vec![]))
            .virtual_method(MethodRefFact::new(
                "Shape::scale",
                vec![TypeRefFact::named("double")],
            ));
        let repr = extract(TranslationUnitFacts::new("shape.h").with(shape)).unwrap();
        let values: Vec<&str> = repr.record("Shape").unwrap().vtable.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(values, ["Shape::area()", "Shape::scale(double)"]);
    }

    #[test]
    fn test_extract_all_merges_in_order() {
        let a = TranslationUnitFacts::new("a.h").with(EnumFact::new("E").enumerator("X", 0));
        let mut g = VariableFact {
            name: "counter".to_string(),
            type_ref: TypeRefFact::named("int"),
            linkage: Linkage::External,
        };
        let b = TranslationUnitFacts::new("b.h")
            .with(EnumFact::new("E").enumerator("X", 0))
            .with(g.clone());
        g.linkage = Linkage::Weak;
        let c = TranslationUnitFacts::new("c.h").with(g);

        let ok: Vec<Box<dyn TypeGraphSource>> = vec![
            Box::new(InMemorySource::new(a.clone())),
            Box::new(InMemorySource::new(b.clone())),
        ];
        let repr = Extractor::new().extract_all(&ok).unwrap();
        assert_eq!(repr.len(), 2);

        let conflicting: Vec<Box<dyn TypeGraphSource>> = vec![
            Box::new(InMemorySource::new(a)),
            Box::new(InMemorySource::new(b)),
            Box::new(InMemorySource::new(c)),
        ];
        let err = Extractor::new().sequential().extract_all(&conflicting).unwrap_err();
        assert!(matches!(
            err.model_kind(),
            Some(ModelErrorKind::ConflictingDeclaration { first_unit, second_unit, .. })
                if first_unit == "b.h" && second_unit == "c.h"
        ));
    }
}
