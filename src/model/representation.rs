//! The dump root and its builder.

use super::validation;
use super::{
    Category, EnumType, FunctionDecl, GlobalVarDecl, Linkage, RecordType, TypeReference, Uid,
};
use crate::error::{ModelErrorKind, Result};
use indexmap::IndexMap;
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

/// Current in-memory and wire format version.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

mod sealed {
    use super::{AbiRepresentation, IndexMap, Uid};

    pub trait Sealed: Sized {
        fn collection_mut(repr: &mut AbiRepresentation) -> &mut IndexMap<Uid, Self>;
    }
}

/// Common view over the four entity kinds.
pub trait AbiEntity: sealed::Sealed + Clone + PartialEq + Serialize + Send + Sync {
    const CATEGORY: Category;

    fn uid(&self) -> &Uid;

    fn name(&self) -> &str;

    /// Symbol linkage, for entities that have one.
    fn linkage(&self) -> Option<Linkage> {
        None
    }

    /// Records and enums are always visible; functions and globals unless
    /// they have internal linkage.
    fn is_externally_visible(&self) -> bool {
        self.linkage()
            .map_or(true, |linkage| linkage.is_externally_visible())
    }

    /// Every type reference this entity holds that must resolve.
    fn type_references(&self) -> Vec<&TypeReference>;

    /// The category map in `repr` holding this kind of entity.
    fn collection(repr: &AbiRepresentation) -> &IndexMap<Uid, Self>;
}

impl sealed::Sealed for RecordType {
    fn collection_mut(repr: &mut AbiRepresentation) -> &mut IndexMap<Uid, Self> {
        &mut repr.records
    }
}

impl AbiEntity for RecordType {
    const CATEGORY: Category = Category::Records;

    fn uid(&self) -> &Uid {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_references(&self) -> Vec<&TypeReference> {
        if self.is_opaque {
            return Vec::new();
        }
        self.fields.iter().map(|f| &f.type_ref).collect()
    }

    fn collection(repr: &AbiRepresentation) -> &IndexMap<Uid, Self> {
        &repr.records
    }
}

impl sealed::Sealed for EnumType {
    fn collection_mut(repr: &mut AbiRepresentation) -> &mut IndexMap<Uid, Self> {
        &mut repr.enums
    }
}

impl AbiEntity for EnumType {
    const CATEGORY: Category = Category::Enums;

    fn uid(&self) -> &Uid {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_references(&self) -> Vec<&TypeReference> {
        vec![&self.underlying]
    }

    fn collection(repr: &AbiRepresentation) -> &IndexMap<Uid, Self> {
        &repr.enums
    }
}

impl sealed::Sealed for FunctionDecl {
    fn collection_mut(repr: &mut AbiRepresentation) -> &mut IndexMap<Uid, Self> {
        &mut repr.functions
    }
}

impl AbiEntity for FunctionDecl {
    const CATEGORY: Category = Category::Functions;

    fn uid(&self) -> &Uid {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn linkage(&self) -> Option<Linkage> {
        Some(self.linkage)
    }

    fn type_references(&self) -> Vec<&TypeReference> {
        self.signature_types().collect()
    }

    fn collection(repr: &AbiRepresentation) -> &IndexMap<Uid, Self> {
        &repr.functions
    }
}

impl sealed::Sealed for GlobalVarDecl {
    fn collection_mut(repr: &mut AbiRepresentation) -> &mut IndexMap<Uid, Self> {
        &mut repr.global_vars
    }
}

impl AbiEntity for GlobalVarDecl {
    const CATEGORY: Category = Category::GlobalVars;

    fn uid(&self) -> &Uid {
        &self.uid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn linkage(&self) -> Option<Linkage> {
        Some(self.linkage)
    }

    fn type_references(&self) -> Vec<&TypeReference> {
        vec![&self.type_ref]
    }

    fn collection(repr: &AbiRepresentation) -> &IndexMap<Uid, Self> {
        &repr.global_vars
    }
}

/// A validated, immutable ABI snapshot.
///
/// Equality is structural and independent of insertion order. Instances are
/// only obtained through [`AbiRepresentationBuilder::build`],
/// [`merge_units`](super::merge_units) or by loading a dump, all of which
/// enforce the reference and layout invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiRepresentation {
    format_version: u32,
    records: IndexMap<Uid, RecordType>,
    enums: IndexMap<Uid, EnumType>,
    functions: IndexMap<Uid, FunctionDecl>,
    global_vars: IndexMap<Uid, GlobalVarDecl>,
    content_hash: u64,
}

impl Default for AbiRepresentation {
    fn default() -> Self {
        Self::empty()
    }
}

impl AbiRepresentation {
    /// A snapshot with no entities, used as the "no prior ABI" baseline.
    #[must_use]
    pub fn empty() -> Self {
        let mut repr = Self::unvalidated();
        repr.content_hash = repr.calculate_content_hash();
        repr
    }

    fn unvalidated() -> Self {
        Self {
            format_version: CURRENT_FORMAT_VERSION,
            records: IndexMap::new(),
            enums: IndexMap::new(),
            functions: IndexMap::new(),
            global_vars: IndexMap::new(),
            content_hash: 0,
        }
    }

    /// Run invariant checks and seal the snapshot.
    pub(crate) fn seal(mut self) -> Result<Self> {
        validation::validate(&self)?;
        self.content_hash = self.calculate_content_hash();
        Ok(self)
    }

    /// Insert, failing on an existing UID.
    pub(crate) fn insert_unique<T: AbiEntity>(
        &mut self,
        entity: T,
        unit: Option<&str>,
    ) -> Result<()> {
        let map = T::collection_mut(self);
        if map.contains_key(entity.uid()) {
            return Err(ModelErrorKind::DuplicateDeclaration {
                category: T::CATEGORY,
                uid: entity.uid().to_string(),
                unit: unit.map(str::to_string),
            }
            .into());
        }
        map.insert(entity.uid().clone(), entity);
        Ok(())
    }

    /// Insert or overwrite.
    pub(crate) fn replace<T: AbiEntity>(&mut self, entity: T) {
        T::collection_mut(self).insert(entity.uid().clone(), entity);
    }

    #[must_use]
    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    #[must_use]
    pub fn records(&self) -> &IndexMap<Uid, RecordType> {
        &self.records
    }

    #[must_use]
    pub fn enums(&self) -> &IndexMap<Uid, EnumType> {
        &self.enums
    }

    #[must_use]
    pub fn functions(&self) -> &IndexMap<Uid, FunctionDecl> {
        &self.functions
    }

    #[must_use]
    pub fn global_vars(&self) -> &IndexMap<Uid, GlobalVarDecl> {
        &self.global_vars
    }

    pub fn record(&self, uid: &str) -> Option<&RecordType> {
        self.records.get(uid)
    }

    pub fn enumeration(&self, uid: &str) -> Option<&EnumType> {
        self.enums.get(uid)
    }

    pub fn function(&self, uid: &str) -> Option<&FunctionDecl> {
        self.functions.get(uid)
    }

    pub fn global_var(&self, uid: &str) -> Option<&GlobalVarDecl> {
        self.global_vars.get(uid)
    }

    /// True if `uid` names a record, an enum, a function or a built-in type.
    /// A function UID used as a type stands for that function's signature.
    #[must_use]
    pub fn resolves(&self, uid: &str) -> bool {
        self.records.contains_key(uid)
            || self.enums.contains_key(uid)
            || self.functions.contains_key(uid)
            || super::builtins::is_builtin(uid)
    }

    /// Number of entities in one category.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Records => self.records.len(),
            Category::Enums => self.enums.len(),
            Category::Functions => self.functions.len(),
            Category::GlobalVars => self.global_vars.len(),
        }
    }

    /// Total number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.count(*c)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// UIDs of one category, sorted.
    #[must_use]
    pub fn all_uids(&self, category: Category) -> Vec<&Uid> {
        let mut uids: Vec<&Uid> = match category {
            Category::Records => self.records.keys().collect(),
            Category::Enums => self.enums.keys().collect(),
            Category::Functions => self.functions.keys().collect(),
            Category::GlobalVars => self.global_vars.keys().collect(),
        };
        uids.sort();
        uids
    }

    /// Hash of the canonical (UID-sorted) content, for a quick identity check.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        self.content_hash
    }

    fn calculate_content_hash(&self) -> u64 {
        let mut hasher_input = Vec::new();
        hasher_input.extend(self.format_version.to_le_bytes());
        hash_sorted(&mut hasher_input, &self.records);
        hash_sorted(&mut hasher_input, &self.enums);
        hash_sorted(&mut hasher_input, &self.functions);
        hash_sorted(&mut hasher_input, &self.global_vars);
        xxh3_64(&hasher_input)
    }

    /// Summary statistics.
    #[must_use]
    pub fn stats(&self) -> AbiStats {
        AbiStats {
            records: self.records.len(),
            opaque_records: self.records.values().filter(|r| r.is_opaque).count(),
            template_instantiations: self
                .records
                .values()
                .filter(|r| r.template.is_instantiation())
                .count(),
            enums: self.enums.len(),
            enumerators: self.enums.values().map(|e| e.enumerators.len()).sum(),
            functions: self.functions.len(),
            virtual_functions: self.functions.values().filter(|f| f.is_virtual()).count(),
            global_vars: self.global_vars.len(),
        }
    }
}

fn hash_sorted<T: AbiEntity>(out: &mut Vec<u8>, map: &IndexMap<Uid, T>) {
    out.extend(T::CATEGORY.key().as_bytes());
    let mut uids: Vec<&Uid> = map.keys().collect();
    uids.sort();
    for uid in uids {
        if let Some(entity) = map.get(uid) {
            if let Ok(json) = serde_json::to_vec(entity) {
                out.extend(json);
            }
        }
    }
}

/// Entity counts of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AbiStats {
    pub records: usize,
    pub opaque_records: usize,
    pub template_instantiations: usize,
    pub enums: usize,
    pub enumerators: usize,
    pub functions: usize,
    pub virtual_functions: usize,
    pub global_vars: usize,
}

/// Collects entities for one extraction unit and validates them on `build`.
#[derive(Debug, Default)]
pub struct AbiRepresentationBuilder {
    unit: Option<String>,
    repr: Option<AbiRepresentation>,
}

impl AbiRepresentationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder whose duplicate errors name `unit`.
    pub fn for_unit(unit: impl Into<String>) -> Self {
        Self {
            unit: Some(unit.into()),
            repr: None,
        }
    }

    fn add<T: AbiEntity>(&mut self, entity: T) -> Result<&mut Self> {
        let unit = self.unit.clone();
        self.repr
            .get_or_insert_with(AbiRepresentation::unvalidated)
            .insert_unique(entity, unit.as_deref())?;
        Ok(self)
    }

    pub fn add_record(&mut self, record: RecordType) -> Result<&mut Self> {
        self.add(record)
    }

    pub fn add_enum(&mut self, enumeration: EnumType) -> Result<&mut Self> {
        self.add(enumeration)
    }

    pub fn add_function(&mut self, function: FunctionDecl) -> Result<&mut Self> {
        self.add(function)
    }

    pub fn add_global_var(&mut self, global: GlobalVarDecl) -> Result<&mut Self> {
        self.add(global)
    }

    /// Validate references and layouts and produce the snapshot.
    pub fn build(self) -> Result<AbiRepresentation> {
        self.repr
            .unwrap_or_else(AbiRepresentation::unvalidated)
            .seal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordKind;

    fn sample() -> AbiRepresentation {
        let mut builder = AbiRepresentationBuilder::for_unit("a.h");
        builder
            .add_record(
                RecordType::new("S", RecordKind::Struct, 32, 32)
                    .with_field("a", TypeReference::named("int"), 0),
            )
            .unwrap()
            .add_enum(EnumType::new("Color").with("RED", 1))
            .unwrap()
            .add_function(FunctionDecl::new(
                "f",
                TypeReference::named("int"),
                vec![TypeReference::named("S").pointer()],
            ))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_duplicate_uid_rejected() {
        let mut builder = AbiRepresentationBuilder::for_unit("a.h");
        builder.add_enum(EnumType::new("E")).unwrap();
        let err = builder.add_enum(EnumType::new("E")).unwrap_err();
        assert_eq!(
            err.model_kind(),
            Some(&ModelErrorKind::DuplicateDeclaration {
                category: Category::Enums,
                uid: "E".to_string(),
                unit: Some("a.h".to_string()),
            })
        );
    }

    #[test]
    fn test_lookup_and_counts() {
        let repr = sample();
        assert!(repr.record("S").is_some());
        assert!(repr.function("f(S *)").is_some());
        assert_eq!(repr.count(Category::Enums), 1);
        assert_eq!(repr.len(), 3);
        assert!(repr.resolves("unsigned long long"));
        assert!(repr.resolves("f(S *)"));
        assert!(!repr.resolves("T"));
    }

    #[test]
    fn test_content_hash_is_order_independent() {
        let a = sample();

        let mut builder = AbiRepresentationBuilder::new();
        builder
            .add_function(FunctionDecl::new(
                "f",
                TypeReference::named("int"),
                vec![TypeReference::named("S").pointer()],
            ))
            .unwrap()
            .add_enum(EnumType::new("Color").with("RED", 1))
            .unwrap()
            .add_record(
                RecordType::new("S", RecordKind::Struct, 32, 32)
                    .with_field("a", TypeReference::named("int"), 0),
            )
            .unwrap();
        let b = builder.build().unwrap();

        assert_eq!(a.content_hash(), b.content_hash());
        assert_eq!(a, b);
        assert_ne!(a.content_hash(), AbiRepresentation::empty().content_hash());
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.records, 1);
        assert_eq!(stats.enumerators, 1);
        assert_eq!(stats.virtual_functions, 0);
    }

    #[test]
    fn test_visibility() {
        let internal = FunctionDecl::new("g", TypeReference::named("void"), vec![])
            .with_linkage(Linkage::Internal);
        assert!(!internal.is_externally_visible());
        assert!(EnumType::new("E").is_externally_visible());
    }
}
