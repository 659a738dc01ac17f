//! Wire form of a dump.

use crate::error::{AbiToolsError, Result};
use crate::model::{
    AbiEntity, AbiRepresentation, AbiRepresentationBuilder, EnumType, FunctionDecl, GlobalVarDecl,
    RecordType, Uid,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Tool that wrote a dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    pub tool: String,
    pub version: String,
}

impl Default for Producer {
    fn default() -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Serialized dump. Every list is sorted by UID so textual dumps diff
/// cleanly under version control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpDocument {
    pub format_version: u32,
    #[serde(default)]
    pub producer: Producer,
    #[serde(default)]
    pub records: Vec<RecordType>,
    #[serde(default)]
    pub enums: Vec<EnumType>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    #[serde(default)]
    pub global_vars: Vec<GlobalVarDecl>,
}

fn sorted<T: AbiEntity>(map: &IndexMap<Uid, T>) -> Vec<T> {
    let mut items: Vec<T> = map.values().cloned().collect();
    items.sort_by(|a, b| a.uid().cmp(b.uid()));
    items
}

impl DumpDocument {
    pub fn from_representation(repr: &AbiRepresentation) -> Self {
        Self {
            format_version: repr.format_version(),
            producer: Producer::default(),
            records: sorted(repr.records()),
            enums: sorted(repr.enums()),
            functions: sorted(repr.functions()),
            global_vars: sorted(repr.global_vars()),
        }
    }

    /// Rebuild the model, enforcing every invariant. Violations surface as
    /// malformed-dump errors.
    pub fn into_representation(self) -> Result<AbiRepresentation> {
        if !super::SUPPORTED_DUMP_VERSIONS.contains(&self.format_version) {
            return Err(AbiToolsError::unsupported_version(
                self.format_version,
                super::SUPPORTED_DUMP_VERSIONS,
            ));
        }

        self.build().map_err(|e| match e {
            AbiToolsError::Model { source, .. } => {
                AbiToolsError::malformed("validating dump contents", source.to_string())
            }
            other => other,
        })
    }

    fn build(self) -> Result<AbiRepresentation> {
        let mut builder = AbiRepresentationBuilder::new();
        for record in self.records {
            builder.add_record(record)?;
        }
        for enumeration in self.enums {
            builder.add_enum(enumeration)?;
        }
        for function in self.functions {
            builder.add_function(function)?;
        }
        for global in self.global_vars {
            builder.add_global_var(global)?;
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RecordKind, TypeReference, CURRENT_FORMAT_VERSION};

    #[test]
    fn test_document_sorted_by_uid() {
        let mut builder = AbiRepresentationBuilder::new();
        builder
            .add_record(RecordType::new("Zeta", RecordKind::Struct, 8, 8))
            .unwrap()
            .add_record(RecordType::new("Alpha", RecordKind::Struct, 8, 8))
            .unwrap();
        let doc = DumpDocument::from_representation(&builder.build().unwrap());
        let names: Vec<&str> = doc.records.iter().map(|r| r.uid.as_str()).collect();
        assert_eq!(names, ["Alpha", "Zeta"]);
        assert_eq!(doc.producer.tool, "abi-tools");
    }

    #[test]
    fn test_invariant_violation_is_malformed() {
        let doc = DumpDocument {
            format_version: CURRENT_FORMAT_VERSION,
            producer: Producer::default(),
            records: vec![RecordType::new("S", RecordKind::Struct, 32, 32)
                .with_field("x", TypeReference::named("Nope"), 0)],
            enums: Vec::new(),
            functions: Vec::new(),
            global_vars: Vec::new(),
        };
        let err = doc.into_representation().unwrap_err();
        assert!(matches!(
            err.dump_kind(),
            Some(crate::error::DumpErrorKind::MalformedDump(msg)) if msg.contains("Nope")
        ));
    }
}
