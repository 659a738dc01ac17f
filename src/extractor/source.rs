//! Pluggable providers of declaration facts.

use super::facts::{TranslationUnitFacts, FACTS_VERSION};
use crate::error::{AbiToolsError, ErrorContext, ExtractErrorKind, Result};
use std::path::{Path, PathBuf};

/// Anything that can supply the declaration graph of one header unit.
///
/// The compiler frontend lives outside this crate; implementors adapt its
/// output. Tests use [`InMemorySource`].
pub trait TypeGraphSource: Send + Sync {
    /// Name of the unit, used in error messages and merge conflicts.
    fn unit_name(&self) -> &str;

    /// Produce the unit's facts.
    fn load(&self) -> Result<TranslationUnitFacts>;
}

/// Facts read from a JSON file emitted by the frontend.
#[derive(Debug, Clone)]
pub struct JsonFactsSource {
    path: PathBuf,
    name: String,
}

impl JsonFactsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TypeGraphSource for JsonFactsSource {
    fn unit_name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<TranslationUnitFacts> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| AbiToolsError::io(&self.path, e))?;
        parse_facts(&content).with_context(|| format!("reading {}", self.name))
    }
}

/// Parse a facts document, checking its schema version before its shape.
pub fn parse_facts(content: &str) -> Result<TranslationUnitFacts> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
        AbiToolsError::extraction(String::new(), ExtractErrorKind::InvalidJson(e.to_string()))
    })?;

    let version = value
        .get("facts_version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| {
            AbiToolsError::extraction(
                String::new(),
                ExtractErrorKind::InvalidJson("missing or non-numeric facts_version".to_string()),
            )
        })?;
    if version != u64::from(FACTS_VERSION) {
        return Err(AbiToolsError::extraction(
            String::new(),
            ExtractErrorKind::UnsupportedFactsVersion {
                found: u32::try_from(version).unwrap_or(u32::MAX),
                supported: FACTS_VERSION,
            },
        ));
    }

    serde_json::from_value(value).map_err(|e| {
        AbiToolsError::extraction(String::new(), ExtractErrorKind::InvalidJson(e.to_string()))
    })
}

/// Facts held in memory, for fixtures and alternate frontends.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    facts: TranslationUnitFacts,
}

impl InMemorySource {
    #[must_use]
    pub fn new(facts: TranslationUnitFacts) -> Self {
        Self { facts }
    }
}

impl From<TranslationUnitFacts> for InMemorySource {
    fn from(facts: TranslationUnitFacts) -> Self {
        Self::new(facts)
    }
}

impl TypeGraphSource for InMemorySource {
    fn unit_name(&self) -> &str {
        &self.facts.unit
    }

    fn load(&self) -> Result<TranslationUnitFacts> {
        Ok(self.facts.clone())
    }
}
