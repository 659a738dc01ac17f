//! Versioned dump serialization.
//!
//! A dump is the persisted form of an [`AbiRepresentation`]. The text forms
//! (JSON, YAML) sort every category by UID so they diff cleanly; the binary
//! form is compact and checksummed. All forms carry a `format_version`, and a
//! reader rejects versions it does not know instead of guessing.
//!
//! Loading always re-runs the model's invariant checks, so a dump that
//! deserializes is as trustworthy as a freshly extracted one.

mod binary;
mod document;
mod format;

pub use document::{DumpDocument, Producer};
pub use format::{DumpFormat, BINARY_MAGIC};

use crate::error::{AbiToolsError, DumpErrorKind, ErrorContext, Result};
use crate::model::AbiRepresentation;
use std::path::Path;

/// Dump format versions this build can read.
pub const SUPPORTED_DUMP_VERSIONS: &[u32] = &[1];

/// Serialize with pretty-printed JSON.
pub fn serialize(repr: &AbiRepresentation, format: DumpFormat) -> Result<Vec<u8>> {
    serialize_with(repr, format, true)
}

/// Serialize; `pretty` only affects JSON.
pub fn serialize_with(repr: &AbiRepresentation, format: DumpFormat, pretty: bool) -> Result<Vec<u8>> {
    let doc = DumpDocument::from_representation(repr);
    match format {
        DumpFormat::Json => {
            let result = if pretty {
                serde_json::to_vec_pretty(&doc)
            } else {
                serde_json::to_vec(&doc)
            };
            result.map_err(|e| AbiToolsError::malformed("encoding JSON dump", e.to_string()))
        }
        DumpFormat::Yaml => serde_yaml::to_string(&doc)
            .map(String::into_bytes)
            .map_err(|e| AbiToolsError::malformed("encoding YAML dump", e.to_string())),
        DumpFormat::Binary => binary::encode(&doc),
    }
}

/// Deserialize, detecting the format from content.
pub fn deserialize(bytes: &[u8]) -> Result<AbiRepresentation> {
    deserialize_as(bytes, DumpFormat::detect(bytes))
}

/// Deserialize a dump known to be in `format`.
pub fn deserialize_as(bytes: &[u8], format: DumpFormat) -> Result<AbiRepresentation> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(AbiToolsError::malformed("reading dump", "empty input"));
    }
    let doc = match format {
        DumpFormat::Json => decode_json(bytes)?,
        DumpFormat::Yaml => decode_yaml(bytes)?,
        DumpFormat::Binary => binary::decode(bytes)?,
    };
    let repr = doc.into_representation()?;
    tracing::debug!(
        format = %format,
        records = repr.records().len(),
        enums = repr.enums().len(),
        functions = repr.functions().len(),
        global_vars = repr.global_vars().len(),
        "loaded dump"
    );
    Ok(repr)
}

fn check_version(found: Option<u64>, ctx: &str) -> Result<()> {
    let found = found.ok_or_else(|| {
        AbiToolsError::malformed(ctx, "missing or non-numeric format_version")
    })?;
    let found = u32::try_from(found).unwrap_or(u32::MAX);
    if SUPPORTED_DUMP_VERSIONS.contains(&found) {
        Ok(())
    } else {
        Err(AbiToolsError::unsupported_version(found, SUPPORTED_DUMP_VERSIONS))
    }
}

fn decode_json(bytes: &[u8]) -> Result<DumpDocument> {
    const CTX: &str = "decoding JSON dump";
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| AbiToolsError::malformed(CTX, e.to_string()))?;
    check_version(
        value.get("format_version").and_then(serde_json::Value::as_u64),
        CTX,
    )?;
    serde_json::from_value(value).map_err(|e| AbiToolsError::malformed(CTX, e.to_string()))
}

fn decode_yaml(bytes: &[u8]) -> Result<DumpDocument> {
    const CTX: &str = "decoding YAML dump";
    let value: serde_yaml::Value =
        serde_yaml::from_slice(bytes).map_err(|e| AbiToolsError::malformed(CTX, e.to_string()))?;
    check_version(
        value.get("format_version").and_then(serde_yaml::Value::as_u64),
        CTX,
    )?;
    serde_yaml::from_value(value).map_err(|e| AbiToolsError::malformed(CTX, e.to_string()))
}

/// Read a dump file of any format.
pub fn read_dump(path: &Path) -> Result<AbiRepresentation> {
    let bytes = std::fs::read(path).map_err(|e| AbiToolsError::io(path, e))?;
    deserialize(&bytes).with_context(|| format!("reading {}", path.display()))
}

/// Write a dump file.
pub fn write_dump(path: &Path, repr: &AbiRepresentation, format: DumpFormat) -> Result<()> {
    let bytes = serialize(repr, format)?;
    std::fs::write(path, bytes).map_err(|e| AbiToolsError::io(path, e))
}

/// Format to use when writing `path`: the extension decides, else `fallback`.
#[must_use]
pub fn format_for_path(path: &Path, fallback: DumpFormat) -> DumpFormat {
    DumpFormat::from_path(path).unwrap_or(fallback)
}

/// True for errors that mean the dump itself is unusable (as opposed to IO).
#[must_use]
pub fn is_dump_error(err: &AbiToolsError) -> bool {
    matches!(
        err.dump_kind(),
        Some(DumpErrorKind::MalformedDump(_) | DumpErrorKind::UnsupportedDumpVersion { .. })
    )
}
