//! Dump formats and detection.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Magic bytes opening every binary dump.
pub const BINARY_MAGIC: [u8; 4] = *b"ABID";

/// On-disk representation of a dump.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum DumpFormat {
    /// JSON text, sorted by UID
    #[default]
    Json,
    /// YAML text, sorted by UID
    Yaml,
    /// Compact checksummed binary
    Binary,
}

impl DumpFormat {
    /// Detect the format from content: binary magic, a leading `{`, or YAML.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&BINARY_MAGIC) {
            return Self::Binary;
        }
        let first = bytes
            .iter()
            .copied()
            .find(|b| !b.is_ascii_whitespace());
        match first {
            Some(b'{') => Self::Json,
            _ => Self::Yaml,
        }
    }

    /// Format implied by a file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "abidump" | "bin" => Some(Self::Binary),
            _ => None,
        }
    }

    /// Conventional file extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Binary => "abidump",
        }
    }

    #[must_use]
    pub const fn is_text(&self) -> bool {
        !matches!(self, Self::Binary)
    }
}

impl std::fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Binary => "binary",
        })
    }
}
