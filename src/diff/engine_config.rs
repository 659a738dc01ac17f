//! Configuration types for the diff engine.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How functions whose UID changed are treated.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum FunctionMatching {
    /// Match by full signature; a signature change is a removal plus an addition
    #[default]
    ByUid,
    /// Additionally pair leftovers that share a unique qualified name
    ByName,
}

impl std::fmt::Display for FunctionMatching {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::ByUid => "by-uid",
            Self::ByName => "by-name",
        })
    }
}
