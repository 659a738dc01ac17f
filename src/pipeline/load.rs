//! Dump loading for the comparison pipeline.
//!
//! Applies the missing-reference policy: the core only knows how to read a
//! dump; whether an absent reference is fatal is decided here.

use super::PipelineError;
use crate::dump;
use crate::model::AbiRepresentation;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// A loaded dump together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedDump {
    /// The validated representation
    pub repr: AbiRepresentation,
    /// Path the dump was read from
    pub path: PathBuf,
    /// True when the file was absent and an empty representation stands in
    pub missing: bool,
}

impl LoadedDump {
    /// Consume and return the inner representation
    #[must_use]
    pub fn into_repr(self) -> AbiRepresentation {
        self.repr
    }

    /// Path as shown in report metadata
    #[must_use]
    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// Load a dump with context for error messages
pub fn load_dump_with_context(path: &Path, quiet: bool) -> Result<LoadedDump> {
    if !quiet {
        tracing::info!("Loading dump: {}", path.display());
    }

    let repr = dump::read_dump(path).map_err(|source| PipelineError::LoadFailed {
        path: path.display().to_string(),
        source,
    })?;

    if !quiet {
        let stats = repr.stats();
        tracing::info!(
            "Loaded {} records, {} enums, {} functions, {} global variables",
            stats.records,
            stats.enums,
            stats.functions,
            stats.global_vars
        );
    }

    Ok(LoadedDump {
        repr,
        path: path.to_path_buf(),
        missing: false,
    })
}

/// Load the reference (old) dump.
///
/// With `allow_missing` set, a reference file that does not exist yields an
/// empty representation. Any other failure, including a malformed file, is
/// still an error.
pub fn load_reference(path: &Path, allow_missing: bool, quiet: bool) -> Result<LoadedDump> {
    if allow_missing && !path.exists() {
        tracing::warn!(
            "Reference dump {} not found; comparing against an empty ABI",
            path.display()
        );
        return Ok(LoadedDump {
            repr: AbiRepresentation::empty(),
            path: path.to_path_buf(),
            missing: true,
        });
    }
    load_dump_with_context(path, quiet)
}
