//! Pipeline orchestration for ABI operations.
//!
//! This module provides shared orchestration logic for the
//! extract → dump and load → diff → report workflows, keeping CLI command
//! handlers thin.

mod diff_stage;
mod extract_stage;
mod load;
mod output;
mod report_stage;

pub use diff_stage::{build_engine, compute_diff};
pub use extract_stage::{extract_dump, merge_dumps, write_dump_output};
pub use load::{load_dump_with_context, load_reference, LoadedDump};
pub use output::{should_use_color, write_output, OutputTarget};
pub use report_stage::{exit_code, output_report, ComparisonOutcome};

use crate::error::AbiToolsError;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to read or decode a dump file
    #[error("Load failed for {path}: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: AbiToolsError,
    },

    /// Extraction or merging of header units failed
    #[error("Extraction failed: {source}")]
    ExtractFailed {
        #[source]
        source: AbiToolsError,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Compatible, or advice-only mode
    pub const SUCCESS: i32 = 0;
    /// At least one breaking change
    pub const INCOMPATIBLE: i32 = 1;
    /// Extensions found and `--fail-on-extension` set
    pub const EXTENDED: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::INCOMPATIBLE, 1);
        assert_eq!(exit_codes::EXTENDED, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_load_failed_names_path() {
        let err = PipelineError::LoadFailed {
            path: "old.json".to_string(),
            source: AbiToolsError::malformed("decoding JSON dump", "eof"),
        };
        assert!(err.to_string().starts_with("Load failed for old.json"));
    }
}
