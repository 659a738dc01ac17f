//! Configuration module for abi-tools.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```
//! use abi_tools::config::{AppConfig, ConfigPreset, Validatable};
//! use abi_tools::diff::FunctionMatching;
//!
//! // Use a preset
//! let config = AppConfig::from_preset(ConfigPreset::Strict);
//! assert!(config.behavior.fail_on_extension);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .function_matching(FunctionMatching::ByName)
//!     .ignore("^detail::")
//!     .build();
//! assert!(config.is_valid());
//! ```
//!
//! # Configuration File
//!
//! Place a `.abi-tools.yaml` file in your project root or `~/.config/abi-tools/`:
//!
//! ```yaml
//! diff:
//!   ignore_patterns: ['^detail::']
//! behavior:
//!   fail_on_extension: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

// Re-export main types
pub use defaults::ConfigPreset;
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, DiffConfig, DiffPaths, DumpCommandConfig,
    DumpConfig, EngineConfig, FilterConfig, MergeConfig, OutputConfig,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError,
};

use crate::error::{AbiToolsError, Result};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.abi-tools.yaml` config files. It can be used by editors for
/// validation and autocompletion.
pub fn generate_json_schema() -> Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| AbiToolsError::config(format!("serializing config schema: {e}")))
}

/// Fold validation errors into a single configuration error.
pub fn ensure_valid(config: &dyn Validatable) -> Result<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    let joined = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(AbiToolsError::config(joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lists_sections() {
        let schema = generate_json_schema().unwrap();
        for section in ["diff", "output", "filtering", "behavior", "dump"] {
            assert!(schema.contains(&format!("\"{section}\"")), "{section}");
        }
    }

    #[test]
    fn test_ensure_valid_joins_errors() {
        let config = AppConfig::builder()
            .advice_only(true)
            .fail_on_extension(true)
            .ignore("(")
            .build();
        let err = ensure_valid(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("diff.ignore_patterns[0]"));
        assert!(message.contains("behavior.fail_on_extension"));
    }
}
