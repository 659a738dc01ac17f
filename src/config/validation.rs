//! Configuration validation for abi-tools.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{
    AppConfig, BehaviorConfig, DiffConfig, DumpCommandConfig, DumpConfig, EngineConfig,
    FilterConfig, MergeConfig, OutputConfig,
};
use regex::Regex;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.diff.validate());
        errors.extend(self.output.validate());
        errors.extend(self.filtering.validate());
        errors.extend(self.behavior.validate());
        errors.extend(self.dump.validate());
        errors
    }
}

impl Validatable for EngineConfig {
    fn validate(&self) -> Vec<ConfigError> {
        self.ignore_patterns
            .iter()
            .enumerate()
            .filter_map(|(i, pattern)| {
                Regex::new(pattern).err().map(|e| {
                    ConfigError::new(
                        format!("diff.ignore_patterns[{i}]"),
                        format!("Invalid regular expression '{pattern}': {e}"),
                    )
                })
            })
            .collect()
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(file_path) = &self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            errors.push(ConfigError::new("output.title", "Title must not be blank"));
        }

        errors
    }
}

impl Validatable for FilterConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_items == Some(0) {
            errors.push(ConfigError::new(
                "filtering.max_items",
                "Max items must be at least 1 (omit it to show everything)",
            ));
        }
        errors
    }
}

impl Validatable for BehaviorConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.advice_only && self.fail_on_extension {
            errors.push(ConfigError::new(
                "behavior.fail_on_extension",
                "Cannot fail on extensions in advice-only mode",
            ));
        }
        errors
    }
}

impl Validatable for DumpConfig {
    fn validate(&self) -> Vec<ConfigError> {
        Vec::new()
    }
}

impl Validatable for DiffConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        // A missing reference is only an error when the policy forbids it
        if !self.behavior.allow_missing_reference && !self.paths.old.exists() {
            errors.push(ConfigError::new(
                "paths.old",
                format!("File not found: {}", self.paths.old.display()),
            ));
        }
        if !self.paths.new.exists() {
            errors.push(ConfigError::new(
                "paths.new",
                format!("File not found: {}", self.paths.new.display()),
            ));
        }

        errors.extend(self.engine.validate());
        errors.extend(self.output.validate());
        errors.extend(self.filtering.validate());
        errors.extend(self.behavior.validate());
        errors
    }
}

impl Validatable for DumpCommandConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.inputs.is_empty() {
            errors.push(ConfigError::new(
                "inputs",
                "At least one facts file is required",
            ));
        }
        for (i, path) in self.inputs.iter().enumerate() {
            if !path.exists() {
                errors.push(ConfigError::new(
                    format!("inputs[{i}]"),
                    format!("Facts file not found: {}", path.display()),
                ));
            }
        }

        errors.extend(self.dump.validate());
        errors
    }
}

impl Validatable for MergeConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.inputs.len() < 2 {
            errors.push(ConfigError::new(
                "inputs",
                "Merging requires at least 2 dumps",
            ));
        }
        for (i, path) in self.inputs.iter().enumerate() {
            if !path.exists() {
                errors.push(ConfigError::new(
                    format!("inputs[{i}]"),
                    format!("Dump file not found: {}", path.display()),
                ));
            }
        }

        errors.extend(self.dump.validate());
        errors
    }
}
