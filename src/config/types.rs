//! Configuration types for abi-tools operations.
//!
//! Provides structured configuration for dump, diff and merge operations.

use crate::diff::{FunctionMatching, Impact};
use crate::dump::DumpFormat;
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// This is the top-level configuration struct that aggregates all configuration
/// options. It can be constructed from CLI arguments, config files, or both
/// (with CLI overriding file settings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Diff engine configuration (matching, ignore patterns)
    pub diff: EngineConfig,
    /// Output configuration (format, file, colors)
    pub output: OutputConfig,
    /// Report filtering options
    pub filtering: FilterConfig,
    /// Behavior flags (exit code policy)
    pub behavior: BehaviorConfig,
    /// Dump writing configuration
    pub dump: DumpConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the function matching mode.
    pub const fn function_matching(mut self, matching: FunctionMatching) -> Self {
        self.config.diff.function_matching = matching;
        self
    }

    /// Add a UID ignore pattern.
    pub fn ignore(mut self, pattern: impl Into<String>) -> Self {
        self.config.diff.ignore_patterns.push(pattern.into());
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Disable colored output.
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.output.no_color = no_color;
        self
    }

    /// Set the minimum impact shown in reports.
    pub const fn min_impact(mut self, impact: Impact) -> Self {
        self.config.filtering.min_impact = impact;
        self
    }

    /// Exit non-zero when only extensions were found.
    pub const fn fail_on_extension(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_extension = fail;
        self
    }

    /// Report only; never fail on the verdict.
    pub const fn advice_only(mut self, advice: bool) -> Self {
        self.config.behavior.advice_only = advice;
        self
    }

    /// Treat a missing reference dump as an empty ABI.
    pub const fn allow_missing_reference(mut self, allow: bool) -> Self {
        self.config.behavior.allow_missing_reference = allow;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Set the dump format.
    pub const fn dump_format(mut self, format: DumpFormat) -> Self {
        self.config.dump.format = format;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command-specific Configuration Types
// ============================================================================

/// Configuration for diff operations
#[derive(Debug, Clone)]
pub struct DiffConfig {
    /// Paths to compare
    pub paths: DiffPaths,
    /// Engine configuration
    pub engine: EngineConfig,
    /// Output configuration
    pub output: OutputConfig,
    /// Filtering options
    pub filtering: FilterConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl DiffConfig {
    /// Combine comparison paths with the sections of an application config.
    #[must_use]
    pub fn from_app(paths: DiffPaths, app: &AppConfig) -> Self {
        Self {
            paths,
            engine: app.diff.clone(),
            output: app.output.clone(),
            filtering: app.filtering.clone(),
            behavior: app.behavior.clone(),
        }
    }
}

/// Paths for diff operation
#[derive(Debug, Clone)]
pub struct DiffPaths {
    /// Path to the reference (old) dump
    pub old: PathBuf,
    /// Path to the candidate (new) dump
    pub new: PathBuf,
}

/// Configuration for dump operations (facts to dump file)
#[derive(Debug, Clone)]
pub struct DumpCommandConfig {
    /// Facts files, one per header unit
    pub inputs: Vec<PathBuf>,
    /// Dump file to write (None for stdout)
    pub output: Option<PathBuf>,
    /// Dump writing options
    pub dump: DumpConfig,
}

/// Configuration for merging existing dumps
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Dumps to merge, in order
    pub inputs: Vec<PathBuf>,
    /// Dump file to write (None for stdout)
    pub output: Option<PathBuf>,
    /// Dump writing options
    pub dump: DumpConfig,
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Diff engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// How functions whose signature changed are matched
    pub function_matching: FunctionMatching,
    /// Diff categories concurrently
    pub parallel: bool,
    /// Regular expressions on UIDs whose entries are dropped
    pub ignore_patterns: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            function_matching: FunctionMatching::default(),
            parallel: true,
            ignore_patterns: Vec::new(),
        }
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Disable colored output
    pub no_color: bool,
    /// Report title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Report filtering configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilterConfig {
    /// Hide entries below this impact (the verdict still counts them)
    pub min_impact: Impact,
    /// Maximum entries shown per category and impact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 2 when extensions but no breaking changes are found
    pub fail_on_extension: bool,
    /// Always exit 0 for verdicts; only errors fail the run
    pub advice_only: bool,
    /// A missing reference dump means "no prior ABI" instead of an error
    pub allow_missing_reference: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

/// Dump writing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DumpConfig {
    /// Format used when the output path has no known extension
    pub format: DumpFormat,
    /// Pretty-print JSON dumps
    pub pretty: bool,
    /// Extract header units in parallel
    pub parallel: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            format: DumpFormat::Json,
            pretty: true,
            parallel: true,
        }
    }
}
