//! Configuration presets for abi-tools.
//!
//! Provides named presets for common use cases.

use super::types::{AppConfig, BehaviorConfig, EngineConfig, FilterConfig, OutputConfig};
use crate::diff::{FunctionMatching, Impact};
use crate::reports::ReportFormat;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default settings: fail only on breaking changes
    Default,
    /// Strict: also fail on extensions, pair renamed signatures by name
    Strict,
    /// Advisory: report everything, never fail on the verdict
    Advisory,
    /// CI: SARIF output without colors, tolerate a missing reference
    Ci,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Advisory => "advisory",
            Self::Ci => "ci",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "release" => Some(Self::Strict),
            "advisory" | "advice" => Some(Self::Advisory),
            "ci" | "ci-cd" | "pipeline" => Some(Self::Ci),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Fail on breaking changes, summary output",
            Self::Strict => "Fail on any ABI growth and pair changed signatures by name",
            Self::Advisory => "Report every change including informational ones, never fail",
            Self::Ci => "SARIF output for code scanning, first run without a reference passes",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Advisory, Self::Ci]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::Advisory => Self::advisory_preset(),
            ConfigPreset::Ci => Self::ci_preset(),
        }
    }

    /// Strict preset for release gating.
    ///
    /// - Extensions fail the run with exit code 2
    /// - Functions with a changed signature are paired by name
    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            diff: EngineConfig {
                function_matching: FunctionMatching::ByName,
                ..EngineConfig::default()
            },
            behavior: BehaviorConfig {
                fail_on_extension: true,
                ..BehaviorConfig::default()
            },
            ..Self::default()
        }
    }

    /// Advisory preset: the report is the product, not the exit code.
    #[must_use]
    pub fn advisory_preset() -> Self {
        Self {
            output: OutputConfig {
                format: ReportFormat::Markdown,
                ..OutputConfig::default()
            },
            filtering: FilterConfig {
                min_impact: Impact::Informational,
                max_items: None,
            },
            behavior: BehaviorConfig {
                advice_only: true,
                ..BehaviorConfig::default()
            },
            ..Self::default()
        }
    }

    /// CI pipeline preset.
    ///
    /// - SARIF output for code scanning upload
    /// - No colors, quiet logging
    /// - The first run, before any reference dump exists, passes
    #[must_use]
    pub fn ci_preset() -> Self {
        Self {
            output: OutputConfig {
                format: ReportFormat::Sarif,
                no_color: true,
                ..OutputConfig::default()
            },
            behavior: BehaviorConfig {
                allow_missing_reference: true,
                quiet: true,
                ..BehaviorConfig::default()
            },
            ..Self::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Validatable;

    #[test]
    fn test_preset_from_name() {
        assert_eq!(ConfigPreset::from_name("default"), Some(ConfigPreset::Default));
        assert_eq!(ConfigPreset::from_name("STRICT"), Some(ConfigPreset::Strict));
        assert_eq!(ConfigPreset::from_name("advice"), Some(ConfigPreset::Advisory));
        assert_eq!(ConfigPreset::from_name("pipeline"), Some(ConfigPreset::Ci));
        assert_eq!(ConfigPreset::from_name("invalid"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
        }
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in ConfigPreset::all() {
            let config = AppConfig::from_preset(*preset);
            assert!(config.is_valid(), "preset {preset} is invalid");
        }
    }

    #[test]
    fn test_strict_preset() {
        let config = AppConfig::strict_preset();
        assert!(config.behavior.fail_on_extension);
        assert_eq!(config.diff.function_matching, FunctionMatching::ByName);
    }

    #[test]
    fn test_ci_preset() {
        let config = AppConfig::ci_preset();
        assert_eq!(config.output.format, ReportFormat::Sarif);
        assert!(config.output.no_color);
        assert!(config.behavior.allow_missing_reference);
    }

    #[test]
    fn test_advisory_preset() {
        let config = AppConfig::advisory_preset();
        assert!(config.behavior.advice_only);
        assert!(!config.behavior.fail_on_extension);
    }
}
