//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::{AppConfig, DumpConfig, EngineConfig};
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".abi-tools.yaml",
    ".abi-tools.yml",
    "abi-tools.yaml",
    "abi-tools.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/abi-tools/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        // An explicit path is returned even when missing so loading reports it
        return Some(path.to_path_buf());
    }

    let cwd = std::env::current_dir().ok();
    if let Some(path) = cwd.as_deref().and_then(find_config_in_dir) {
        return Some(path);
    }

    if let Some(path) = cwd
        .as_deref()
        .and_then(find_git_root)
        .and_then(|root| find_config_in_dir(&root))
    {
        return Some(path);
    }

    if let Some(path) =
        dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("abi-tools")))
    {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Find the git repository root by walking up from `start`.
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// File not found
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// IO error reading file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// A value in `other` only wins when it differs from the default, so
    /// layering CLI args over file config keeps file settings the user did
    /// not override on the command line.
    pub fn merge(&mut self, other: &Self) {
        let engine_default = EngineConfig::default();
        if other.diff.function_matching != engine_default.function_matching {
            self.diff.function_matching = other.diff.function_matching;
        }
        if other.diff.parallel != engine_default.parallel {
            self.diff.parallel = other.diff.parallel;
        }
        for pattern in &other.diff.ignore_patterns {
            if !self.diff.ignore_patterns.contains(pattern) {
                self.diff.ignore_patterns.push(pattern.clone());
            }
        }

        // Output config - only override if explicitly set
        if other.output.format != crate::reports::ReportFormat::default() {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
        if other.output.no_color {
            self.output.no_color = true;
        }
        if other.output.title.is_some() {
            self.output.title.clone_from(&other.output.title);
        }

        // Filtering config
        if other.filtering.min_impact != crate::diff::Impact::default() {
            self.filtering.min_impact = other.filtering.min_impact;
        }
        if other.filtering.max_items.is_some() {
            self.filtering.max_items = other.filtering.max_items;
        }

        // Behavior config (booleans - if set to true, override)
        if other.behavior.fail_on_extension {
            self.behavior.fail_on_extension = true;
        }
        if other.behavior.advice_only {
            self.behavior.advice_only = true;
        }
        if other.behavior.allow_missing_reference {
            self.behavior.allow_missing_reference = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }

        // Dump config
        let dump_default = DumpConfig::default();
        if other.dump.format != dump_default.format {
            self.dump.format = other.dump.format;
        }
        if other.dump.pretty != dump_default.pretty {
            self.dump.pretty = other.dump.pretty;
        }
        if other.dump.parallel != dump_default.parallel {
            self.dump.parallel = other.dump.parallel;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# abi-tools configuration
# Place this file at .abi-tools.yaml in your project root or ~/.config/abi-tools/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# abi-tools Configuration File
# =============================
#
# This file configures abi-tools behavior. Place it at:
#   - .abi-tools.yaml in your project root
#   - ~/.config/abi-tools/abi-tools.yaml for global config
#
# CLI arguments always override file settings.

# Diff engine configuration
diff:
  # Function matching: by-uid, by-name
  # by-name pairs a removed and an added function sharing a unique name
  function_matching: by-uid
  # Compare categories concurrently
  parallel: true
  # Regular expressions on UIDs; matching entries are dropped
  ignore_patterns: []
  # ignore_patterns:
  #   - '^detail::'

# Output configuration
output:
  # Format: summary, json, sarif, markdown, table, csv
  format: summary
  # Output file path (omit for stdout)
  # file: abi-report.json
  # Disable colored output
  no_color: false
  # title: libfoo ABI report

# Filtering options (the verdict always counts every change)
filtering:
  # Minimum impact shown: informational, non_breaking, breaking
  min_impact: informational
  # Maximum entries shown per category and impact
  # max_items: 50

# Behavior flags
behavior:
  # Exit with code 2 when the ABI only grew
  fail_on_extension: false
  # Report only; exit 0 regardless of the verdict
  advice_only: false
  # Treat a missing reference dump as an empty ABI
  allow_missing_reference: false
  # Suppress non-essential output
  quiet: false

# Dump writing
dump:
  # Format when the output extension is not recognized: json, yaml, binary
  format: json
  # Pretty-print JSON dumps
  pretty: true
  # Extract header units in parallel
  parallel: true
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::BehaviorConfig;
    use crate::diff::{FunctionMatching, Impact};
    use crate::reports::ReportFormat;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".abi-tools.yaml");
        std::fs::write(&config_path, "behavior:\n  quiet: true\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_find_git_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        let nested = tmp.path().join("src").join("include");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_git_root(&nested), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");

        let yaml = r"
diff:
  function_matching: by-name
  ignore_patterns: ['^detail::']
output:
  format: sarif
filtering:
  min_impact: non_breaking
behavior:
  fail_on_extension: true
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.diff.function_matching, FunctionMatching::ByName);
        assert_eq!(config.diff.ignore_patterns, vec!["^detail::".to_string()]);
        assert_eq!(config.output.format, ReportFormat::Sarif);
        assert_eq!(config.filtering.min_impact, Impact::NonBreaking);
        assert!(config.behavior.fail_on_extension);
        assert!(config.diff.parallel);
    }

    #[test]
    fn test_load_empty_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("empty.yaml");
        std::fs::write(&config_path, "\n").unwrap();
        assert_eq!(load_config_file(&config_path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "output:\n  format: hologram\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig {
            diff: EngineConfig {
                ignore_patterns: vec!["^a".to_string()],
                ..EngineConfig::default()
            },
            ..AppConfig::default()
        };
        base.output.title = Some("from file".to_string());

        let override_config = AppConfig {
            diff: EngineConfig {
                function_matching: FunctionMatching::ByName,
                parallel: false,
                ignore_patterns: vec!["^a".to_string(), "^b".to_string()],
            },
            behavior: BehaviorConfig {
                advice_only: true,
                ..Default::default()
            },
            ..AppConfig::default()
        };

        base.merge(&override_config);

        assert_eq!(base.diff.function_matching, FunctionMatching::ByName);
        assert!(!base.diff.parallel);
        assert_eq!(base.diff.ignore_patterns, vec!["^a".to_string(), "^b".to_string()]);
        assert!(base.behavior.advice_only);
        assert_eq!(base.output.title.as_deref(), Some("from file"));
    }

    #[test]
    fn test_generated_examples_parse() {
        let example = generate_example_config();
        assert!(example.contains("function_matching"));
        let body: String = example
            .lines()
            .filter(|l| !l.starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n");
        let parsed: AppConfig = serde_yaml::from_str(&body).unwrap();
        assert_eq!(parsed, AppConfig::default());

        let full: AppConfig = serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(full, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        std::fs::write(&config_path, "behavior:\n  quiet: true\n").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }

    #[test]
    fn test_missing_explicit_path_falls_back_to_default() {
        let (config, loaded) = load_or_default(Some(Path::new("/nonexistent/abi.yaml")));
        assert_eq!(config, AppConfig::default());
        assert!(loaded.is_none());
    }
}
