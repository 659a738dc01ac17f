//! SARIF 2.1.0 report generator for CI/CD integration.

use super::{CompatibilityReport, ReportConfig, ReportFormat, ReportGenerator};
use crate::diff::{ChangeKind, DiffEntry, Impact};
use crate::error::{AbiToolsError, ReportErrorKind, Result};
use crate::model::Category;
use serde::Serialize;

const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0.json";

/// SARIF report generator
pub struct SarifReporter {
    /// Include informational results
    include_info: bool,
}

impl SarifReporter {
    /// Create a new SARIF reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { include_info: true }
    }

    /// Set whether to include informational results
    #[must_use]
    pub const fn include_info(mut self, include: bool) -> Self {
        self.include_info = include;
        self
    }
}

impl Default for SarifReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SarifReporter {
    fn generate(&self, report: &CompatibilityReport, config: &ReportConfig) -> Result<String> {
        let artifact = config.metadata.new_dump_path.clone();
        let results: Vec<SarifResult> = report
            .entries()
            .filter(|e| self.include_info || e.impact != Impact::Informational)
            .map(|e| to_result(e, artifact.as_deref()))
            .collect();

        let sarif = SarifReport {
            schema: SARIF_SCHEMA.to_string(),
            version: "2.1.0".to_string(),
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: env!("CARGO_PKG_NAME").to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                        information_uri: option_env!("CARGO_PKG_REPOSITORY")
                            .filter(|uri| !uri.is_empty())
                            .map(str::to_string),
                        rules: get_sarif_rules(),
                    },
                },
                results,
            }],
        };

        serde_json::to_string_pretty(&sarif).map_err(|e| {
            AbiToolsError::report(
                "rendering SARIF report",
                ReportErrorKind::JsonSerializationError(e.to_string()),
            )
        })
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Sarif
    }
}

const fn impact_to_level(impact: Impact) -> SarifLevel {
    match impact {
        Impact::Breaking => SarifLevel::Error,
        Impact::NonBreaking => SarifLevel::Warning,
        Impact::Informational => SarifLevel::Note,
    }
}

const fn rule_id(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Removed => "ABI-TOOLS-001",
        ChangeKind::Added => "ABI-TOOLS-002",
        ChangeKind::Changed => "ABI-TOOLS-003",
    }
}

const fn logical_kind(category: Category) -> &'static str {
    match category {
        Category::Records | Category::Enums => "type",
        Category::Functions => "function",
        Category::GlobalVars => "variable",
    }
}

fn to_result(entry: &DiffEntry, artifact: Option<&str>) -> SarifResult {
    SarifResult {
        rule_id: rule_id(entry.kind).to_string(),
        level: impact_to_level(entry.impact),
        message: SarifMessage {
            text: format!("{}: {}", entry.location(), entry.detail),
        },
        locations: vec![SarifLocation {
            physical_location: artifact.map(|uri| SarifPhysicalLocation {
                artifact_location: SarifArtifactLocation {
                    uri: uri.to_string(),
                },
            }),
            logical_locations: vec![SarifLogicalLocation {
                fully_qualified_name: entry.location(),
                kind: logical_kind(entry.category).to_string(),
            }],
        }],
    }
}

fn get_sarif_rules() -> Vec<SarifRule> {
    vec![
        SarifRule {
            id: "ABI-TOOLS-001".to_string(),
            name: "AbiEntityRemoved".to_string(),
            short_description: SarifMessage {
                text: "An ABI entity or member present in the reference is gone".to_string(),
            },
            default_configuration: SarifConfiguration {
                level: SarifLevel::Error,
            },
        },
        SarifRule {
            id: "ABI-TOOLS-002".to_string(),
            name: "AbiEntityAdded".to_string(),
            short_description: SarifMessage {
                text: "A new ABI entity or member was introduced".to_string(),
            },
            default_configuration: SarifConfiguration {
                level: SarifLevel::Warning,
            },
        },
        SarifRule {
            id: "ABI-TOOLS-003".to_string(),
            name: "AbiEntityChanged".to_string(),
            short_description: SarifMessage {
                text: "Layout, signature, value or linkage of an ABI entity changed".to_string(),
            },
            default_configuration: SarifConfiguration {
                level: SarifLevel::Error,
            },
        },
    ]
}

// SARIF structures

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    information_uri: Option<String>,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    name: String,
    short_description: SarifMessage,
    default_configuration: SarifConfiguration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifConfiguration {
    level: SarifLevel,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: SarifLevel,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    physical_location: Option<SarifPhysicalLocation>,
    logical_locations: Vec<SarifLogicalLocation>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLogicalLocation {
    fully_qualified_name: String,
    kind: String,
}

#[derive(Serialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum SarifLevel {
    Note,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::sample_diff;

    fn levels(reporter: &SarifReporter) -> Vec<String> {
        let report = CompatibilityReport::from_diff(&sample_diff());
        let sarif = reporter.generate(&report, &ReportConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&sarif).unwrap();
        assert_eq!(value["version"], "2.1.0");
        value["runs"][0]["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["level"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_impact_maps_to_level() {
        assert_eq!(
            levels(&SarifReporter::new()),
            vec!["error", "warning", "warning", "error"]
        );
    }

    #[test]
    fn test_logical_location() {
        let entry = &sample_diff().entries[1];
        let result = to_result(entry, None);
        assert_eq!(result.locations[0].logical_locations[0].fully_qualified_name, "S::b");
        assert!(result.locations[0].physical_location.is_none());
    }
}
