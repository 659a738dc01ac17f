//! Validate command handler.
//!
//! Implements the `validate` subcommand: load a dump, re-run the model
//! invariants, and print what it contains.

use crate::model::AbiStats;
use crate::pipeline::{exit_codes, load_dump_with_context, write_output, OutputTarget};
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::path::PathBuf;

/// Output format of the validate command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ValidateFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// A JSON object
    Json,
}

#[derive(Serialize)]
struct ValidationSummary {
    path: String,
    valid: bool,
    format_version: u32,
    content_hash: String,
    stats: AbiStats,
}

/// Run the validate command, returning the desired exit code.
///
/// A dump that fails to load is reported as an error by the caller.
#[allow(clippy::needless_pass_by_value)]
pub fn run_validate(
    dump_path: PathBuf,
    format: ValidateFormat,
    output_file: Option<PathBuf>,
    quiet: bool,
) -> Result<i32> {
    let loaded = load_dump_with_context(&dump_path, quiet)?;
    let summary = ValidationSummary {
        path: loaded.display_path(),
        valid: true,
        format_version: loaded.repr.format_version(),
        content_hash: format!("{:016x}", loaded.repr.content_hash()),
        stats: loaded.repr.stats(),
    };

    let content = match format {
        ValidateFormat::Json => serde_json::to_string_pretty(&summary)?,
        ValidateFormat::Text => render_text(&summary),
    };
    write_output(&content, &OutputTarget::from_option(output_file), quiet)?;
    Ok(exit_codes::SUCCESS)
}

fn render_text(summary: &ValidationSummary) -> String {
    let s = &summary.stats;
    [
        format!("{}: valid (format version {})", summary.path, summary.format_version),
        format!("  content hash:  {}", summary.content_hash),
        format!(
            "  records:       {} ({} opaque, {} template instantiations)",
            s.records, s.opaque_records, s.template_instantiations
        ),
        format!("  enums:         {} ({} enumerators)", s.enums, s.enumerators),
        format!("  functions:     {} ({} virtual)", s.functions, s.virtual_functions),
        format!("  global vars:   {}", s.global_vars),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::{write_dump, DumpFormat};
    use crate::model::{AbiRepresentationBuilder, EnumType};

    #[test]
    fn test_validate_json_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abi.json");
        let mut builder = AbiRepresentationBuilder::new();
        builder
            .add_enum(EnumType::new("Color").with("RED", 1).with("GREEN", 2))
            .unwrap();
        write_dump(&path, &builder.build().unwrap(), DumpFormat::Json).unwrap();

        let out = dir.path().join("summary.json");
        let code = run_validate(path, ValidateFormat::Json, Some(out.clone()), true).unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(value["valid"], true);
        assert_eq!(value["stats"]["enumerators"], 2);
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abi.json");
        std::fs::write(&path, "{\"format_version\": 1, \"records\": 7}").unwrap();
        assert!(run_validate(path, ValidateFormat::Text, None, true).is_err());
    }
}
