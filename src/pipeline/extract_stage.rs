//! Extraction and merge stages.
//!
//! Turns per-unit facts files into one dump, or folds existing dumps into
//! one, writing the result to a file or stdout.

use super::{load_dump_with_context, PipelineError};
use crate::config::{DumpCommandConfig, DumpConfig, MergeConfig};
use crate::dump::{self, DumpFormat};
use crate::extractor::{Extractor, JsonFactsSource, TypeGraphSource};
use crate::model::{merge_units, AbiRepresentation};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Extract every facts file and merge the units into one representation.
pub fn extract_dump(config: &DumpCommandConfig) -> Result<AbiRepresentation> {
    let sources: Vec<Box<dyn TypeGraphSource>> = config
        .inputs
        .iter()
        .map(|path| Box::new(JsonFactsSource::new(path)) as Box<dyn TypeGraphSource>)
        .collect();

    tracing::info!("Extracting {} header unit(s)", sources.len());

    let extractor = if config.dump.parallel {
        Extractor::new()
    } else {
        Extractor::new().sequential()
    };
    let repr = extractor
        .extract_all(&sources)
        .map_err(|source| PipelineError::ExtractFailed { source })?;

    let stats = repr.stats();
    tracing::info!(
        "Extracted {} records ({} opaque, {} template instantiations), {} enums, {} functions, {} global variables",
        stats.records,
        stats.opaque_records,
        stats.template_instantiations,
        stats.enums,
        stats.functions,
        stats.global_vars
    );

    Ok(repr)
}

/// Load several dumps and merge them in order.
pub fn merge_dumps(config: &MergeConfig) -> Result<AbiRepresentation> {
    let parts = config
        .inputs
        .iter()
        .map(|path| {
            load_dump_with_context(path, true)
                .map(|loaded| (loaded.display_path(), loaded.into_repr()))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!("Merging {} dump(s)", parts.len());
    merge_units(parts)
        .map_err(|source| PipelineError::ExtractFailed { source })
        .context("Failed to merge dumps")
}

/// Write a representation to `output`, or to stdout when `None`.
///
/// The output extension picks the format; otherwise the configured one is
/// used. Binary dumps are refused on an interactive terminal.
pub fn write_dump_output(
    repr: &AbiRepresentation,
    output: Option<&Path>,
    config: &DumpConfig,
) -> Result<()> {
    match output {
        Some(path) => {
            let format = dump::format_for_path(path, config.format);
            let bytes = dump::serialize_with(repr, format, config.pretty)?;
            std::fs::write(path, bytes)
                .with_context(|| format!("Failed to write dump to {}", path.display()))?;
            tracing::info!("Wrote {} dump to {}", format, path.display());
        }
        None => {
            let format = config.format;
            if format == DumpFormat::Binary && std::io::IsTerminal::is_terminal(&std::io::stdout())
            {
                anyhow::bail!("Refusing to write a binary dump to a terminal; use --output");
            }
            let bytes = dump::serialize_with(repr, format, config.pretty)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            if format.is_text() {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const POINT_H: &str = r#"{
        "facts_version": 1,
        "unit": "point.h",
        "declarations": [
            {"kind": "record", "name": "Point", "record_kind": "struct",
             "layout": {"size_bits": 64, "align_bits": 32,
                "fields": [
                    {"name": "x", "type_ref": {"name": "int"}, "offset_bits": 0},
                    {"name": "y", "type_ref": {"name": "int"}, "offset_bits": 32}
                ]}}
        ]
    }"#;

    const COLOR_H: &str = r#"{
        "facts_version": 1,
        "unit": "color.h",
        "declarations": [
            {"kind": "enum", "name": "Color",
             "enumerators": [{"name": "RED", "value": 1}]}
        ]
    }"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_extract_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let config = DumpCommandConfig {
            inputs: vec![
                write(dir.path(), "point.facts.json", POINT_H),
                write(dir.path(), "color.facts.json", COLOR_H),
            ],
            output: None,
            dump: DumpConfig::default(),
        };
        let repr = extract_dump(&config).unwrap();
        assert!(repr.record("Point").is_some());
        assert!(repr.enumeration("Color").is_some());

        let out = dir.path().join("lib.abidump");
        write_dump_output(&repr, Some(&out), &config.dump).unwrap();
        assert_eq!(&std::fs::read(&out).unwrap()[..4], b"ABID");
        assert_eq!(dump::read_dump(&out).unwrap(), repr);
    }

    #[test]
    fn test_merge_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let extract = |name: &str, content: &str| {
            let config = DumpCommandConfig {
                inputs: vec![write(dir.path(), name, content)],
                output: None,
                dump: DumpConfig::default(),
            };
            extract_dump(&config).unwrap()
        };
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        dump::write_dump(&a, &extract("p.facts.json", POINT_H), DumpFormat::Json).unwrap();
        dump::write_dump(&b, &extract("c.facts.json", COLOR_H), DumpFormat::Json).unwrap();

        let merged = merge_dumps(&MergeConfig {
            inputs: vec![a, b],
            output: None,
            dump: DumpConfig::default(),
        })
        .unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_extract_reports_bad_facts() {
        let dir = tempfile::tempdir().unwrap();
        let config = DumpCommandConfig {
            inputs: vec![write(dir.path(), "bad.facts.json", "{\"facts_version\": 99}")],
            output: None,
            dump: DumpConfig::default(),
        };
        assert!(extract_dump(&config).is_err());
    }
}
