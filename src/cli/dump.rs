//! Dump command handler.
//!
//! Implements the `dump` subcommand: facts files in, one dump out.

use crate::config::{ensure_valid, DumpCommandConfig};
use crate::pipeline::{exit_codes, extract_dump, write_dump_output};
use anyhow::Result;

/// Run the dump command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_dump(config: DumpCommandConfig) -> Result<i32> {
    ensure_valid(&config)?;
    let repr = extract_dump(&config)?;
    write_dump_output(&repr, config.output.as_deref(), &config.dump)?;
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DumpConfig;

    #[test]
    fn test_dump_to_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let facts = dir.path().join("api.facts.json");
        std::fs::write(
            &facts,
            r#"{"facts_version": 1, "unit": "api.h", "declarations": [
                {"kind": "variable", "name": "g_count", "type_ref": {"name": "int"}}
            ]}"#,
        )
        .unwrap();
        let out = dir.path().join("api.yaml");

        let code = run_dump(DumpCommandConfig {
            inputs: vec![facts],
            output: Some(out.clone()),
            dump: DumpConfig::default(),
        })
        .unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let repr = crate::dump::read_dump(&out).unwrap();
        assert!(repr.global_var("g_count").is_some());
    }

    #[test]
    fn test_dump_without_inputs() {
        let config = DumpCommandConfig {
            inputs: Vec::new(),
            output: None,
            dump: DumpConfig::default(),
        };
        assert!(run_dump(config).is_err());
    }
}
