//! abi-tools: ABI dump and compatibility diff for C/C++ headers

#![allow(clippy::needless_pass_by_value)]

use abi_tools::{
    cli,
    config::{
        self, load_or_default, AppConfig, BehaviorConfig, ConfigPreset, DiffConfig, DiffPaths,
        DumpCommandConfig, EngineConfig, FilterConfig, MergeConfig, OutputConfig,
    },
    diff::{FunctionMatching, Impact},
    dump::DumpFormat,
    pipeline::exit_codes,
    reports::ReportFormat,
};
use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "abi-tools")]
#[command(version)]
#[command(about = "ABI dump and compatibility diff for C/C++ headers", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Compatible (or --advice-only, or no reference with --allow-missing-reference)
    1  Incompatible: at least one breaking change
    2  Extensions found with --fail-on-extension
    3  Error occurred

EXAMPLES:
    # Dump the ABI described by frontend facts
    abi-tools dump include/*.facts.json -o libfoo-1.3.abidump

    # Gate a release in CI
    abi-tools diff libfoo-1.2.abidump libfoo-1.3.abidump --fail-on-extension

    # SARIF for code scanning, first run passes without a reference
    abi-tools --preset ci diff baseline.json current.json -O abi.sarif")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "ABI_TOOLS_CONFIG")]
    config: Option<PathBuf>,

    /// Start from a named preset (default, strict, advisory, ci)
    #[arg(long, global = true)]
    preset: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

// ============================================================================
// Command argument structs
// ============================================================================

/// Arguments for the `dump` subcommand
#[derive(Parser)]
struct DumpArgs {
    /// Facts files, one per header unit
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Dump file to write (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dump format when the output extension does not decide it
    #[arg(short, long)]
    format: Option<DumpFormat>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Extract units one at a time
    #[arg(long)]
    sequential: bool,
}

/// Arguments for the `merge` subcommand
#[derive(Parser)]
struct MergeArgs {
    /// Dumps to merge, in order
    #[arg(required = true, num_args = 2..)]
    inputs: Vec<PathBuf>,

    /// Dump file to write (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dump format when the output extension does not decide it
    #[arg(short, long)]
    format: Option<DumpFormat>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

/// Arguments for the `validate` subcommand
#[derive(Parser)]
struct ValidateArgs {
    /// Dump file to check
    dump: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    output: cli::ValidateFormat,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,
}

/// Arguments for the `diff` subcommand
#[derive(Parser)]
struct DiffArgs {
    /// Path to the reference (old) dump
    old: PathBuf,

    /// Path to the candidate (new) dump
    new: PathBuf,

    /// Output format
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Report title
    #[arg(long)]
    title: Option<String>,

    /// How functions whose signature changed are matched
    #[arg(long)]
    function_matching: Option<FunctionMatching>,

    /// Drop entries whose UID matches this regular expression (repeatable)
    #[arg(long = "ignore", value_name = "REGEX")]
    ignore: Vec<String>,

    /// Hide entries below this impact (the verdict still counts them)
    #[arg(long)]
    min_impact: Option<Impact>,

    /// Maximum entries shown per category and impact
    #[arg(long)]
    max_items: Option<usize>,

    /// Exit with code 2 when the ABI only grew
    #[arg(long)]
    fail_on_extension: bool,

    /// Report only; exit 0 regardless of the verdict
    #[arg(long)]
    advice_only: bool,

    /// Treat a missing reference dump as an empty ABI
    #[arg(long)]
    allow_missing_reference: bool,

    /// Compare categories one after another
    #[arg(long)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract an ABI dump from frontend facts
    Dump(DumpArgs),

    /// Merge several dumps into one
    Merge(MergeArgs),

    /// Check that a dump loads and satisfies the model invariants
    Validate(ValidateArgs),

    /// Compare two dumps
    Diff(DiffArgs),

    /// Generate an example .abi-tools.yaml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate JSON Schema for the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging; reports go to stdout, logs to stderr
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            exit_codes::ERROR
        }
    };
    std::process::exit(code);
}

/// Dispatch to command handlers
fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Dump(ref args) => {
            let overrides = AppConfig {
                dump: config::DumpConfig {
                    format: args.format.unwrap_or_default(),
                    pretty: !args.compact,
                    parallel: !args.sequential,
                },
                ..AppConfig::default()
            };
            let app = resolve_config(&cli, &overrides)?;
            cli::run_dump(DumpCommandConfig {
                inputs: args.inputs.clone(),
                output: args.output.clone(),
                dump: app.dump,
            })
        }

        Commands::Merge(ref args) => {
            let overrides = AppConfig {
                dump: config::DumpConfig {
                    format: args.format.unwrap_or_default(),
                    pretty: !args.compact,
                    ..config::DumpConfig::default()
                },
                ..AppConfig::default()
            };
            let app = resolve_config(&cli, &overrides)?;
            cli::run_merge(MergeConfig {
                inputs: args.inputs.clone(),
                output: args.output.clone(),
                dump: app.dump,
            })
        }

        Commands::Validate(ref args) => cli::run_validate(
            args.dump.clone(),
            args.output,
            args.output_file.clone(),
            cli.quiet,
        ),

        Commands::Diff(ref args) => {
            let overrides = AppConfig {
                diff: EngineConfig {
                    function_matching: args.function_matching.unwrap_or_default(),
                    parallel: !args.sequential,
                    ignore_patterns: args.ignore.clone(),
                },
                output: OutputConfig {
                    format: args.output.unwrap_or_default(),
                    file: args.output_file.clone(),
                    no_color: cli.no_color,
                    title: args.title.clone(),
                },
                filtering: FilterConfig {
                    min_impact: args.min_impact.unwrap_or_default(),
                    max_items: args.max_items,
                },
                behavior: BehaviorConfig {
                    fail_on_extension: args.fail_on_extension,
                    advice_only: args.advice_only,
                    allow_missing_reference: args.allow_missing_reference,
                    quiet: cli.quiet,
                },
                ..AppConfig::default()
            };
            let app = resolve_config(&cli, &overrides)?;
            let config = DiffConfig::from_app(
                DiffPaths {
                    old: args.old.clone(),
                    new: args.new.clone(),
                },
                &app,
            );
            cli::run_diff(config)
        }

        Commands::Init { force } => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".abi-tools.yaml");
            if target.exists() && !force {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite it.",
                    target.display()
                );
            }
            std::fs::write(&target, config::generate_full_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
            Ok(exit_codes::SUCCESS)
        }

        Commands::Schema { ref output } => {
            let schema = config::generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "abi-tools", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Layer preset, config file and command-line overrides, in that order.
fn resolve_config(cli: &Cli, overrides: &AppConfig) -> Result<AppConfig> {
    let mut app = match cli.preset.as_deref() {
        Some(name) => {
            let preset = ConfigPreset::from_name(name).with_context(|| {
                let known: Vec<&str> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
                format!("Unknown preset '{name}'. Valid options: {}", known.join(", "))
            })?;
            tracing::debug!("Using preset: {preset} ({})", preset.description());
            AppConfig::from_preset(preset)
        }
        None => AppConfig::default(),
    };

    let (file_config, loaded_from) = load_or_default(cli.config.as_deref());
    if let Some(path) = loaded_from {
        tracing::debug!("Using config file: {}", path.display());
        app.merge(&file_config);
    }
    app.merge(overrides);
    Ok(app)
}
