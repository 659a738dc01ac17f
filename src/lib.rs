//! **A library for dumping and comparing the ABI of C and C++ headers.**
//!
//! `abi-tools` captures the binary interface a set of headers exposes (record
//! layouts, enumerations, function signatures and global variables) in a
//! versioned dump, and compares two dumps to classify every difference as
//! breaking, non-breaking or informational.
//!
//! ## Key Features
//!
//! - **Frontend-agnostic extraction**: declaration facts from any compiler
//!   frontend are mapped onto a validated model with deterministic UIDs,
//!   flattened template instantiations and canonical built-in spellings.
//! - **Versioned dumps**: JSON and YAML for review, a checksummed binary
//!   form for storage. Every load re-runs the model invariants.
//! - **Precise diffing**: field offsets, bit-field widths, sizes, alignment,
//!   base classes, vtable layout, enumerator values, calling conventions and
//!   linkage are compared per category, concurrently.
//! - **Reporting**: summary, table, JSON, CSV, SARIF and Markdown renderings
//!   of one compatibility report with a single verdict.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the [`AbiRepresentation`] snapshot and its entity types.
//! - **[`extractor`]**: the [`TypeGraphSource`] seam and the [`Extractor`].
//! - **[`dump`]**: serialization and format detection.
//! - **[`diff`]**: the [`DiffEngine`] and per-category change computers.
//! - **[`reports`]**: the [`CompatibilityReport`] and its generators.
//! - **[`pipeline`]** and **[`cli`]**: orchestration used by the binary.
//!
//! ## Example
//!
//! ```
//! use abi_tools::extractor::{EnumFact, InMemorySource, TranslationUnitFacts};
//! use abi_tools::{ChangeKind, CompatibilityReport, DiffEngine, Extractor, Impact};
//!
//! let extract = |red: i64| {
//!     let facts = TranslationUnitFacts::new("color.h")
//!         .with(EnumFact::new("Color").enumerator("RED", red));
//!     Extractor::new().extract(&InMemorySource::new(facts))
//! };
//!
//! let diff = DiffEngine::new().compare(&extract(1)?, &extract(2)?);
//! assert_eq!(diff.entries.len(), 1);
//! assert_eq!(diff.entries[0].kind, ChangeKind::Changed);
//! assert_eq!(diff.entries[0].impact, Impact::Breaking);
//!
//! let report = CompatibilityReport::from_diff(&diff);
//! assert!(!report.is_compatible());
//! # Ok::<(), abi_tools::AbiToolsError>(())
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! This documentation is for the `abi-tools` library crate. The binary wraps
//! it with `dump`, `merge`, `validate` and `diff` subcommands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::struct_excessive_bools,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod dump;
pub mod error;
pub mod extractor;
pub mod model;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset};
pub use config::{BehaviorConfig, DumpConfig, EngineConfig, FilterConfig, OutputConfig};
pub use config::{ConfigError, Validatable};
pub use config::{DiffConfig, DumpCommandConfig, MergeConfig};
pub use diff::{ChangeKind, DiffEngine, DiffEntry, DiffReport, FunctionMatching, Impact};
pub use dump::{read_dump, write_dump, DumpFormat};
pub use error::{AbiToolsError, ErrorContext, OptionContext, Result};
pub use extractor::{Extractor, JsonFactsSource, TypeGraphSource};
pub use model::{AbiRepresentation, AbiRepresentationBuilder, Category, Uid};
pub use reports::{CompatibilityReport, ReportFormat, ReportGenerator, Verdict};
