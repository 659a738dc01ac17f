//! Compatibility diff engine for ABI snapshots.
//!
//! Two [`AbiRepresentation`](crate::model::AbiRepresentation)s are compared
//! entity by entity, matching on UID. Every difference becomes a
//! [`DiffEntry`] classified as breaking, non-breaking or informational.
//!
//! # Architecture
//!
//! The diff system is built on traits for extensibility:
//!
//! - [`ChangeComputer`](traits::ChangeComputer): Trait for computing the changes of one category
//! - Individual change computers in the [`changes`] module
//!
//! The engine runs the four computers concurrently over shared references and
//! concatenates their results in category order.
//!
//! # Example
//!
//! ```
//! use abi_tools::diff::{DiffEngine, Impact};
//! use abi_tools::model::{AbiRepresentationBuilder, EnumType};
//!
//! let mut old = AbiRepresentationBuilder::new();
//! old.add_enum(EnumType::new("Color").with("RED", 1))?;
//! let mut new = AbiRepresentationBuilder::new();
//! new.add_enum(EnumType::new("Color").with("RED", 2))?;
//!
//! let report = DiffEngine::new().compare(&old.build()?, &new.build()?);
//! assert_eq!(report.entries[0].impact, Impact::Breaking);
//! # Ok::<(), abi_tools::AbiToolsError>(())
//! ```

pub mod changes;
mod engine;
mod engine_config;
mod result;
pub mod traits;

pub use engine::DiffEngine;
pub use engine_config::FunctionMatching;
pub use result::{ChangeKind, DiffEntry, DiffReport, DiffSummary, Impact};
pub use traits::{ChangeComputer, ChangeSet};
