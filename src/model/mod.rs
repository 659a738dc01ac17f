//! ABI representation model.
//!
//! The canonical, language-agnostic schema of everything in a header set that
//! affects binary compatibility: records with their layout, enums, functions
//! and global variables. Entities refer to each other only through [`Uid`]
//! lookup keys, so a snapshot has no cycles and compares structurally.
//!
//! Snapshots are built once and never mutated:
//!
//! ```
//! use abi_tools::model::{AbiRepresentationBuilder, RecordKind, RecordType, TypeReference};
//!
//! let mut builder = AbiRepresentationBuilder::for_unit("point.h");
//! builder.add_record(
//!     RecordType::new("Point", RecordKind::Struct, 64, 32)
//!         .with_field("x", TypeReference::named("int"), 0)
//!         .with_field("y", TypeReference::named("int"), 32),
//! )?;
//! let repr = builder.build()?;
//! assert!(repr.record("Point").is_some());
//! # Ok::<(), abi_tools::AbiToolsError>(())
//! ```

pub mod builtins;
mod enums;
mod functions;
mod identifiers;
mod merge;
mod records;
mod representation;
mod types;
mod validation;

pub use enums::*;
pub use functions::*;
pub use identifiers::*;
pub use merge::merge_units;
pub use records::*;
pub use representation::*;
pub use types::*;
pub(crate) use validation::type_extent;
