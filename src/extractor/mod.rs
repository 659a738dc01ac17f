//! Type graph extraction.
//!
//! The compiler frontend is an external collaborator: it resolves a header
//! set and hands over a declaration graph ("facts") through a
//! [`TypeGraphSource`]. The [`Extractor`] maps those facts onto the ABI model,
//! computing deterministic UIDs, flattening template instantiations into
//! concrete records and canonicalizing built-in spellings.
//!
//! ```
//! use abi_tools::extractor::{
//!     EnumFact, Extractor, InMemorySource, TranslationUnitFacts,
//! };
//!
//! let facts = TranslationUnitFacts::new("color.h")
//!     .with(EnumFact::new("Color").enumerator("RED", 1));
//! let repr = Extractor::new().extract(&InMemorySource::new(facts))?;
//! assert!(repr.enumeration("Color").is_some());
//! # Ok::<(), abi_tools::AbiToolsError>(())
//! ```

mod extract;
mod facts;
mod source;

pub use extract::Extractor;
pub use facts::*;
pub use source::{parse_facts, InMemorySource, JsonFactsSource, TypeGraphSource};
