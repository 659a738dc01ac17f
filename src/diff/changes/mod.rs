//! Change computer implementations.
//!
//! This module provides concrete implementations of the `ChangeComputer` trait
//! for each category: records, enums, functions, and global variables.

mod enums;
mod functions;
mod globals;
mod records;

pub use enums::EnumChangeComputer;
pub use functions::FunctionChangeComputer;
pub use globals::GlobalVarChangeComputer;
pub use records::RecordChangeComputer;

use crate::diff::Impact;
use crate::model::Linkage;
use std::fmt::Display;

/// `old → new`, the shape every "changed" detail uses.
pub(crate) fn arrow(old: impl Display, new: impl Display) -> String {
    format!("{old} → {new}")
}

/// Impact of a linkage change on a function or global variable.
pub(crate) fn linkage_impact(old: Linkage, new: Linkage) -> Impact {
    match (old.is_externally_visible(), new.is_externally_visible()) {
        (true, false) => Impact::Breaking,
        (false, true) => Impact::NonBreaking,
        // external <-> weak: the symbol stays resolvable
        _ => Impact::Informational,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linkage_impact() {
        assert_eq!(linkage_impact(Linkage::External, Linkage::Internal), Impact::Breaking);
        assert_eq!(linkage_impact(Linkage::Weak, Linkage::Internal), Impact::Breaking);
        assert_eq!(linkage_impact(Linkage::Internal, Linkage::External), Impact::NonBreaking);
        assert_eq!(linkage_impact(Linkage::External, Linkage::Weak), Impact::Informational);
    }
}
