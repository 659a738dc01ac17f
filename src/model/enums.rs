//! Enumeration types.

use super::{TypeReference, Uid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enumerator value. Kept signed or unsigned as the frontend reported it so
/// that values above `i64::MAX` survive a round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumeratorValue {
    Signed(i64),
    Unsigned(u64),
}

impl EnumeratorValue {
    /// Numeric value in a type wide enough for both signednesses.
    #[must_use]
    pub fn as_i128(&self) -> i128 {
        match *self {
            Self::Signed(v) => i128::from(v),
            Self::Unsigned(v) => i128::from(v),
        }
    }
}

impl fmt::Display for EnumeratorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enumerator {
    pub name: String,
    pub value: EnumeratorValue,
}

/// An enumeration with its underlying integer type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub uid: Uid,
    pub name: String,
    pub underlying: TypeReference,
    #[serde(default)]
    pub enumerators: Vec<Enumerator>,
}

impl EnumType {
    /// An `int`-backed enum with no enumerators.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            uid: Uid::from_name(&name),
            name,
            underlying: TypeReference::named("int"),
            enumerators: Vec::new(),
        }
    }

    /// Append a signed enumerator.
    #[must_use]
    pub fn with(mut self, name: &str, value: i64) -> Self {
        self.enumerators.push(Enumerator {
            name: name.to_string(),
            value: EnumeratorValue::Signed(value),
        });
        self
    }

    /// Replace the underlying type.
    #[must_use]
    pub fn with_underlying(mut self, underlying: TypeReference) -> Self {
        self.underlying = underlying;
        self
    }

    pub fn enumerator(&self, name: &str) -> Option<&Enumerator> {
        self.enumerators.iter().find(|e| e.name == name)
    }

    /// True if any enumerator has this numeric value.
    #[must_use]
    pub fn has_value(&self, value: EnumeratorValue) -> bool {
        let wanted = value.as_i128();
        self.enumerators.iter().any(|e| e.value.as_i128() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_compare_across_signedness() {
        let e = EnumType::new("Color").with("RED", 1);
        assert!(e.has_value(EnumeratorValue::Unsigned(1)));
        assert!(!e.has_value(EnumeratorValue::Signed(-1)));
    }

    #[test]
    fn test_large_unsigned_value() {
        let v = EnumeratorValue::Unsigned(u64::MAX);
        assert_eq!(v.as_i128(), i128::from(u64::MAX));
        assert_eq!(v.to_string(), "18446744073709551615");
    }
}
