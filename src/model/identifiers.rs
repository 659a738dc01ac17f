//! Stable identifiers for ABI entities.
//!
//! A [`Uid`] is derived only from names: the fully-qualified name, the template
//! argument list for instantiations, and the parameter type list for functions.
//! Two extraction runs over unchanged headers therefore produce identical UIDs
//! regardless of declaration order, which is what lets the diff engine match
//! entities between an old and a new dump.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier of an entity within its category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    /// Wrap an already-formed identifier string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// UID for a plain record, enum or global: the qualified name itself.
    pub fn from_name(qualified_name: &str) -> Self {
        Self(qualified_name.trim().to_string())
    }

    /// UID for a template instantiation: `name<arg, arg>`.
    ///
    /// An empty argument list yields the plain name, so a non-template record
    /// and its UID agree.
    pub fn for_instantiation(template_name: &str, arguments: &[String]) -> Self {
        if arguments.is_empty() {
            return Self::from_name(template_name);
        }
        let args: Vec<&str> = arguments.iter().map(|a| a.trim()).collect();
        Self(format!("{}<{}>", template_name.trim(), args.join(", ")))
    }

    /// UID for a function: `name(param, param)`, with `...` appended for variadics.
    pub fn for_function(qualified_name: &str, parameters: &[String], variadic: bool) -> Self {
        let mut params: Vec<&str> = parameters.iter().map(|p| p.trim()).collect();
        if variadic {
            params.push("...");
        }
        Self(format!("{}({})", qualified_name.trim(), params.join(", ")))
    }

    /// Get the identifier string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The qualified name portion of a function UID (everything before the
    /// parameter list). For other UIDs this is the whole string.
    #[must_use]
    pub fn base_name(&self) -> &str {
        match self.0.find('(') {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Uid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Uid {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Uid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The four entity categories of a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Records,
    Enums,
    Functions,
    GlobalVars,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 4] = [
        Category::Records,
        Category::Enums,
        Category::Functions,
        Category::GlobalVars,
    ];

    /// Stable plural key used in structured output.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Records => "records",
            Self::Enums => "enums",
            Self::Functions => "functions",
            Self::GlobalVars => "global_vars",
        }
    }

    /// Heading used by human-readable reports.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Records => "Records",
            Self::Enums => "Enums",
            Self::Functions => "Functions",
            Self::GlobalVars => "Global variables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = match self {
            Self::Records => "record",
            Self::Enums => "enum",
            Self::Functions => "function",
            Self::GlobalVars => "global variable",
        };
        f.write_str(noun)
    }
}
