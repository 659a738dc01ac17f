//! Unified error types for abi-tools.
//!
//! Extraction, merge and load failures are fatal for the run that produced them:
//! a dump with dangling references or conflicting declarations cannot be compared.
//! Every variant carries enough context (UID, category, unit or path) to act on.

use crate::model::Category;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for abi-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AbiToolsError {
    /// Errors while building or merging an ABI representation
    #[error("Invalid ABI model: {context}")]
    Model {
        context: String,
        #[source]
        source: ModelErrorKind,
    },

    /// Errors while reading or writing a dump
    #[error("Failed to load ABI dump: {context}")]
    Dump {
        context: String,
        #[source]
        source: DumpErrorKind,
    },

    /// Errors in the facts supplied by a frontend
    #[error("Extraction failed: {context}")]
    Extraction {
        context: String,
        #[source]
        source: ExtractErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Model construction and merge failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelErrorKind {
    #[error("duplicate {category} declaration '{uid}'{}", unit_suffix(.unit))]
    DuplicateDeclaration {
        category: Category,
        uid: String,
        unit: Option<String>,
    },

    #[error("{category} '{referrer}' references unknown type '{target}'")]
    UnresolvedTypeReference {
        category: Category,
        referrer: String,
        target: String,
    },

    #[error(
        "conflicting {category} declaration '{uid}' between '{first_unit}' and '{second_unit}'"
    )]
    ConflictingDeclaration {
        category: Category,
        uid: String,
        first_unit: String,
        second_unit: String,
    },

    #[error("record '{uid}' has an invalid layout: {reason}")]
    InvalidLayout { uid: String, reason: String },
}

fn unit_suffix(unit: &Option<String>) -> String {
    unit.as_ref()
        .map(|u| format!(" in '{u}'"))
        .unwrap_or_default()
}

/// Dump load/store failures.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DumpErrorKind {
    #[error("Unsupported dump version: {found} (supported: {supported})")]
    UnsupportedDumpVersion { found: u32, supported: String },

    #[error("Malformed dump: {0}")]
    MalformedDump(String),

    #[error("Unknown dump format: {0}")]
    UnknownFormat(String),
}

/// Frontend facts failures.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtractErrorKind {
    #[error("Unsupported facts version: {found} (supported: {supported})")]
    UnsupportedFactsVersion { found: u32, supported: u32 },

    #[error("Invalid facts JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid declaration '{name}': {reason}")]
    InvalidDeclaration { name: String, reason: String },
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),

    #[error("Output format not supported for this operation: {0}")]
    UnsupportedFormat(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for abi-tools operations
pub type Result<T> = std::result::Result<T, AbiToolsError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl AbiToolsError {
    /// Create a model error with context
    pub fn model(context: impl Into<String>, source: ModelErrorKind) -> Self {
        Self::Model {
            context: context.into(),
            source,
        }
    }

    /// Create a dump error with context
    pub fn dump(context: impl Into<String>, source: DumpErrorKind) -> Self {
        Self::Dump {
            context: context.into(),
            source,
        }
    }

    /// Create a malformed-dump error
    pub fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::dump(context, DumpErrorKind::MalformedDump(message.into()))
    }

    /// Create an unsupported-version error
    pub fn unsupported_version(found: u32, supported: &[u32]) -> Self {
        let supported = supported
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self::dump(
            "checking dump version",
            DumpErrorKind::UnsupportedDumpVersion { found, supported },
        )
    }

    /// Create an extraction error with context
    pub fn extraction(context: impl Into<String>, source: ExtractErrorKind) -> Self {
        Self::Extraction {
            context: context.into(),
            source,
        }
    }

    /// Create an extraction error for a single bad declaration
    pub fn invalid_declaration(
        unit: impl Into<String>,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::extraction(
            format!("in unit {}", unit.into()),
            ExtractErrorKind::InvalidDeclaration {
                name: name.into(),
                reason: reason.into(),
            },
        )
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// The model error kind, if this is a model error.
    #[must_use]
    pub fn model_kind(&self) -> Option<&ModelErrorKind> {
        match self {
            Self::Model { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The dump error kind, if this is a dump error.
    #[must_use]
    pub fn dump_kind(&self) -> Option<&DumpErrorKind> {
        match self {
            Self::Dump { source, .. } => Some(source),
            _ => None,
        }
    }

    /// True when the error is an IO "not found" failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for AbiToolsError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<ModelErrorKind> for AbiToolsError {
    fn from(kind: ModelErrorKind) -> Self {
        Self::model(kind.to_string(), kind)
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain outermost first, so an error raised while validating a
/// record inside a dump loaded from disk reads
/// `reading old.json: decoding dump: record 'S' ...`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, only evaluated on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<AbiToolsError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: AbiToolsError, new_ctx: &str) -> AbiToolsError {
    match err {
        AbiToolsError::Model {
            context: existing,
            source,
        } => AbiToolsError::Model {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AbiToolsError::Dump {
            context: existing,
            source,
        } => AbiToolsError::Dump {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AbiToolsError::Extraction {
            context: existing,
            source,
        } => AbiToolsError::Extraction {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AbiToolsError::Report {
            context: existing,
            source,
        } => AbiToolsError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        AbiToolsError::Io {
            path,
            message,
            source,
        } => AbiToolsError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        AbiToolsError::Config(msg) => AbiToolsError::Config(chain_context(new_ctx, &msg)),
        AbiToolsError::Validation(msg) => AbiToolsError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| AbiToolsError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| AbiToolsError::Validation(f().into()))
    }
}
