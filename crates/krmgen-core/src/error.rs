//! Error and warning types for the generator
//!
//! Errors abort the conversion of a single resource. Warnings record
//! field-local degradations (a dropped field, an unqualified type) that
//! leave the surrounding resource usable.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::TypeParseError;

/// Failure while reflecting a value into the IR
#[derive(Debug, Error)]
pub enum ReflectError {
    #[error("unsupported value shape at {path}: {shape}")]
    Unsupported { path: String, shape: &'static str },

    #[error("top-level value must be a struct, found {found}")]
    NotAStruct { found: &'static str },

    #[error("top-level value is empty after omitting default fields")]
    Empty,

    #[error("invalid timestamp at {path}: {value}")]
    InvalidTimestamp { path: String, value: String },

    #[error("{0}")]
    Custom(String),
}

impl serde::ser::Error for ReflectError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Failure while reading a persisted IR tree
#[derive(Debug, Error)]
pub enum IrError {
    #[error("invalid IR JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid declared type at {path}: {source}")]
    Type {
        path: String,
        #[source]
        source: TypeParseError,
    },

    #[error("IO error on IR file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed IR at {path}: expected {expected}, found {found}")]
    Shape {
        path: String,
        expected: &'static str,
        found: String,
    },
}

/// Failure while loading configuration or mapping tables
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse mapping table {name}: {source}")]
    Table {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid type in configuration: {0}")]
    Type(#[from] TypeParseError),
}

/// Failure while emitting a top-level resource
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("kind {kind} has no module mapping")]
    UnknownKind { kind: String },
}

/// Any error that aborts a single resource conversion
#[derive(Debug, Error)]
pub enum KrmError {
    #[error(transparent)]
    Reflect(#[from] ReflectError),

    #[error(transparent)]
    Ir(#[from] IrError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unsupported api version {api_version} (only v1 is supported)")]
    UnsupportedVersion { api_version: String },
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, KrmError>;

// =============================================================================
// WARNING SYSTEM
// =============================================================================

/// Warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WarningSeverity {
    /// Informational - output is complete
    Info,
    /// Warning - output was degraded, manual review recommended
    Warning,
    /// Error - output is probably not valid Go
    Error,
}

impl WarningSeverity {
    /// Get the label for this severity
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// What kind of degradation happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    /// Map keys that are not strings
    UnsupportedMapKey,
    /// An omitted slice element replaced by an empty string
    EmptyElement,
    /// A type with no module mapping, emitted unqualified
    UnknownModule,
    /// Unbalanced delimiters in emitted text
    BraceBalance,
}

impl WarningCategory {
    /// Get the display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnsupportedMapKey => "map-key",
            Self::EmptyElement => "empty-element",
            Self::UnknownModule => "unknown-module",
            Self::BraceBalance => "brace-balance",
        }
    }
}

/// A field-local degradation
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionWarning {
    pub severity: WarningSeverity,
    pub category: WarningCategory,
    /// Dotted attribute path, or the type name for resolver warnings
    pub path: String,
    pub message: String,
}

impl ConversionWarning {
    pub fn warning(category: WarningCategory, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: WarningSeverity::Warning,
            category,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn info(category: WarningCategory, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: WarningSeverity::Info,
            ..Self::warning(category, path, message)
        }
    }

    pub fn error(category: WarningCategory, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: WarningSeverity::Error,
            ..Self::warning(category, path, message)
        }
    }
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity.label(),
            self.path,
            self.category.label(),
            self.message
        )
    }
}
