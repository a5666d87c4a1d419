//! CLI error types with exit code handling

use krmgen_core::{ConfigError, KrmError};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::exit_codes;

/// Run-level error of a krmgen command
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// One or more resources could not be converted
    #[error("{failed} of {total} resource(s) failed to convert")]
    #[diagnostic(
        code(krmgen::cli::conversion),
        help("the generated file holds every resource that converted; see the log above for the failures")
    )]
    ConversionFailed { failed: usize, total: usize },

    /// Configuration file or mapping tables could not be loaded
    #[error("Configuration error: {message}")]
    #[diagnostic(code(krmgen::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Bad invocation
    #[error("Invalid input: {message}")]
    #[diagnostic(code(krmgen::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error on {path}: {message}")]
    #[diagnostic(code(krmgen::cli::io))]
    Io { path: PathBuf, message: String },

    /// Any other failure, already formatted
    #[error("{message}")]
    #[diagnostic(code(krmgen::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ConversionFailed { .. } => exit_codes::CONVERSION_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Input { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config {
            message: err.to_string(),
            help: Some("check --config, --struct-mapping and --enum-mapping".to_string()),
        }
    }
}

impl From<KrmError> for CliError {
    fn from(err: KrmError) -> Self {
        match err {
            KrmError::Config(err) => err.into(),
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Why a single manifest document could not be converted
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("{path}: cannot decode document: {message}")]
    Decode { path: String, message: String },

    #[error("{path}: document has no {field}")]
    MissingField { path: String, field: &'static str },

    #[error("{path}: unsupported kind {kind}")]
    UnsupportedKind { path: String, kind: String },

    #[error("{path}: {source}")]
    Convert {
        path: String,
        #[source]
        source: KrmError,
    },
}
