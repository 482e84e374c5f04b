//! Error types and exit codes for materia
//!
//! The similarity algorithms never fail on malformed data; errors only come
//! from the boundary (content sources, configuration, lookups).
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args/config values)
//! - 3: Data error (formula not found, invalid content)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the materia CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing formula, unreadable content (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during materia operations
#[derive(Error, Debug)]
pub enum MateriaError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("no content source configured (use --source, --url, or [content] in config)")]
    NoContentSource,

    // Data errors (exit code 3)
    #[error("formula not found: {id}")]
    FormulaNotFound { id: String },

    #[error("invalid content from {source_name}: {reason}")]
    InvalidContent { source_name: String, reason: String },

    #[error("config file not found: {path:?}")]
    ConfigNotFound { path: PathBuf },

    // Generic failures (exit code 1)
    #[error("content unavailable from {source_name}: {reason}")]
    ContentUnavailable { source_name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl MateriaError {
    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        MateriaError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a formula id missing from the pool
    pub fn formula_not_found(id: impl Into<String>) -> Self {
        MateriaError::FormulaNotFound { id: id.into() }
    }

    /// Create an error for a content document that could not be understood
    pub fn invalid_content(source_name: &str, reason: impl std::fmt::Display) -> Self {
        MateriaError::InvalidContent {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for a content source that could not be reached
    pub fn content_unavailable(source_name: &str, reason: impl std::fmt::Display) -> Self {
        MateriaError::ContentUnavailable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn failed_operation(operation: &str, reason: impl std::fmt::Display) -> Self {
        MateriaError::FailedOperation {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            MateriaError::UnknownFormat(_)
            | MateriaError::UsageError(_)
            | MateriaError::InvalidValue { .. }
            | MateriaError::NoContentSource => ExitCode::Usage,

            MateriaError::FormulaNotFound { .. }
            | MateriaError::InvalidContent { .. }
            | MateriaError::ConfigNotFound { .. } => ExitCode::Data,

            MateriaError::ContentUnavailable { .. }
            | MateriaError::Io(_)
            | MateriaError::Json(_)
            | MateriaError::Toml(_)
            | MateriaError::FailedOperation { .. }
            | MateriaError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            MateriaError::UnknownFormat(_) => "unknown_format",
            MateriaError::UsageError(_) => "usage_error",
            MateriaError::InvalidValue { .. } => "invalid_value",
            MateriaError::NoContentSource => "no_content_source",
            MateriaError::FormulaNotFound { .. } => "formula_not_found",
            MateriaError::InvalidContent { .. } => "invalid_content",
            MateriaError::ConfigNotFound { .. } => "config_not_found",
            MateriaError::ContentUnavailable { .. } => "content_unavailable",
            MateriaError::Io(_) => "io_error",
            MateriaError::Json(_) => "json_error",
            MateriaError::Toml(_) => "toml_error",
            MateriaError::FailedOperation { .. } => "failed_operation",
            MateriaError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for materia operations
pub type Result<T> = std::result::Result<T, MateriaError>;
