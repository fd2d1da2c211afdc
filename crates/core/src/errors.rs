//! Core error types for SellerDash.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from SQL drivers, HTTP clients, etc.) are converted to these types by the
//! layer that owns them.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the goals engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid goal configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// A goal definition that is structurally invalid.
///
/// These are data-integrity errors, not transient conditions, so callers
/// should surface them instead of retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Unparsable goal period '{0}' (expected a day count like \"30d\")")]
    InvalidPeriod(String),

    #[error("Scope '{scope}' is inconsistent with its target: {detail}")]
    ScopeTargetMismatch { scope: String, detail: String },

    #[error("Target value must be greater than zero, got {0}")]
    NonPositiveTarget(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

impl Error {
    /// Returns the configuration error when this is one.
    pub fn as_configuration(&self) -> Option<&ConfigurationError> {
        match self {
            Error::Configuration(err) => Some(err),
            _ => None,
        }
    }
}
