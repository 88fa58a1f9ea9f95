//! Error types used throughout reconciliation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while computing derived registration-field attributes.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum DerivationError {
    #[error("field `{field_key}` has data type CONSENT but no consent reference")]
    MissingConsentRef { field_key: String },
}

/// Main error type for tenantform
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum ReconcileError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request failed with status {status}: {body}")]
    Request { status: u16, body: String },

    #[error("Could not decode `{field}`: {message}")]
    Decode { field: String, message: String },

    #[error("Could not encode request: {0}")]
    Encode(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Derivation failed: {0}")]
    Derivation(#[from] DerivationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ReconcileError {
    /// Build a [`ReconcileError::Decode`] for a named wire field.
    pub fn decode(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode { field: field.into(), message: message.into() }
    }

    /// `true` when the platform reported the entity missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Request { status: 404, .. } | Self::NotFound(_))
    }

    /// Whether repeating the same call later could succeed.
    ///
    /// Nothing in this workspace retries; the flag is for callers that do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Request { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Stable label used in structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Transport(_) => "transport",
            Self::Request { .. } => "request",
            Self::Decode { .. } => "decode",
            Self::Encode(_) => "encode",
            Self::Validation(_) => "validation",
            Self::Derivation(_) => "derivation",
            Self::NotFound(_) => "not_found",
            Self::Config(_) => "config",
        }
    }
}

/// Free-function form of [`ReconcileError::label`] for logging call sites.
pub fn error_label(error: &ReconcileError) -> &'static str {
    error.label()
}

/// Result type alias for tenantform operations
pub type Result<T> = std::result::Result<T, ReconcileError>;
