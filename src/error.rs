//! Error types for the conversion pipeline.
//!
//! Two layers, matching where a failure can occur:
//!
//! - [`RequestError`] - the request itself is unusable (client's fault)
//! - [`EncodeError`] - a registered encoder failed while producing output
//! - [`ConvertError`] - top-level wrapper returned by the pipeline
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. The HTTP layer maps
//! [`ConvertError::status`] straight onto the response code.

use axum::http::StatusCode;
use thiserror::Error;

// =============================================================================
// Request Errors (client errors, HTTP 400)
// =============================================================================

/// The request payload cannot be converted as supplied.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required field is absent from the request body.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// `data` is present but not an object or an array of objects.
    #[error("Invalid data shape: {0}")]
    InvalidShape(String),

    /// The requested format is not in the registry.
    #[error("Unsupported format '{requested}'. Supported formats: {supported}")]
    UnsupportedFormat { requested: String, supported: String },
}

// =============================================================================
// Encode Errors (server errors, HTTP 500)
// =============================================================================

/// A registered encoder failed while producing output bytes.
///
/// `message` carries the underlying library error; it is logged verbatim
/// server-side, the client only sees the format name and a short cause.
#[derive(Debug, Error)]
#[error("Failed to encode '{format}' output: {message}")]
pub struct EncodeError {
    pub format: &'static str,
    pub message: String,
}

impl EncodeError {
    pub fn new(format: &'static str, message: impl Into<String>) -> Self {
        Self {
            format,
            message: message.into(),
        }
    }
}

// =============================================================================
// Convert Errors (top-level)
// =============================================================================

/// Top-level pipeline error, the only error type [`crate::pipeline::convert`]
/// returns. Exactly one of these (or one success) is produced per request.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Request validation failed.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Encoder failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl ConvertError {
    /// HTTP status classification: validation failures are the client's
    /// fault, encoder failures are ours.
    pub fn status(&self) -> StatusCode {
        match self {
            ConvertError::Request(_) => StatusCode::BAD_REQUEST,
            ConvertError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for request validation and normalization.
pub type RequestResult<T> = Result<T, RequestError>;

/// Result type for encoder implementations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for the conversion pipeline.
pub type ConvertResult<T> = Result<T, ConvertError>;
