//! Typed error handling for the orderfile service
//!
//! This module provides the error hierarchy surfaced by the ingestion and
//! query paths. Each category maps to a stable HTTP status and error code so
//! clients can handle failures programmatically.
//!
//! # Error Categories
//!
//! - [`DecodeError`]: a legacy line failed fixed-width decoding (client error)
//! - [`StoreError`]: the persistent store failed or a transaction aborted
//! - [`RequestError`]: the HTTP request itself was malformed (missing file)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Minimum decodable line length, in characters.
pub const MIN_LINE_LEN: usize = 95;

/// The main error type for the orderfile service
///
/// Wraps the category-specific errors and carries the HTTP mapping used by
/// the handlers: decode and request problems are the caller's fault (400),
/// storage problems are ours (500).
#[derive(Debug)]
pub enum ApiError {
    /// A legacy line could not be decoded
    Decode(DecodeError),

    /// The store rejected or aborted an operation
    Store(StoreError),

    /// The HTTP request was malformed
    Request(RequestError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Decode(e) => write!(f, "{}", e),
            ApiError::Store(e) => write!(f, "{}", e),
            ApiError::Request(e) => write!(f, "{}", e),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Decode(e) => Some(e),
            ApiError::Store(e) => Some(e),
            ApiError::Request(e) => Some(e),
            ApiError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Decode(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Request(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Decode(_) => "BAD_FILE_FORMAT",
            ApiError::Store(_) => "STORAGE_ERROR",
            ApiError::Request(_) => "INVALID_REQUEST",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Decode(DecodeError::InvalidField { field, raw }) => {
                Some(serde_json::json!({ "field": field, "raw": raw }))
            }
            ApiError::Decode(DecodeError::MissingField { field }) => {
                Some(serde_json::json!({ "field": field }))
            }
            ApiError::Decode(DecodeError::TooShort { length }) => Some(serde_json::json!({
                "length": length,
                "minimum": MIN_LINE_LEN,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Decode Errors
// =============================================================================

/// Errors produced while decoding one fixed-width legacy line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No line was supplied at all
    #[error("no line to decode")]
    MissingLine,

    /// The line is shorter than the fixed record layout requires
    #[error("line too short ({length} chars, expected at least {MIN_LINE_LEN})")]
    TooShort { length: usize },

    /// A numeric field held something other than digits
    #[error("invalid {field} field: '{raw}'")]
    InvalidField { field: &'static str, raw: String },

    /// A required field was empty
    #[error("missing {field} field")]
    MissingField { field: &'static str },

    /// The date field did not hold a yyyyMMdd calendar date
    #[error("invalid date: '{raw}'")]
    InvalidDate { raw: String },

    /// Anything unforeseen, wrapped so callers still see a decode failure
    #[error("unexpected decode failure: {0}")]
    Unexpected(String),
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        ApiError::Decode(err)
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors surfaced by [`OrderStore`](crate::core::store::OrderStore) backends
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Shared state lock was poisoned by a panicking writer
    #[error("storage lock poisoned: {0}")]
    LockPoisoned(String),

    /// A backend operation failed; the surrounding transaction is rolled back
    #[error("store operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors for malformed HTTP requests, before any decoding happens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The multipart body had no `file` field
    #[error("multipart request is missing the 'file' field")]
    MissingFile,

    /// The uploaded file had no content
    #[error("uploaded file is empty")]
    EmptyFile,

    /// The multipart body could not be read
    #[error("malformed multipart body: {0}")]
    Multipart(String),
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::Request(err)
    }
}
