//! Error types with HTTP status code mapping.
//!
//! [`ScanmapError`] is the central error type for the crate. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! [`EncodingError`] is raised by the symbol encoder and converts into
//! [`ScanmapError::Encoding`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::CodeIdentifier;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "code not found: 0f5c…",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`ScanmapError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Failure while turning data into a QR raster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    /// The data does not fit even the largest symbol version.
    #[error("data too long: {len} bytes exceed the capacity of version 40")]
    DataTooLong {
        /// Length of the rejected payload in bytes.
        len: usize,
    },

    /// A color identifier could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Requested version is outside `1..=40`.
    #[error("invalid version {0}: must be within 1..=40")]
    InvalidVersion(u8),

    /// Module size of zero pixels.
    #[error("module size must be at least 1 pixel")]
    InvalidModuleSize,

    /// The raster would exceed the maximum side length.
    #[error("image too large: {side} px exceeds the {max} px limit")]
    ImageTooLarge {
        /// Requested side length in pixels.
        side: u64,
        /// Maximum allowed side length in pixels.
        max: u64,
    },

    /// Any other failure reported by the symbol builder.
    #[error("symbol error: {0}")]
    Symbol(String),

    /// PNG serialization failure.
    #[error("image error: {0}")]
    Image(String),
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                   |
/// |-----------|-----------------|-------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request / 422         |
/// | 2000–2999 | Not Found       | 404 Not Found                 |
/// | 3000–3999 | Server          | 500 Internal Server Error     |
#[derive(Debug, thiserror::Error)]
pub enum ScanmapError {
    /// No code with the given identifier exists.
    #[error("code not found: {0}")]
    CodeNotFound(CodeIdentifier),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Symbol encoding failed; nothing was persisted.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// A map was requested for a set with no located records.
    #[error("no location data to render")]
    EmptyDataset,

    /// The store already holds a code with this identifier.
    #[error("identifier collision: {0}")]
    IdentifierCollision(CodeIdentifier),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScanmapError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Encoding(_) => 1002,
            Self::CodeNotFound(_) => 2001,
            Self::EmptyDataset => 2002,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::IdentifierCollision(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Encoding(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::CodeNotFound(_) | Self::EmptyDataset => StatusCode::NOT_FOUND,
            Self::IdentifierCollision(_) | Self::PersistenceError(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ScanmapError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
