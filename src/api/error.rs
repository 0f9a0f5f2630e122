//! API error types for the TaaS REST API client.

use std::fmt;

use thiserror::Error;

use crate::shared::{ValidationError, ValidationErrors};

/// API-specific error type for the TaaS REST API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP/network error from reqwest
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request rejected client-side, nothing was sent
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Missing or invalid token (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorResponse),

    /// Token lacks permission (403)
    #[error("Permission denied: {0}")]
    Forbidden(ErrorResponse),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(ErrorResponse),

    /// Invalid request parameters (400)
    #[error("Bad request: {0}")]
    BadRequest(ErrorResponse),

    /// Resource already exists (409)
    #[error("Conflict: {0}")]
    Conflict(ErrorResponse),

    /// Too many requests (429)
    #[error("Rate limited: {0}")]
    RateLimited(ErrorResponse),

    /// Server-side error (5xx)
    #[error("Server error {status}: {response}")]
    ServerError { status: u16, response: ErrorResponse },

    /// Unexpected HTTP status code
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, ErrorResponse),

    /// Response body was not the expected JSON
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Request could not be encoded
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Invalid parameter or client configuration
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// HTTP status of a non-2xx response, `None` for local errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::BadRequest(_) => Some(400),
            Self::Conflict(_) => Some(409),
            Self::RateLimited(_) => Some(429),
            Self::ServerError { status, .. } => Some(*status),
            Self::UnexpectedStatus(status, _) => Some(*status),
            #[cfg(feature = "http")]
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Body of a non-2xx response.
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            Self::Unauthorized(r)
            | Self::Forbidden(r)
            | Self::NotFound(r)
            | Self::BadRequest(r)
            | Self::Conflict(r)
            | Self::RateLimited(r)
            | Self::UnexpectedStatus(_, r) => Some(r),
            Self::ServerError { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Whether the request was rejected before reaching the network.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.0)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for ApiError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response format from the API.
///
/// The service answers either `{"detail": "..."}`, `{"error": "..."}` or
/// `{"message": ..., "details": ...}`; anything else is kept as raw text.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct ErrorResponse {
    /// Error status (usually "error")
    #[serde(default)]
    pub status: Option<String>,
    /// Human-readable error message
    #[serde(default, alias = "error")]
    pub message: Option<String>,
    /// Additional error details
    #[serde(default, alias = "detail")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Wrap a non-JSON (or unrecognized JSON) body.
    pub fn from_text(text: String) -> Self {
        Self {
            status: None,
            message: Some(text),
            details: None,
        }
    }

    /// Parse a response body, falling back to the raw text.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) if parsed.message.is_some() || parsed.details.is_some() => parsed,
            _ => Self::from_text(body.to_string()),
        }
    }

    /// Get the error message, preferring `message` over `details`.
    pub fn get_message(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.details.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.details) {
            (Some(message), Some(details)) => write!(f, "{}: {}", message, details),
            _ => f.write_str(&self.get_message()),
        }
    }
}
