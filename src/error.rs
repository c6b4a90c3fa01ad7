// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system. The
//! taxonomy follows what a caller can do about a failure: fix the input,
//! fix the credentials, wait, or give up on one entry while keeping the rest.

use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the domain vocabulary is encoded in the type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded — back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Validation error: {0}")]
    Validation(#[from] crate::types::ValidationError),

    #[error("Notion rejected the credentials ({status} {code}): {message}")]
    UpstreamAuth {
        status: u16,
        code: NotionErrorCode,
        message: String,
    },

    #[error("Notion rate limit hit: {message}")]
    UpstreamRateLimited {
        retry_after: Option<Duration>,
        message: String,
    },

    #[error("Rate limit retries exhausted after {attempts} attempts (cursor: {})", .cursor.as_deref().unwrap_or("start"))]
    RateLimitExceeded {
        /// Cursor of the page that could not be fetched; `None` is the first page.
        cursor: Option<String>,
        attempts: u32,
    },

    #[error("Notion server error ({status} {code}): {message}")]
    UpstreamServer {
        status: u16,
        code: NotionErrorCode,
        message: String,
    },

    #[error("Notion rejected the request ({status} {code}): {message}")]
    UpstreamBadRequest {
        status: u16,
        code: NotionErrorCode,
        message: String,
    },

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Deadline exceeded during {stage}")]
    DeadlineExceeded { stage: &'static str },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl AppError {
    /// Whether waiting and retrying the same request may succeed.
    ///
    /// Rate limits are handled separately because they carry their own wait.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::UpstreamServer { .. } => true,
            AppError::NetworkFailure(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// HTTP-equivalent status reported to callers of the service surface.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::UpstreamAuth { status, .. } => *status,
            AppError::UpstreamRateLimited { .. } | AppError::RateLimitExceeded { .. } => 429,
            AppError::UpstreamBadRequest { status, .. } => *status,
            AppError::UpstreamServer { .. }
            | AppError::NetworkFailure(_)
            | AppError::MalformedResponse(_) => 502,
            AppError::DeadlineExceeded { .. } => 504,
            AppError::MissingConfiguration(_) | AppError::Io(_) | AppError::InternalError { .. } => {
                500
            }
        }
    }
}

/// Error body returned by the Notion API.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Classifies a non-success response into the error taxonomy.
///
/// This is a pure function: status, optional `Retry-After`, and body in,
/// one error variant out. Unparseable bodies fall back to the status code.
pub fn classify_upstream_failure(status: u16, retry_after: Option<Duration>, body: &str) -> AppError {
    let (code, message) = match serde_json::from_str::<NotionErrorBody>(body) {
        Ok(parsed) if !parsed.code.is_empty() => {
            (NotionErrorCode::from_api_response(&parsed.code), parsed.message)
        }
        _ => (
            NotionErrorCode::from_http_status(status),
            preview_body(body),
        ),
    };

    match status {
        401 | 403 => AppError::UpstreamAuth {
            status,
            code,
            message,
        },
        429 => AppError::UpstreamRateLimited {
            retry_after,
            message,
        },
        500..=599 => AppError::UpstreamServer {
            status,
            code,
            message,
        },
        _ => AppError::UpstreamBadRequest {
            status,
            code,
            message,
        },
    }
}

fn preview_body(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
