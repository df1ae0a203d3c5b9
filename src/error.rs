#[cfg(feature = "web")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Main error type for the application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// I/O errors (catalog file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The embedding model is not initialized (missing or broken weights).
    ///
    /// Fatal for search and ingestion, non-fatal for catalog browsing.
    #[error("Encoding unavailable: {0}")]
    EncodingUnavailable(String),

    /// The supplied image could not be decoded or converted to RGB
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Fetching an image URL failed (network error, timeout, non-2xx)
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// An embedding with the wrong length was offered to the catalog
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The catalog's fixed embedding length.
        expected: usize,
        /// The length of the rejected vector.
        actual: usize,
    },

    /// Out-of-range search or ingestion parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation errors on record metadata
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upload errors
    #[error("Upload error: {0}")]
    UploadError(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code (HTTP status code)
    pub code: u16,
    /// Error message
    pub message: String,
    /// Optional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    #[cfg(feature = "web")]
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidImage(_) => StatusCode::BAD_REQUEST,
            Self::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Self::DimensionMismatch { .. } => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UploadError(_) => StatusCode::BAD_REQUEST,
            Self::SourceUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            // Distinct from an empty result list so callers can show a
            // degraded-service message instead of "no similar products".
            Self::EncodingUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert the error to a JSON response body
    pub fn to_json(&self) -> ErrorResponse {
        #[cfg(feature = "web")]
        let code = self.status_code().as_u16();
        #[cfg(not(feature = "web"))]
        let code = 500u16;

        ErrorResponse {
            code,
            message: self.to_string(),
            details: None,
        }
    }
}

#[cfg(feature = "web")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let response = self.to_json();

        (status, Json(response)).into_response()
    }
}

// Implement From for common error types
#[cfg(feature = "web")]
impl From<axum::BoxError> for AppError {
    fn from(err: axum::BoxError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Task join error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(feature = "web")]
impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::UploadError(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::InvalidImage(err.to_string())
    }
}

#[cfg(feature = "embeddings")]
impl From<tch::TchError> for AppError {
    fn from(err: tch::TchError) -> Self {
        AppError::Internal(format!("Torch error: {}", err))
    }
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Extension trait for working with Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| AppError::Internal(format!("{}: {}", context, e)))
    }
}
