//! Error types for tallysheet.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Notification already resolved: {0}")]
    AlreadyResolved(String),

    #[error("No votes submitted")]
    NoVotesSubmitted,

    #[error("No opinion submitted")]
    NoOpinionSubmitted,

    // === Data Integrity Faults ===
    #[error("Subject missing for notification: {0}")]
    MissingSubject(String),

    #[error("Unsupported notification type: {0}")]
    UnsupportedType(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidArgument(_)
            | Self::Validation(_)
            | Self::NoVotesSubmitted
            | Self::NoOpinionSubmitted => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) | Self::AlreadyResolved(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::MissingSubject(_)
            | Self::UnsupportedType(_)
            | Self::Database(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict(_) => "CONFLICT",
            Self::AlreadyResolved(_) => "ALREADY_RESOLVED",
            Self::NoVotesSubmitted => "NO_VOTES_SUBMITTED",
            Self::NoOpinionSubmitted => "NO_OPINION_SUBMITTED",
            Self::MissingSubject(_) => "MISSING_SUBJECT",
            Self::UnsupportedType(_) => "UNSUPPORTED_TYPE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(
            AppError::NotFound("sheet".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NoVotesSubmitted.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NoOpinionSubmitted.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AlreadyResolved("n1".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_integrity_faults_are_server_errors() {
        assert!(AppError::MissingSubject("n1".into()).is_server_error());
        assert!(AppError::UnsupportedType("bogus".into()).is_server_error());
        assert!(!AppError::NoVotesSubmitted.is_server_error());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::NoVotesSubmitted.error_code(), "NO_VOTES_SUBMITTED");
        assert_eq!(
            AppError::AlreadyResolved("n1".into()).error_code(),
            "ALREADY_RESOLVED"
        );
        assert_eq!(
            AppError::InvalidArgument("bad id".into()).error_code(),
            "INVALID_ARGUMENT"
        );
    }
}
