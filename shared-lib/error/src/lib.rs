//! Common error types for the media catalog backend.
//!
//! Every rejection produced at the request boundary is one of the variants
//! below, and each one maps to a distinct [`ErrorResponse`] code so clients
//! (media players in particular) can tell a bad token from a bad range.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    /// Bad signature, malformed payload and expiry all collapse into this.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token creation failed")]
    TokenCreationFailed,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Forbidden")]
    Forbidden,
}

/// Errors raised while resolving or reading a media resource.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media resource not found")]
    NotFound,

    /// `length` is the resource length when it is known.
    #[error("Requested range not satisfiable")]
    RangeNotSatisfiable { length: Option<u64> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error response.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<&AuthError> for ErrorResponse {
    fn from(err: &AuthError) -> Self {
        let (code, message) = match err {
            AuthError::InvalidCredentials => ("AUTH_INVALID_CREDENTIALS", "Invalid email or password"),
            AuthError::AccountDeactivated => ("AUTH_ACCOUNT_DEACTIVATED", "Account is deactivated"),
            AuthError::InvalidToken => ("AUTH_INVALID_TOKEN", "Invalid or expired token"),
            AuthError::TokenCreationFailed => ("AUTH_TOKEN_CREATION_FAILED", "Failed to create token"),
            AuthError::UnknownRole(_) => ("AUTH_UNKNOWN_ROLE", "Unknown role"),
            AuthError::Forbidden => ("AUTH_FORBIDDEN", "Access forbidden"),
        };
        Self::new(code, message)
    }
}

impl From<&MediaError> for ErrorResponse {
    fn from(err: &MediaError) -> Self {
        let (code, message) = match err {
            MediaError::NotFound => ("MEDIA_NOT_FOUND", "Media resource not found"),
            MediaError::RangeNotSatisfiable { .. } => {
                ("MEDIA_RANGE_NOT_SATISFIABLE", "Requested range not satisfiable")
            }
            MediaError::Io(_) => ("MEDIA_IO", "Failed to read media resource"),
        };
        Self::new(code, message)
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        match err {
            AppError::Auth(e) => e.into(),
            AppError::Media(e) => e.into(),
            AppError::Validation(msg) => Self::new("VALIDATION_FAILED", msg.clone()),
            AppError::NotFound(msg) => Self::new("NOT_FOUND", msg.clone()),
            AppError::Conflict(msg) => Self::new("CONFLICT", msg.clone()),
            AppError::Internal(_) => {
                // Internal details stay in the logs.
                tracing::debug!("masking internal error in response body");
                Self::new("INTERNAL", "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_and_authz_codes_differ() {
        let authn = ErrorResponse::from(&AuthError::InvalidToken);
        let authz = ErrorResponse::from(&AuthError::Forbidden);
        assert_ne!(authn.code, authz.code);
    }

    #[test]
    fn test_internal_details_are_masked() {
        let err = AppError::Internal("disk on fire at /var/data".to_string());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, "INTERNAL");
        assert!(!body.message.contains("/var/data"));
    }

    #[test]
    fn test_details_are_skipped_when_absent() {
        let json = serde_json::to_string(&ErrorResponse::new("X", "y")).unwrap();
        assert!(!json.contains("details"));

        let json = serde_json::to_string(&ErrorResponse::new("X", "y").with_details("z")).unwrap();
        assert!(json.contains("\"details\":\"z\""));
    }
}
