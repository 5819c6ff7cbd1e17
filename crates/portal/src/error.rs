//! Unified error handling at the HTTP boundary.
//!
//! Provides a unified `AppError` type; route handlers return
//! `Result<T, AppError>`. Form posts usually catch `AccountError` themselves
//! and redirect back with a message query parameter - this type is the
//! fallback for everything else.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::services::account::AccountError;

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend gateway operation failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Account operation failed.
    #[error("Account error: {0}")]
    Account(#[from] AccountError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Gateway(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = match &self {
            Self::Gateway(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Account(err) => match err {
                AccountError::NoAccount | AccountError::InvalidCredential => {
                    StatusCode::UNAUTHORIZED
                }
                AccountError::DuplicateAccount { .. } => StatusCode::CONFLICT,
                AccountError::InvalidEmail(_) | AccountError::IdentityCreationFailed(_) => {
                    StatusCode::BAD_REQUEST
                }
                AccountError::EmailNotFound => StatusCode::NOT_FOUND,
                AccountError::UnknownRole(_) => StatusCode::FORBIDDEN,
                AccountError::ProfileWriteFailed { .. } | AccountError::Gateway(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Gateway(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Account(err) => match err {
                AccountError::NoAccount => {
                    "No account found with this email. Please register first.".to_string()
                }
                AccountError::InvalidCredential => "Invalid credentials".to_string(),
                AccountError::DuplicateAccount { existing_role } => {
                    format!("This email is already registered as \"{existing_role}\"")
                }
                AccountError::InvalidEmail(_) => "Invalid email address".to_string(),
                AccountError::IdentityCreationFailed(msg) => msg.clone(),
                AccountError::EmailNotFound => "Email not found".to_string(),
                AccountError::UnknownRole(role) => {
                    format!("Unknown role: {role}. Contact support.")
                }
                AccountError::ProfileWriteFailed { .. } | AccountError::Gateway(_) => {
                    "Internal server error".to_string()
                }
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    use galleria_core::Role;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("shop-123".to_string());
        assert_eq!(err.to_string(), "Not found: shop-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_account_error_status_codes() {
        assert_eq!(
            get_status(AppError::Account(AccountError::NoAccount)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Account(AccountError::DuplicateAccount {
                existing_role: Role::User
            })),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Account(AccountError::UnknownRole(
                "moderator".to_string()
            ))),
            StatusCode::FORBIDDEN
        );
    }
}
