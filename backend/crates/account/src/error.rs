//! Account Error Types
//!
//! Account-specific error variants that render through the unified
//! `kernel::error::AppError` system.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Message shared by every authentication failure
pub const AUTH_FAILURE_MESSAGE: &str = "invalid email or password";

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// Missing or malformed input field
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Email already registered
    #[error("Email already registered")]
    DuplicateAccount,

    /// No user with the given email
    #[error("Account not found")]
    AccountNotFound,

    /// Wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Store failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal error (hashing, configuration)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AccountError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::Validation { .. } => ErrorKind::BadRequest,
            AccountError::DuplicateAccount => ErrorKind::Conflict,
            AccountError::AccountNotFound | AccountError::InvalidCredentials => {
                ErrorKind::Unauthorized
            }
            AccountError::Persistence(_) | AccountError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Authentication failures share one message, and server errors never
    /// expose their details.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AccountError::Validation { message, .. } => AppError::bad_request(message.clone()),
            AccountError::DuplicateAccount => AppError::conflict("email already registered"),
            AccountError::AccountNotFound | AccountError::InvalidCredentials => {
                AppError::unauthorized(AUTH_FAILURE_MESSAGE)
            }
            AccountError::Persistence(_) | AccountError::Internal(_) => {
                AppError::internal("internal server error")
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::Persistence(msg) => {
                tracing::error!(message = %msg, "Account persistence error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::AccountNotFound => {
                tracing::warn!("Login attempt for unknown account");
            }
            AccountError::InvalidCredentials => {
                tracing::warn!("Login attempt with wrong password");
            }
            AccountError::Validation { field, message } => {
                tracing::debug!(field = %field, message = %message, "Validation failed");
            }
            AccountError::DuplicateAccount => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AccountError::DuplicateAccount;
            }
        }
        AccountError::Persistence(err.to_string())
    }
}

impl From<PasswordHashError> for AccountError {
    fn from(err: PasswordHashError) -> Self {
        AccountError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AccountError {
    fn from(rejection: JsonRejection) -> Self {
        AccountError::validation("body", rejection.body_text())
    }
}
