//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{SignInInput, SignUpInput};
use crate::domain::entity::user::UserSummary;
use crate::error::{AccountError, AccountResult};

fn missing(field: &'static str) -> AccountError {
    AccountError::validation(field, format!("{field} is required"))
}

/// Blank and absent values are both "missing".
fn required(value: Option<String>, field: &'static str) -> AccountResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(missing(field)),
    }
}

/// Passwords are taken byte-for-byte; only absent or empty is "missing".
fn required_password(value: Option<String>) -> AccountResult<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(missing("password")),
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /signup body
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "nickname")]
    pub nick_name: Option<String>,
}

impl SignUpRequest {
    /// Check required fields, in wire order
    pub fn into_input(self) -> AccountResult<SignUpInput> {
        Ok(SignUpInput {
            email: required(self.email, "email")?,
            password: required_password(self.password)?,
            nickname: required(self.nick_name, "nick_name")?,
        })
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /login body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn into_input(self) -> AccountResult<SignInInput> {
        Ok(SignInInput {
            email: required(self.email, "email")?,
            password: required_password(self.password)?,
        })
    }
}

/// Logged-in user, as returned by /login and /session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginUserResponse {
    pub id: Uuid,
    pub email: String,
    pub nick_name: String,
}

impl From<UserSummary> for LoginUserResponse {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id.into_uuid(),
            email: summary.email.into_db(),
            nick_name: summary.nickname.into_db(),
        }
    }
}
