//! Email Value Object
//!
//! Represents a validated, lower-cased email address. Email is the login
//! identifier and is unique per account.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AccountError, AccountResult};

/// Maximum email length (column width)
pub const EMAIL_MAX_LENGTH: usize = 255;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Create a new email with validation
    ///
    /// Input is trimmed and lower-cased before checking.
    pub fn new(email: impl AsRef<str>) -> AccountResult<Self> {
        let email = email.as_ref().trim().to_lowercase();

        if email.is_empty() {
            return Err(AccountError::validation("email", "email is required"));
        }

        if email.chars().count() > EMAIL_MAX_LENGTH {
            return Err(AccountError::validation(
                "email",
                format!("email must be at most {EMAIL_MAX_LENGTH} characters"),
            ));
        }

        if !Self::is_valid_format(&email) {
            return Err(AccountError::validation("email", "email format is invalid"));
        }

        Ok(Self(email))
    }

    /// Basic `local@domain.tld` shape check
    ///
    /// The local part is any non-blank run without '@'; the domain is at
    /// least two dot-separated ASCII labels that neither start nor end
    /// with a hyphen.
    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        let local_ok = (1..=64).contains(&local.len()) && !local.contains(char::is_whitespace);

        let labels: Vec<&str> = domain.split('.').collect();
        let domain_ok = labels.len() >= 2
            && labels.iter().all(|label| {
                !label.is_empty()
                    && !label.starts_with('-')
                    && !label.ends_with('-')
                    && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            });

        local_ok && domain_ok
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl FromStr for Email {
    type Err = AccountError;

    fn from_str(s: &str) -> AccountResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
