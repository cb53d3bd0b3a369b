//! Nickname Value Object

use serde::{Deserialize, Serialize};

use crate::error::{AccountError, AccountResult};

/// Maximum nickname length in characters
pub const NICKNAME_MAX_LENGTH: usize = 100;

/// Display name chosen at signup. Not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nickname(String);

impl Nickname {
    pub fn new(nickname: impl AsRef<str>) -> AccountResult<Self> {
        let nickname = nickname.as_ref().trim();

        if nickname.is_empty() {
            return Err(AccountError::validation("nick_name", "nick_name is required"));
        }

        if nickname.chars().count() > NICKNAME_MAX_LENGTH {
            return Err(AccountError::validation(
                "nick_name",
                format!("nick_name must be at most {NICKNAME_MAX_LENGTH} characters"),
            ));
        }

        Ok(Self(nickname.to_string()))
    }

    pub fn from_db(nickname: impl Into<String>) -> Self {
        Self(nickname.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Nickname {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
