use serde::{Deserialize, Serialize};
use std::fmt;

/// Role attribute stored on every account. Not enforced anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Persisted code
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::User => "ROLE_USER",
            UserRole::Admin => "ROLE_ADMIN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ROLE_USER" => Some(UserRole::User),
            "ROLE_ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_code() {
        assert_eq!(UserRole::from_code("ROLE_USER"), Some(UserRole::User));
        assert_eq!(UserRole::from_code("ROLE_ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_code("admin"), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::User.to_string(), "ROLE_USER");
        assert_eq!(UserRole::Admin.to_string(), "ROLE_ADMIN");
    }

    #[test]
    fn test_default_role() {
        assert_eq!(UserRole::default(), UserRole::User);
    }
}
