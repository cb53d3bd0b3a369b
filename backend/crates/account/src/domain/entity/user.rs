//! User Entity
//!
//! Persisted account record plus its unsaved and summary shapes.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, nickname::Nickname, user_password::UserPassword, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Server-generated UUID
    pub id: UserId,
    /// Unique login identifier
    pub email: Email,
    /// Argon2id PHC string, never the plaintext
    pub password_hash: UserPassword,
    pub nickname: Nickname,
    pub role: UserRole,
    pub is_active: bool,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Replace the stored digest (rehash on login)
    pub fn set_password_hash(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

/// A user that has not been stored yet
///
/// The store assigns `id` and timestamps on save.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: UserPassword,
    pub nickname: Nickname,
    pub role: UserRole,
    pub is_active: bool,
}

impl NewUser {
    /// Active account with the default role
    pub fn new(email: Email, password_hash: UserPassword, nickname: Nickname) -> Self {
        Self {
            email,
            password_hash,
            nickname,
            role: UserRole::default(),
            is_active: true,
        }
    }

    pub fn into_user(self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            nickname: self.nickname,
            role: self.role,
            is_active: self.is_active,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Authenticated-user summary handed to the session layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub email: Email,
    pub nickname: Nickname,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
        }
    }
}
