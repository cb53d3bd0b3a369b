//! Store Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.

use kernel::id::SessionId;

use crate::domain::entity::user::{NewUser, User, UserSummary};
use crate::domain::value_object::email::Email;
use crate::error::AccountResult;

/// User store trait
#[trait_variant::make(UserStore: Send)]
pub trait LocalUserStore {
    /// Check if an account with this email exists
    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool>;

    /// Find user by email
    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>>;

    /// Persist a new user, assigning id and timestamps
    ///
    /// Fails with `DuplicateAccount` when the email is taken, even if a
    /// concurrent save won the race after an `exists_by_email` check.
    async fn save(&self, user: NewUser) -> AccountResult<User>;

    /// Overwrite a stored user
    async fn update(&self, user: &User) -> AccountResult<()>;
}

/// Session store trait
///
/// Expiry policy belongs to the store: `get` never returns an expired
/// session.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Store a session
    async fn set(&self, session_id: &SessionId, summary: &UserSummary) -> AccountResult<()>;

    /// Find a live session
    async fn get(&self, session_id: &SessionId) -> AccountResult<Option<UserSummary>>;

    /// Delete a session. Deleting a missing session is not an error.
    async fn invalidate(&self, session_id: &SessionId) -> AccountResult<()>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AccountResult<u64>;
}
