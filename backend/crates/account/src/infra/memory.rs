//! In-Memory Store Implementations
//!
//! Used for local runs without a database and in tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use kernel::id::{SessionId, UserId};
use tokio::sync::RwLock;

use crate::domain::entity::{
    session::SessionRecord,
    user::{NewUser, User, UserSummary},
};
use crate::domain::repository::{SessionStore, UserStore};
use crate::domain::value_object::email::Email;
use crate::error::{AccountError, AccountResult};

/// Process-local account store
///
/// Clones share the same maps.
#[derive(Clone)]
pub struct InMemoryAccountStore {
    users: Arc<RwLock<HashMap<Email, User>>>,
    sessions: Arc<RwLock<HashMap<SessionId, SessionRecord>>>,
    session_ttl: TimeDelta,
}

impl InMemoryAccountStore {
    pub fn new(session_ttl: Duration) -> Self {
        Self {
            users: Arc::default(),
            sessions: Arc::default(),
            session_ttl: TimeDelta::from_std(session_ttl).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Number of stored sessions, expired ones included
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

// ============================================================================
// User Store Implementation
// ============================================================================

impl UserStore for InMemoryAccountStore {
    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool> {
        Ok(self.users.read().await.contains_key(email))
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn save(&self, user: NewUser) -> AccountResult<User> {
        // Check and insert under one write lock
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(AccountError::DuplicateAccount);
        }

        let user = user.into_user(UserId::new(), Utc::now());
        users.insert(user.email.clone(), user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> AccountResult<()> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.email) {
            Some(stored) if stored.id == user.id => {
                *stored = user.clone();
                Ok(())
            }
            _ => Err(AccountError::Persistence(format!(
                "user {} does not exist",
                user.id
            ))),
        }
    }
}

// ============================================================================
// Session Store Implementation
// ============================================================================

impl SessionStore for InMemoryAccountStore {
    async fn set(&self, session_id: &SessionId, summary: &UserSummary) -> AccountResult<()> {
        let record = SessionRecord::new(*session_id, summary.clone(), self.session_ttl);
        self.sessions.write().await.insert(*session_id, record);
        Ok(())
    }

    async fn get(&self, session_id: &SessionId) -> AccountResult<Option<UserSummary>> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(session_id) {
            Some(record) if record.is_expired() => {
                sessions.remove(session_id);
                Ok(None)
            }
            Some(record) => Ok(Some(record.summary.clone())),
            None => Ok(None),
        }
    }

    async fn invalidate(&self, session_id: &SessionId) -> AccountResult<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> AccountResult<u64> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired_at(now));
        let deleted = (before - sessions.len()) as u64;

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}
