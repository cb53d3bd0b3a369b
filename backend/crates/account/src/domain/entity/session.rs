//! Session Record
//!
//! Server-side session linking an opaque id to a user summary.
//! Lifetime is owned by the session store that creates it.

use chrono::{DateTime, TimeDelta, Utc};
use kernel::id::SessionId;

use crate::domain::entity::user::UserSummary;

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub summary: UserSummary,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Create a session expiring `ttl` from now
    pub fn new(session_id: SessionId, summary: UserSummary, ttl: TimeDelta) -> Self {
        let now = Utc::now();

        Self {
            session_id,
            summary,
            created_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// A session is dead from its expiry instant onwards
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn expires_at_ms(&self) -> i64 {
        self.expires_at.timestamp_millis()
    }
}
