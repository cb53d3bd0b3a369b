//! Session Gate
//!
//! Issues session tokens on login, checks them, and logs out.
//! Anonymous -> Authenticated (open) -> Anonymous (logout or expiry).

use std::sync::Arc;

use kernel::id::SessionId;

use crate::application::config::AccountConfig;
use crate::application::session_token::SessionToken;
use crate::domain::entity::user::UserSummary;
use crate::domain::repository::SessionStore;
use crate::error::AccountResult;

/// Outcome of a session check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Authenticated(UserSummary),
    Unauthenticated,
}

impl SessionStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated(_))
    }

    pub fn into_summary(self) -> Option<UserSummary> {
        match self {
            SessionStatus::Authenticated(summary) => Some(summary),
            SessionStatus::Unauthenticated => None,
        }
    }
}

/// Session gate over a [`SessionStore`]
pub struct SessionGate<S>
where
    S: SessionStore,
{
    session_store: Arc<S>,
    config: Arc<AccountConfig>,
}

impl<S> SessionGate<S>
where
    S: SessionStore,
{
    pub fn new(session_store: Arc<S>, config: Arc<AccountConfig>) -> Self {
        Self {
            session_store,
            config,
        }
    }

    /// Start a session for an authenticated user
    pub async fn open(&self, summary: &UserSummary) -> AccountResult<SessionToken> {
        let session_id = SessionId::new();
        self.session_store.set(&session_id, summary).await?;

        tracing::info!(
            user_id = %summary.id,
            session_id = %session_id,
            "Session opened"
        );

        Ok(SessionToken::issue(&session_id, &self.config.session_secret))
    }

    /// Resolve a token to its user
    ///
    /// Missing, malformed, forged, unknown and expired tokens are all
    /// `Unauthenticated`. Only store failures are errors.
    pub async fn check(&self, token: Option<&str>) -> AccountResult<SessionStatus> {
        let Some(session_id) = self.parse(token) else {
            return Ok(SessionStatus::Unauthenticated);
        };

        let status = match self.session_store.get(&session_id).await? {
            Some(summary) => SessionStatus::Authenticated(summary),
            None => {
                tracing::debug!(session_id = %session_id, "Session unknown or expired");
                SessionStatus::Unauthenticated
            }
        };

        Ok(status)
    }

    /// End a session. Idempotent; an unreadable token is a no-op.
    pub async fn logout(&self, token: Option<&str>) -> AccountResult<()> {
        let Some(session_id) = self.parse(token) else {
            return Ok(());
        };

        self.session_store.invalidate(&session_id).await?;

        tracing::info!(session_id = %session_id, "Session closed");
        Ok(())
    }

    fn parse(&self, token: Option<&str>) -> Option<SessionId> {
        let token = token?;
        let session_id = SessionToken::verify(token, &self.config.session_secret);
        if session_id.is_none() {
            tracing::debug!("Rejected malformed or forged session token");
        }
        session_id
    }
}
