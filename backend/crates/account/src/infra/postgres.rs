//! PostgreSQL Store Implementations

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use kernel::id::{SessionId, UserId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    session::SessionRecord,
    user::{NewUser, User, UserSummary},
};
use crate::domain::repository::{SessionStore, UserStore};
use crate::domain::value_object::{
    email::Email, nickname::Nickname, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AccountError, AccountResult};

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
    session_ttl: TimeDelta,
}

impl PgAccountStore {
    pub fn new(pool: PgPool, session_ttl: Duration) -> Self {
        Self {
            pool,
            session_ttl: TimeDelta::from_std(session_ttl).unwrap_or(TimeDelta::MAX),
        }
    }
}

// ============================================================================
// User Store Implementation
// ============================================================================

impl UserStore for PgAccountStore {
    async fn exists_by_email(&self, email: &Email) -> AccountResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id,
                email,
                password_hash,
                nickname,
                role,
                is_active,
                last_login_at,
                created_at,
                updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn save(&self, user: NewUser) -> AccountResult<User> {
        let user = user.into_user(UserId::new(), Utc::now());

        // Unique index on email turns a lost race into DuplicateAccount
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                email,
                password_hash,
                nickname,
                role,
                is_active,
                last_login_at,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.nickname.as_str())
        .bind(user.role.code())
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> AccountResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                password_hash = $3,
                nickname = $4,
                role = $5,
                is_active = $6,
                last_login_at = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.nickname.as_str())
        .bind(user.role.code())
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AccountError::Persistence(format!(
                "user {} does not exist",
                user.id
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Session Store Implementation
// ============================================================================

impl SessionStore for PgAccountStore {
    async fn set(&self, session_id: &SessionId, summary: &UserSummary) -> AccountResult<()> {
        let record = SessionRecord::new(*session_id, summary.clone(), self.session_ttl);

        sqlx::query(
            r#"
            INSERT INTO user_sessions (
                session_id,
                user_id,
                created_at,
                expires_at_ms
            ) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.session_id.as_uuid())
        .bind(record.summary.id.as_uuid())
        .bind(record.created_at)
        .bind(record.expires_at_ms())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, session_id: &SessionId) -> AccountResult<Option<UserSummary>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionUserRow>(
            r#"
            SELECT
                u.id,
                u.email,
                u.nickname
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.session_id = $1 AND s.expires_at_ms > $2
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_none() {
            // Drop the row if it exists but has expired
            sqlx::query(
                "DELETE FROM user_sessions WHERE session_id = $1 AND expires_at_ms <= $2",
            )
            .bind(session_id.as_uuid())
            .bind(now_ms)
            .execute(&self.pool)
            .await?;
        }

        Ok(row.map(SessionUserRow::into_summary))
    }

    async fn invalidate(&self, session_id: &SessionId) -> AccountResult<()> {
        sqlx::query("DELETE FROM user_sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AccountResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM user_sessions WHERE expires_at_ms <= $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    nickname: String,
    role: String,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AccountResult<User> {
        let role = UserRole::from_code(&self.role).ok_or_else(|| {
            AccountError::Persistence(format!("Invalid role code: {}", self.role))
        })?;

        Ok(User {
            id: UserId::from_uuid(self.id),
            email: Email::from_db(self.email),
            password_hash: UserPassword::from_db(self.password_hash),
            nickname: Nickname::from_db(self.nickname),
            role,
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionUserRow {
    id: Uuid,
    email: String,
    nickname: String,
}

impl SessionUserRow {
    fn into_summary(self) -> UserSummary {
        UserSummary {
            id: UserId::from_uuid(self.id),
            email: Email::from_db(self.email),
            nickname: Nickname::from_db(self.nickname),
        }
    }
}
