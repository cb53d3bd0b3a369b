//! Sign In Use Case
//!
//! Verifies credentials. Opening a session is left to the session gate.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::entity::user::UserSummary;
use crate::domain::repository::UserStore;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AccountError, AccountResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserStore,
{
    user_store: Arc<U>,
    config: Arc<AccountConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserStore,
{
    pub fn new(user_store: Arc<U>, config: Arc<AccountConfig>) -> Self {
        Self { user_store, config }
    }

    /// On success records the login time and upgrades an outdated digest.
    pub async fn execute(&self, input: SignInInput) -> AccountResult<UserSummary> {
        let raw_password = RawPassword::new(input.password).ok();

        // An email that cannot be stored cannot belong to an account
        let user = match Email::new(&input.email) {
            Ok(email) => self.user_store.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(mut user) = user else {
            if let Some(raw_password) = &raw_password {
                self.spend_hash_cost(raw_password);
            }
            return Err(AccountError::AccountNotFound);
        };

        let raw_password = raw_password.ok_or(AccountError::InvalidCredentials)?;

        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        if user.password_hash.needs_rehash(&self.config.hash_cost) {
            let rehashed = UserPassword::from_raw(
                &raw_password,
                &self.config.hash_cost,
                self.config.pepper(),
            )?;
            user.set_password_hash(rehashed);
            tracing::info!(user_id = %user.id, "Password digest upgraded to current cost");
        }

        user.record_login();
        self.user_store.update(&user).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User signed in");

        Ok(UserSummary::from(&user))
    }

    /// One Argon2 run at the configured cost, result discarded.
    /// Unknown emails take as long to reject as wrong passwords.
    fn spend_hash_cost(&self, raw_password: &RawPassword) {
        let _ = UserPassword::from_raw(raw_password, &self.config.hash_cost, self.config.pepper());
    }
}
