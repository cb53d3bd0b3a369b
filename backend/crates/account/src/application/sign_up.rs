//! Sign Up Use Case
//!
//! Creates a new user account.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserStore;
use crate::domain::value_object::{
    email::Email,
    nickname::Nickname,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AccountError, AccountResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub nickname: String,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserStore,
{
    user_store: Arc<U>,
    config: Arc<AccountConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserStore,
{
    pub fn new(user_store: Arc<U>, config: Arc<AccountConfig>) -> Self {
        Self { user_store, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AccountResult<User> {
        let email = Email::new(&input.email)?;
        let nickname = Nickname::new(&input.nickname)?;
        let raw_password = RawPassword::new(input.password)?;

        if self.user_store.exists_by_email(&email).await? {
            tracing::debug!(email = %email, "Signup rejected, email taken");
            return Err(AccountError::DuplicateAccount);
        }

        let password_hash =
            UserPassword::from_raw(&raw_password, &self.config.hash_cost, self.config.pepper())?;

        // A concurrent signup can still win here; the store reports it as DuplicateAccount
        let user = self
            .user_store
            .save(NewUser::new(email, password_hash, nickname))
            .await?;

        tracing::info!(
            user_id = %user.id,
            email = %user.email,
            "User signed up"
        );

        Ok(user)
    }
}
