//! Account Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, store traits
//! - `application/` - Use cases and the session gate
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Signup with email + password + nickname
//! - Login with email + password
//! - Server-side sessions referenced by a signed cookie token
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, outdated digests upgraded on login
//! - Unknown email and wrong password are indistinguishable to the caller
//! - Session tokens are HMAC-signed; forged tokens never reach the store

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AccountConfig;
pub use error::{AccountError, AccountResult};
pub use infra::{memory::InMemoryAccountStore, postgres::PgAccountStore};
pub use presentation::router::{account_router, account_router_generic};

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::{session::*, user::*};
    pub use crate::domain::value_object::{
        email::*, nickname::*, user_password::*, user_role::*,
    };
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::{SessionStore, UserStore};
    pub use crate::infra::{InMemoryAccountStore, PgAccountStore};
}
