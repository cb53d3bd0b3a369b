//! Account Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::repository::{SessionStore, UserStore};
use crate::infra::postgres::PgAccountStore;
use crate::presentation::handlers::{self, AccountAppState};

/// Create the Account router with the PostgreSQL store
pub fn account_router(repo: PgAccountStore, config: AccountConfig) -> Router {
    account_router_generic(repo, config)
}

/// Create a generic Account router for any store implementation
pub fn account_router_generic<R>(repo: R, config: AccountConfig) -> Router
where
    R: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let state = AccountAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/signup", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/session", get(handlers::session::<R>))
        .with_state(state)
}
