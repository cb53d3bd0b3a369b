//! HTTP Handlers
//!
//! Every response uses the `{status, message, data}` envelope.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::response::ApiResponse;
use platform::cookie::extract_cookie;
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::{SessionGate, SessionStatus, SignInUseCase, SignUpUseCase};
use crate::domain::repository::{SessionStore, UserStore};
use crate::error::{AccountError, AccountResult};
use crate::presentation::dto::{LoginRequest, LoginUserResponse, SignUpRequest};

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountAppState<R>
where
    R: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AccountConfig>,
}

impl<R> AccountAppState<R>
where
    R: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    fn session_gate(&self) -> SessionGate<R> {
        SessionGate::new(self.repo.clone(), self.config.clone())
    }

    fn session_token(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.config.session_cookie_name)
    }
}

// ============================================================================
// Health
// ============================================================================

/// GET /api/user/health
pub async fn health() -> Json<ApiResponse<()>> {
    Json(ApiResponse::success("user service is running"))
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/user/signup
pub async fn sign_up<R>(
    State(state): State<AccountAppState<R>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AccountResult<Json<ApiResponse<()>>>
where
    R: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let input = req.into_input()?;

    SignUpUseCase::new(state.repo.clone(), state.config.clone())
        .execute(input)
        .await?;

    Ok(Json(ApiResponse::success("signup succeeded")))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/user/login
pub async fn login<R>(
    State(state): State<AccountAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AccountResult<Response>
where
    R: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let input = req.into_input()?;

    let summary = SignInUseCase::new(state.repo.clone(), state.config.clone())
        .execute(input)
        .await?;

    let token = state.session_gate().open(&summary).await?;

    let cookie = state
        .config
        .cookie_config()
        .set_cookie_header(token.as_str())
        .map_err(|e| AccountError::Internal(format!("Invalid session cookie: {e}")))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success_with(
            "login succeeded",
            LoginUserResponse::from(summary),
        )),
    )
        .into_response())
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/user/logout
///
/// Always succeeds and clears the cookie.
pub async fn logout<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
) -> AccountResult<Response>
where
    R: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let token = state.session_token(&headers);

    if let Err(e) = state.session_gate().logout(token.as_deref()).await {
        tracing::warn!(error = %e, "Session invalidation failed, clearing cookie anyway");
    }

    let cookie = state
        .config
        .cookie_config()
        .delete_cookie_header()
        .map_err(|e| AccountError::Internal(format!("Invalid session cookie: {e}")))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::<()>::success("logged out")),
    )
        .into_response())
}

// ============================================================================
// Session
// ============================================================================

/// GET /api/user/session
pub async fn session<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
) -> AccountResult<Response>
where
    R: UserStore + SessionStore + Clone + Send + Sync + 'static,
{
    let token = state.session_token(&headers);

    let response = match state.session_gate().check(token.as_deref()).await? {
        SessionStatus::Authenticated(summary) => Json(ApiResponse::success_with(
            "authenticated user",
            LoginUserResponse::from(summary),
        ))
        .into_response(),
        SessionStatus::Unauthenticated => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error("login required")),
        )
            .into_response(),
    };

    Ok(response)
}
