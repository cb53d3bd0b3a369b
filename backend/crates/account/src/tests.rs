//! Crate-level tests: use cases, session gate, and the HTTP surface
//! against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use platform::password::HashCost;

use crate::application::config::AccountConfig;
use crate::infra::memory::InMemoryAccountStore;

fn test_config() -> AccountConfig {
    AccountConfig {
        hash_cost: HashCost::minimal(),
        ..AccountConfig::development()
    }
}

fn test_store() -> InMemoryAccountStore {
    InMemoryAccountStore::new(Duration::from_secs(60))
}

mod use_case_tests {
    use super::*;
    use crate::application::{SignInInput, SignInUseCase, SignUpInput, SignUpUseCase};
    use crate::domain::repository::UserStore;
    use crate::domain::value_object::{email::Email, user_password::UserPassword};
    use crate::error::AccountError;

    fn sign_up_input(email: &str, password: &str, nickname: &str) -> SignUpInput {
        SignUpInput {
            email: email.to_string(),
            password: password.to_string(),
            nickname: nickname.to_string(),
        }
    }

    fn sign_in_input(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login_scenario() {
        let store = Arc::new(test_store());
        let config = Arc::new(test_config());
        let sign_up = SignUpUseCase::new(store.clone(), config.clone());
        let sign_in = SignInUseCase::new(store.clone(), config.clone());

        let user = sign_up
            .execute(sign_up_input("a@x.com", "pw1", "Al"))
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "a@x.com");

        let summary = sign_in
            .execute(sign_in_input("a@x.com", "pw1"))
            .await
            .unwrap();
        assert_eq!(summary.id, user.id);
        assert_eq!(summary.email.as_str(), "a@x.com");
        assert_eq!(summary.nickname.as_str(), "Al");

        let err = sign_in
            .execute(sign_in_input("a@x.com", "wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_signup_stores_hash_not_plaintext() {
        let store = Arc::new(test_store());
        let sign_up = SignUpUseCase::new(store.clone(), Arc::new(test_config()));

        let user = sign_up
            .execute(sign_up_input("a@x.com", "pw1", "Al"))
            .await
            .unwrap();

        assert_ne!(user.password_hash.as_str(), "pw1");
        assert!(user.password_hash.as_str().starts_with("$argon2id$"));
        assert_eq!(user.role, crate::domain::value_object::user_role::UserRole::User);
        assert!(user.is_active);
        assert!(user.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_signup_normalizes_email() {
        let store = Arc::new(test_store());
        let config = Arc::new(test_config());
        SignUpUseCase::new(store.clone(), config.clone())
            .execute(sign_up_input("  A@X.com ", "pw1", "Al"))
            .await
            .unwrap();

        let summary = SignInUseCase::new(store, config)
            .execute(sign_in_input("a@x.com", "pw1"))
            .await
            .unwrap();
        assert_eq!(summary.email.as_str(), "a@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_signup() {
        let store = Arc::new(test_store());
        let sign_up = SignUpUseCase::new(store.clone(), Arc::new(test_config()));

        sign_up
            .execute(sign_up_input("a@x.com", "pw1", "Al"))
            .await
            .unwrap();
        let err = sign_up
            .execute(sign_up_input("a@x.com", "pw2", "Bo"))
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::DuplicateAccount));
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_signup() {
        let store = Arc::new(test_store());
        let sign_up = SignUpUseCase::new(store.clone(), Arc::new(test_config()));

        let (first, second) = tokio::join!(
            sign_up.execute(sign_up_input("a@x.com", "pw1", "Al")),
            sign_up.execute(sign_up_input("a@x.com", "pw2", "Bo")),
        );

        let results = [first, second];
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(AccountError::DuplicateAccount)))
            .count();

        assert_eq!(succeeded, 1);
        assert_eq!(duplicates, 1);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_signup_validation_happens_before_store_access() {
        let store = Arc::new(test_store());
        let sign_up = SignUpUseCase::new(store.clone(), Arc::new(test_config()));

        let err = sign_up
            .execute(sign_up_input("not-an-email", "pw1", "Al"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation { field: "email", .. }));

        let err = sign_up
            .execute(sign_up_input("a@x.com", "pw1", "   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation { field: "nick_name", .. }));

        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let store = Arc::new(test_store());
        let sign_in = SignInUseCase::new(store, Arc::new(test_config()));

        let err = sign_in
            .execute(sign_in_input("nobody@x.com", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AccountNotFound));

        let err = sign_in
            .execute(sign_in_input("not an email", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::AccountNotFound));
    }

    #[tokio::test]
    async fn test_login_unknown_email_reports_not_found_for_any_password() {
        let store = Arc::new(test_store());
        let sign_in = SignInUseCase::new(store.clone(), Arc::new(test_config()));

        for password in ["", " ", "pw1", "p\u{e4}ssw\u{f6}rd"] {
            let err = sign_in
                .execute(sign_in_input("nobody@x.com", password))
                .await
                .unwrap_err();
            assert!(matches!(err, AccountError::AccountNotFound), "{password:?}");
        }
        assert_eq!(store.user_count().await, 0);
    }

    #[tokio::test]
    async fn test_login_empty_password_for_known_email() {
        let store = Arc::new(test_store());
        let config = Arc::new(test_config());
        SignUpUseCase::new(store.clone(), config.clone())
            .execute(sign_up_input("a@x.com", "pw1", "Al"))
            .await
            .unwrap();

        let err = SignInUseCase::new(store, config)
            .execute(sign_in_input("a@x.com", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_errors_do_not_reveal_hash() {
        let store = Arc::new(test_store());
        let config = Arc::new(test_config());
        let user = SignUpUseCase::new(store.clone(), config.clone())
            .execute(sign_up_input("a@x.com", "pw1", "Al"))
            .await
            .unwrap();

        let err = SignInUseCase::new(store, config)
            .execute(sign_in_input("a@x.com", "wrong"))
            .await
            .unwrap_err();

        let hash = user.password_hash.as_str();
        assert!(!err.to_string().contains(hash));
        assert!(!format!("{err:?}").contains(hash));
        assert!(!err.to_app_error().message().contains(hash));
    }

    #[tokio::test]
    async fn test_login_records_last_login() {
        let store = Arc::new(test_store());
        let config = Arc::new(test_config());
        let created = SignUpUseCase::new(store.clone(), config.clone())
            .execute(sign_up_input("a@x.com", "pw1", "Al"))
            .await
            .unwrap();

        SignInUseCase::new(store.clone(), config)
            .execute(sign_in_input("a@x.com", "pw1"))
            .await
            .unwrap();

        let email = Email::new("a@x.com").unwrap();
        let stored = store.find_by_email(&email).await.unwrap().unwrap();
        assert!(stored.last_login_at.is_some());
        assert!(stored.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_login_upgrades_outdated_digest() {
        let store = Arc::new(test_store());
        let old_config = Arc::new(test_config());
        SignUpUseCase::new(store.clone(), old_config)
            .execute(sign_up_input("a@x.com", "pw1", "Al"))
            .await
            .unwrap();

        let new_cost = HashCost {
            iterations: HashCost::minimal().iterations + 1,
            ..HashCost::minimal()
        };
        let new_config = Arc::new(AccountConfig {
            hash_cost: new_cost,
            ..test_config()
        });
        SignInUseCase::new(store.clone(), new_config.clone())
            .execute(sign_in_input("a@x.com", "pw1"))
            .await
            .unwrap();

        let email = Email::new("a@x.com").unwrap();
        let stored = store.find_by_email(&email).await.unwrap().unwrap();
        assert!(!stored.password_hash.needs_rehash(&new_cost));

        // Still the same password
        SignInUseCase::new(store, new_config)
            .execute(sign_in_input("a@x.com", "pw1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_login_with_unreadable_digest_fails() {
        let store = Arc::new(test_store());
        let config = Arc::new(test_config());
        let mut user = SignUpUseCase::new(store.clone(), config.clone())
            .execute(sign_up_input("a@x.com", "pw1", "Al"))
            .await
            .unwrap();

        user.set_password_hash(UserPassword::from_db("garbage"));
        store.update(&user).await.unwrap();

        let err = SignInUseCase::new(store, config)
            .execute(sign_in_input("a@x.com", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_pepper_must_match() {
        let store = Arc::new(test_store());
        let peppered = Arc::new(AccountConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..test_config()
        });
        SignUpUseCase::new(store.clone(), peppered.clone())
            .execute(sign_up_input("a@x.com", "pw1", "Al"))
            .await
            .unwrap();

        assert!(
            SignInUseCase::new(store.clone(), peppered)
                .execute(sign_in_input("a@x.com", "pw1"))
                .await
                .is_ok()
        );

        let err = SignInUseCase::new(store, Arc::new(test_config()))
            .execute(sign_in_input("a@x.com", "pw1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }
}

mod session_tests {
    use super::*;
    use crate::application::{SessionGate, SessionStatus, SessionToken};
    use crate::domain::entity::user::UserSummary;
    use crate::domain::repository::UserStore;
    use crate::domain::value_object::{email::Email, nickname::Nickname, user_password::UserPassword};
    use crate::domain::NewUser;
    use kernel::id::SessionId;

    async fn saved_summary(store: &InMemoryAccountStore) -> UserSummary {
        let user = store
            .save(NewUser::new(
                Email::new("a@x.com").unwrap(),
                UserPassword::from_db("$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaA"),
                Nickname::new("Al").unwrap(),
            ))
            .await
            .unwrap();
        UserSummary::from(&user)
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = Arc::new(test_store());
        let gate = SessionGate::new(store.clone(), Arc::new(test_config()));
        let summary = saved_summary(&store).await;

        assert_eq!(gate.check(None).await.unwrap(), SessionStatus::Unauthenticated);

        let token = gate.open(&summary).await.unwrap();
        let status = gate.check(Some(token.as_str())).await.unwrap();
        assert_eq!(status, SessionStatus::Authenticated(summary));

        gate.logout(Some(token.as_str())).await.unwrap();
        let status = gate.check(Some(token.as_str())).await.unwrap();
        assert_eq!(status, SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = Arc::new(test_store());
        let gate = SessionGate::new(store.clone(), Arc::new(test_config()));
        let summary = saved_summary(&store).await;

        let first = gate.open(&summary).await.unwrap();
        let second = gate.open(&summary).await.unwrap();
        assert_ne!(first, second);

        gate.logout(Some(first.as_str())).await.unwrap();
        assert!(gate.check(Some(second.as_str())).await.unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let store = Arc::new(test_store());
        let gate = SessionGate::new(store.clone(), Arc::new(test_config()));
        let summary = saved_summary(&store).await;

        let token = gate.open(&summary).await.unwrap();
        gate.logout(Some(token.as_str())).await.unwrap();
        gate.logout(Some(token.as_str())).await.unwrap();
        gate.logout(Some("garbage")).await.unwrap();
        gate.logout(None).await.unwrap();

        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthenticated() {
        let store = Arc::new(InMemoryAccountStore::new(Duration::ZERO));
        let gate = SessionGate::new(store.clone(), Arc::new(test_config()));
        let summary = saved_summary(&store).await;

        let token = gate.open(&summary).await.unwrap();
        let status = gate.check(Some(token.as_str())).await.unwrap();
        assert_eq!(status, SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_expired_sessions_do_not_accumulate() {
        let store = Arc::new(InMemoryAccountStore::new(Duration::ZERO));
        let gate = SessionGate::new(store.clone(), Arc::new(test_config()));
        let summary = saved_summary(&store).await;

        for _ in 0..100 {
            let token = gate.open(&summary).await.unwrap();
            let status = gate.check(Some(token.as_str())).await.unwrap();
            assert_eq!(status, SessionStatus::Unauthenticated);
        }

        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_forged_token_is_unauthenticated() {
        let store = Arc::new(test_store());
        let config = Arc::new(test_config());
        let gate = SessionGate::new(store.clone(), config);
        let summary = saved_summary(&store).await;
        let token = gate.open(&summary).await.unwrap();

        // Same session id, signed with another secret
        let session_id: SessionId = token
            .as_str()
            .split_once('.')
            .map(|(id, _)| id.parse().unwrap())
            .unwrap();
        let forged = SessionToken::issue(&session_id, &[9u8; 32]);

        let status = gate.check(Some(forged.as_str())).await.unwrap();
        assert_eq!(status, SessionStatus::Unauthenticated);

        // Forged logout does not touch the real session
        gate.logout(Some(forged.as_str())).await.unwrap();
        assert!(gate.check(Some(token.as_str())).await.unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_malformed_tokens_are_unauthenticated() {
        let store = Arc::new(test_store());
        let gate = SessionGate::new(store, Arc::new(test_config()));

        for token in ["", "abc", "a.b.c", "00000000-0000-0000-0000-000000000000."] {
            let status = gate.check(Some(token)).await.unwrap();
            assert_eq!(status, SessionStatus::Unauthenticated, "{token}");
        }
    }
}

mod http_tests {
    use super::*;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::presentation::router::account_router_generic;

    fn app() -> Router {
        account_router_generic(test_store(), test_config())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `name=value` part of the Set-Cookie header
    fn session_cookie(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    async fn sign_up(app: &Router) {
        let response = app
            .clone()
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@x.com", "password": "pw1", "nick_name": "Al"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(get_with_cookie("/health", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "user service is running");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_signup_envelope() {
        let response = app()
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@x.com", "password": "pw1", "nickname": "Al"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "signup succeeded");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_signup_missing_field() {
        let response = app()
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@x.com", "nick_name": "Al"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "password is required");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_signup_malformed_json() {
        let request = Request::builder()
            .method("POST")
            .uri("/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["status"], "error");
    }

    #[tokio::test]
    async fn test_signup_duplicate() {
        let app = app();
        sign_up(&app).await;

        let response = app
            .oneshot(post_json(
                "/signup",
                json!({"email": "A@x.com", "password": "pw2", "nick_name": "Bo"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(read_json(response).await["status"], "error");
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_session_resolves() {
        let app = app();
        sign_up(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({"email": "a@x.com", "password": "pw1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("user_session="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Max-Age=1800"));

        let cookie = session_cookie(&response);
        let body = read_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "login succeeded");
        assert_eq!(body["data"]["email"], "a@x.com");
        assert_eq!(body["data"]["nick_name"], "Al");
        assert!(body["data"]["password_hash"].is_null());
        let id = body["data"]["id"].clone();

        let response = app
            .oneshot(get_with_cookie("/session", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["message"], "authenticated user");
        assert_eq!(body["data"]["id"], id);
        assert_eq!(body["data"]["nick_name"], "Al");
    }

    #[tokio::test]
    async fn test_whitespace_password_round_trip() {
        let app = app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/signup",
                json!({"email": "a@x.com", "password": "   ", "nick_name": "Al"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({"email": "a@x.com", "password": "   "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Passwords are not trimmed
        let response = app
            .oneshot(post_json(
                "/login",
                json!({"email": "a@x.com", "password": " "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_failures_share_message() {
        let app = app();
        sign_up(&app).await;

        let wrong_password = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({"email": "a@x.com", "password": "wrong"}),
            ))
            .await
            .unwrap();
        let unknown_email = app
            .oneshot(post_json(
                "/login",
                json!({"email": "b@x.com", "password": "pw1"}),
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
        assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());

        let wrong_password = read_json(wrong_password).await;
        let unknown_email = read_json(unknown_email).await;
        assert_eq!(wrong_password, unknown_email);
        assert_eq!(wrong_password["message"], "invalid email or password");
    }

    #[tokio::test]
    async fn test_session_without_cookie() {
        let response = app()
            .oneshot(get_with_cookie("/session", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = read_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "login required");
    }

    #[tokio::test]
    async fn test_session_with_forged_cookie() {
        let response = app()
            .oneshot(get_with_cookie(
                "/session",
                Some("user_session=00000000-0000-0000-0000-000000000000.AAAA"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let app = app();
        sign_up(&app).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/login",
                json!({"email": "a@x.com", "password": "pw1"}),
            ))
            .await
            .unwrap();
        let cookie = session_cookie(&response);

        let request = Request::builder()
            .method("POST")
            .uri("/logout")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cleared.starts_with("user_session=;"));
        assert!(cleared.contains("Max-Age=0"));
        assert_eq!(read_json(response).await["message"], "logged out");

        let response = app
            .oneshot(get_with_cookie("/session", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_without_cookie() {
        let request = Request::builder()
            .method("POST")
            .uri("/logout")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "success");
    }
}
