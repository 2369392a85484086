#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use ironquest_api::auth::jwt::JwtConfig;
use ironquest_api::auth::password::hash_password;
use ironquest_api::config::{CoachConfig, ServerConfig};
use ironquest_api::router::build_app_router;
use ironquest_api::state::AppState;
use ironquest_coach::{ChatMessage, CoachError, LlmProvider, UnconfiguredProvider};
use ironquest_core::roles::ROLE_ADMIN;
use ironquest_db::models::user::CreateUser;
use ironquest_db::repositories::UserRepo;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin and a 30-second request
/// timeout. No admin account is seeded.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hs256".to_string(),
            access_token_expiry_mins: 60,
        },
        admin: None,
        coach: CoachConfig::default(),
    }
}

/// Build the full application router, with an unconfigured coach.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with_coach(pool, Arc::new(UnconfiguredProvider::missing_key()))
}

/// Build the full application router around the given coach backend.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app_with_coach(pool: SqlitePool, coach: Arc<dyn LlmProvider>) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone(), coach);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Coach stub
// ---------------------------------------------------------------------------

/// Coach backend that replays canned results and records what it was sent.
pub struct StubCoach {
    replies: Mutex<Vec<Result<String, CoachError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StubCoach {
    /// Replies are handed out in order; once exhausted every call fails
    /// with `EmptyResponse`.
    pub fn new(mut replies: Vec<Result<String, CoachError>>) -> Arc<Self> {
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Transcripts received so far, one per call.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for StubCoach {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn complete(
        &self,
        _system_prompt: &str,
        transcript: &[ChatMessage],
    ) -> Result<String, CoachError> {
        self.calls.lock().unwrap().push(transcript.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(CoachError::EmptyResponse))
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Register `username` through the API and return the access token.
pub async fn register(app: Router, username: &str) -> String {
    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
    });
    let json = expect_json(
        post_json(app, "/api/v1/auth/register", body).await,
        StatusCode::CREATED,
    )
    .await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Insert an admin directly and log in through the API, returning the token.
pub async fn admin_token(pool: &SqlitePool, app: Router) -> String {
    UserRepo::create(
        pool,
        &CreateUser {
            username: "warden".to_string(),
            email: "warden@example.com".to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: ROLE_ADMIN.to_string(),
        },
    )
    .await
    .unwrap();

    let body = json!({ "email": "warden@example.com", "password": TEST_PASSWORD });
    let json = expect_json(post_json(app, "/api/v1/auth/login", body).await, StatusCode::OK).await;
    json["access_token"].as_str().unwrap().to_string()
}
