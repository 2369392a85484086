//! HTTP-level integration tests for registration, login, and token handling.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, expect_json, get, get_auth, post_json, register, TEST_PASSWORD,
};
use ironquest_api::auth::jwt::validate_token;
use ironquest_db::repositories::UserRepo;
use serde_json::json;
use sqlx::SqlitePool;

fn login_body(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Registration returns 201 with a token and a regular user account.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_success(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let body = json!({
        "username": "  jinwoo ",
        "email": "Jinwoo@Example.com",
        "password": TEST_PASSWORD,
    });
    let json = expect_json(
        post_json(app, "/api/v1/auth/register", body).await,
        StatusCode::CREATED,
    )
    .await;

    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["username"], "jinwoo");
    assert_eq!(json["user"]["email"], "jinwoo@example.com");
    assert_eq!(json["user"]["role"], "user");
    assert_eq!(json["user"]["is_banned"], false);
    assert!(
        json["user"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );
}

/// A taken username or email is rejected with 409.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_duplicate_returns_409(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "jinwoo").await;

    let same_name = json!({
        "username": "jinwoo",
        "email": "other@example.com",
        "password": TEST_PASSWORD,
    });
    let response = post_json(app.clone(), "/api/v1/auth/register", same_name).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let same_email = json!({
        "username": "other",
        "email": "JINWOO@example.com",
        "password": TEST_PASSWORD,
    });
    let json = expect_json(
        post_json(app, "/api/v1/auth/register", same_email).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["code"], "CONFLICT");
}

/// Short passwords, bad usernames and malformed emails are 400s.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_validation(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let cases = [
        json!({ "username": "jinwoo", "email": "j@example.com", "password": "short" }),
        json!({ "username": "j", "email": "j@example.com", "password": TEST_PASSWORD }),
        json!({ "username": "sung jinwoo", "email": "j@example.com", "password": TEST_PASSWORD }),
        json!({ "username": "jinwoo", "email": "not-an-email", "password": TEST_PASSWORD }),
    ];

    for body in cases {
        let json = expect_json(
            post_json(app.clone(), "/api/v1/auth/register", body).await,
            StatusCode::BAD_REQUEST,
        )
        .await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Login with correct credentials returns a token and records the login.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    register(app.clone(), "jinwoo").await;

    let json = expect_json(
        post_json(
            app,
            "/api/v1/auth/login",
            login_body("jinwoo@example.com", TEST_PASSWORD),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert!(json["access_token"].is_string());
    assert_eq!(json["user"]["username"], "jinwoo");

    let user = UserRepo::find_by_username(&pool, "jinwoo")
        .await
        .unwrap()
        .unwrap();
    assert!(user.last_login_at.is_some());
}

/// Login tokens carry the account's role, and `expires_in` is their real lifetime.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_token_claims(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let jwt = common::test_config().jwt;
    register(app.clone(), "jinwoo").await;

    let json = expect_json(
        post_json(
            app.clone(),
            "/api/v1/auth/login",
            login_body("jinwoo@example.com", TEST_PASSWORD),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let claims = validate_token(json["access_token"].as_str().unwrap(), &jwt).unwrap();
    assert_eq!(claims.sub, json["user"]["id"].as_i64().unwrap());
    assert_eq!(claims.role, "user");
    assert_eq!(json["expires_in"], claims.exp - claims.iat);
    assert_eq!(json["expires_in"], jwt.expires_in_secs());

    let admin = admin_token(&pool, app).await;
    assert_eq!(validate_token(&admin, &jwt).unwrap().role, "admin");
}

/// Wrong password and unknown email produce the same 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_credentials(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    register(app.clone(), "jinwoo").await;

    let wrong_password = expect_json(
        post_json(
            app.clone(),
            "/api/v1/auth/login",
            login_body("jinwoo@example.com", "not-the-password"),
        )
        .await,
        StatusCode::UNAUTHORIZED,
    )
    .await;

    let unknown_email = expect_json(
        post_json(
            app,
            "/api/v1/auth/login",
            login_body("nobody@example.com", TEST_PASSWORD),
        )
        .await,
        StatusCode::UNAUTHORIZED,
    )
    .await;

    assert_eq!(wrong_password["error"], unknown_email["error"]);
}

/// A banned user cannot log in, and existing tokens stop working.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_banned_user_is_locked_out(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let token = register(app.clone(), "jinwoo").await;

    let user = UserRepo::find_by_username(&pool, "jinwoo")
        .await
        .unwrap()
        .unwrap();
    UserRepo::set_banned(&pool, user.id, true).await.unwrap();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        login_body("jinwoo@example.com", TEST_PASSWORD),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, "/api/v1/character", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Token handling
// ---------------------------------------------------------------------------

/// `/auth/me` returns the caller wrapped in the data envelope.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_me_returns_current_user(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "jinwoo").await;

    let json = expect_json(get_auth(app, "/api/v1/auth/me", &token).await, StatusCode::OK).await;
    assert_eq!(json["data"]["username"], "jinwoo");
    assert_eq!(json["data"]["role"], "user");
}

/// Missing, malformed and forged tokens are all 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_protected_routes_reject_bad_tokens(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let response = get_auth(app, "/api/v1/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A token for a deleted account is rejected.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_for_deleted_user_is_rejected(pool: SqlitePool) {
    let app = common::build_test_app(pool.clone());
    let token = register(app.clone(), "jinwoo").await;

    sqlx::query("DELETE FROM users WHERE username = 'jinwoo'")
        .execute(&pool)
        .await
        .unwrap();

    let response = get_auth(app, "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
