//! HTTP-level integration tests for the coach chat, using a stub backend.

mod common;

use axum::http::StatusCode;
use common::{delete_auth, expect_json, get_auth, post_json_auth, register, StubCoach};
use ironquest_coach::error::{CONNECTION_LOST_MESSAGE, CREDENTIAL_MESSAGE};
use ironquest_coach::{ChatMessage, CoachError};
use serde_json::json;
use sqlx::SqlitePool;

/// Messages and replies accumulate in the caller's conversation.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_send_message_builds_transcript(pool: SqlitePool) {
    let coach = StubCoach::new(vec![
        Ok("Keep your elbows tucked.".into()),
        Ok("Three sets of eight.".into()),
    ]);
    let app = common::build_test_app_with_coach(pool, coach.clone());
    let token = register(app.clone(), "jinwoo").await;

    let first = expect_json(
        post_json_auth(
            app.clone(),
            "/api/v1/coach/messages",
            json!({ "text": "  How do I bench?  " }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(first["data"]["reply"], "Keep your elbows tucked.");

    let second = expect_json(
        post_json_auth(
            app.clone(),
            "/api/v1/coach/messages",
            json!({ "text": "How many sets?" }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(second["data"]["conversation_id"], first["data"]["conversation_id"]);

    let calls = coach.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], vec![ChatMessage::user("How do I bench?")]);
    assert_eq!(calls[1].len(), 3, "second call carries the whole transcript");

    let json = expect_json(
        get_auth(app, "/api/v1/coach/conversation", &token).await,
        StatusCode::OK,
    )
    .await;
    let messages = json["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[1]["role"], "model");
    assert_eq!(messages[3]["text"], "Three sets of eight.");
}

/// Conversations are private to each user.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_conversations_are_per_user(pool: SqlitePool) {
    let coach = StubCoach::new(vec![Ok("Hydrate.".into())]);
    let app = common::build_test_app_with_coach(pool, coach);
    let first = register(app.clone(), "jinwoo").await;
    let second = register(app.clone(), "jinah").await;

    post_json_auth(
        app.clone(),
        "/api/v1/coach/messages",
        json!({ "text": "Tips?" }),
        &first,
    )
    .await;

    let json = expect_json(
        get_auth(app, "/api/v1/coach/conversation", &second).await,
        StatusCode::OK,
    )
    .await;
    assert!(json["data"]["messages"].as_array().unwrap().is_empty());
}

/// Blank messages are rejected without calling the backend.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_message_is_rejected(pool: SqlitePool) {
    let coach = StubCoach::new(vec![]);
    let app = common::build_test_app_with_coach(pool, coach.clone());
    let token = register(app.clone(), "jinwoo").await;

    let json = expect_json(
        post_json_auth(app, "/api/v1/coach/messages", json!({ "text": "   " }), &token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(coach.calls().is_empty());
}

/// A backend failure is a 502 and starts a fresh conversation.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_provider_failure_resets_conversation(pool: SqlitePool) {
    let coach = StubCoach::new(vec![
        Ok("Warm up first.".into()),
        Err(CoachError::Api {
            status: 503,
            message: "overloaded".into(),
        }),
    ]);
    let app = common::build_test_app_with_coach(pool, coach);
    let token = register(app.clone(), "jinwoo").await;

    let first = expect_json(
        post_json_auth(
            app.clone(),
            "/api/v1/coach/messages",
            json!({ "text": "Hi" }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;

    let json = expect_json(
        post_json_auth(
            app.clone(),
            "/api/v1/coach/messages",
            json!({ "text": "And then?" }),
            &token,
        )
        .await,
        StatusCode::BAD_GATEWAY,
    )
    .await;
    assert_eq!(json["code"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(json["error"], CONNECTION_LOST_MESSAGE);

    let json = expect_json(
        get_auth(app, "/api/v1/coach/conversation", &token).await,
        StatusCode::OK,
    )
    .await;
    assert!(json["data"]["messages"].as_array().unwrap().is_empty());
    assert_ne!(json["data"]["id"], first["data"]["conversation_id"]);
}

/// Without an API key the coach reports a credential problem.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unconfigured_coach_reports_missing_key(pool: SqlitePool) {
    let app = common::build_test_app(pool);
    let token = register(app.clone(), "jinwoo").await;

    let json = expect_json(
        post_json_auth(app, "/api/v1/coach/messages", json!({ "text": "Hi" }), &token).await,
        StatusCode::BAD_GATEWAY,
    )
    .await;
    assert_eq!(json["error"], CREDENTIAL_MESSAGE);
}

/// Resetting discards the transcript and issues a new conversation id.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_conversation(pool: SqlitePool) {
    let coach = StubCoach::new(vec![Ok("Rest well.".into())]);
    let app = common::build_test_app_with_coach(pool, coach);
    let token = register(app.clone(), "jinwoo").await;

    let first = expect_json(
        post_json_auth(
            app.clone(),
            "/api/v1/coach/messages",
            json!({ "text": "Sore legs" }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;

    let reset = expect_json(
        delete_auth(app.clone(), "/api/v1/coach/conversation", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_ne!(reset["data"]["conversation_id"], first["data"]["conversation_id"]);

    let json = expect_json(
        get_auth(app, "/api/v1/coach/conversation", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["id"], reset["data"]["conversation_id"]);
    assert!(json["data"]["messages"].as_array().unwrap().is_empty());
}
