#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use base64::prelude::*;
use flashcards_server::{db, router, svix::Webhook, AppState};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tower::ServiceExt;

pub const WEBHOOK_PATH: &str = "/api/webhooks/clerk";

pub fn test_secret() -> String {
    format!("whsec_{}", BASE64_STANDARD.encode(b"flashcards-test-signing-key"))
}

pub fn test_webhook() -> Webhook {
    Webhook::new(&test_secret()).unwrap()
}

/// Single-connection in-memory database with migrations applied.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    db::migrate(&pool).await.unwrap();
    pool
}

pub fn test_app(pool: SqlitePool) -> Router {
    router(AppState::new(pool, test_webhook()))
}

/// App over a closed pool: any database access fails with a 500.
pub async fn app_without_database() -> Router {
    let pool = test_pool().await;
    pool.close().await;
    test_app(pool)
}

pub fn signed_request(msg_id: &str, body: &Value) -> Request<Body> {
    let payload = serde_json::to_vec(body).unwrap();
    let timestamp = chrono::Utc::now().timestamp();
    let signature = test_webhook().sign(msg_id, timestamp, &payload);

    Request::builder()
        .method("POST")
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json")
        .header("svix-id", msg_id)
        .header("svix-timestamp", timestamp.to_string())
        .header("svix-signature", signature)
        .body(Body::from(payload))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub async fn user_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .unwrap()
}
