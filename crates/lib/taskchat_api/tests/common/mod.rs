//! Shared helpers: build a router over an in-memory store and drive it
//! with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use taskchat_api::{AppState, config::ApiConfig};
use taskchat_core::store::MemoryStore;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_TTL_SECS: i64 = 3600;

pub fn test_config() -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        jwt_secret: TEST_SECRET.into(),
        token_ttl_secs: TEST_TTL_SECS,
        bcrypt_cost: 4,
        hash_concurrency: 2,
    }
}

pub fn test_app() -> Router {
    let state = AppState::new(Arc::new(MemoryStore::new()), test_config()).expect("app state");
    taskchat_api::router(state)
}

/// Send one request and return the status plus the JSON body (`Null` when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    send_request(app, req).await
}

pub async fn send_request(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse JSON")
    };
    (status, json)
}

pub async fn register(app: &Router, username: &str, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/users/register",
        None,
        Some(json!({ "username": username, "email": email, "password": password })),
    )
    .await
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// Register and log in, returning `(user_id, token)`.
pub async fn sign_up(app: &Router, username: &str, email: &str) -> (i64, String) {
    let (status, body) = register(app, username, email, "Password1").await;
    assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
    let user_id = body["userId"].as_i64().expect("userId");

    let (status, body) = login(app, email, "Password1").await;
    assert_eq!(status, StatusCode::OK, "login {email}: {body}");
    let token = body["token"].as_str().expect("token").to_string();
    (user_id, token)
}
