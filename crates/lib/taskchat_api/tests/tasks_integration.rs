//! Integration tests: task lifecycle and ownership scoping.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{send, sign_up, test_app};

#[tokio::test]
async fn task_of_one_identity_is_not_found_for_another() {
    let app = test_app();
    let (alice_id, alice) = sign_up(&app, "alice", "a@x.com").await;
    let (bob_id, bob) = sign_up(&app, "bob", "b@x.com").await;
    assert_eq!((alice_id, bob_id), (1, 2));

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(alice.as_str()),
        Some(json!({ "title": "Alice's task", "description": "private" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Task created successfully");
    let task_id = body["taskId"].as_i64().unwrap();
    let task_uri = format!("/api/tasks/{task_id}");
    let status_uri = format!("/api/tasks/{task_id}/status");

    let (status, body) = send(&app, "GET", &task_uri, Some(bob.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");

    let (status, _) = send(
        &app,
        "PATCH",
        &status_uri,
        Some(bob.as_str()),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &task_uri, Some(bob.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/api/tasks", Some(bob.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"], json!([]));

    // Alice's task is untouched by Bob's attempts.
    let (status, body) = send(&app, "GET", &task_uri, Some(alice.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["title"], "Alice's task");
    assert_eq!(body["task"]["status"], "pending");
}

#[tokio::test]
async fn missing_and_foreign_tasks_are_indistinguishable() {
    let app = test_app();
    let (_, alice) = sign_up(&app, "alice", "a@x.com").await;
    let (_, bob) = sign_up(&app, "bob", "b@x.com").await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(alice.as_str()),
        Some(json!({ "title": "mine" })),
    )
    .await;
    let task_id = body["taskId"].as_i64().unwrap();

    let foreign = send(&app, "GET", &format!("/api/tasks/{task_id}"), Some(bob.as_str()), None).await;
    let missing = send(&app, "GET", "/api/tasks/9999", Some(bob.as_str()), None).await;
    assert_eq!(foreign, missing);
}

#[tokio::test]
async fn task_lifecycle() {
    let app = test_app();
    let (_, token) = sign_up(&app, "alice", "a@x.com").await;

    let (status, body) = send(&app, "POST", "/api/tasks", Some(token.as_str()), Some(json!({ "title": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Task title is required");

    let mut ids = Vec::new();
    for title in ["write report", "buy milk"] {
        let (status, body) = send(&app, "POST", "/api/tasks", Some(token.as_str()), Some(json!({ "title": title }))).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["taskId"].as_i64().unwrap());
    }
    let (report, milk) = (ids[0], ids[1]);

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/tasks/{report}/status"),
        Some(token.as_str()),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Valid status (completed/pending) is required");

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/tasks/{report}/status"),
        Some(token.as_str()),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task status updated successfully");

    let (_, body) = send(&app, "GET", "/api/tasks?filter=completed", Some(token.as_str()), None).await;
    let completed: Vec<i64> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(completed, vec![report]);

    let (_, body) = send(&app, "GET", "/api/tasks?filter=pending", Some(token.as_str()), None).await;
    assert_eq!(body["tasks"][0]["id"], milk);
    assert_eq!(body["tasks"][0]["description"], "");

    let (_, body) = send(&app, "GET", "/api/tasks", Some(token.as_str()), None).await;
    let all: Vec<i64> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(all, vec![milk, report]);

    let (status, body) = send(&app, "DELETE", &format!("/api/tasks/{milk}"), Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, "GET", &format!("/api/tasks/{milk}"), Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_task_id_is_a_json_bad_request() {
    let app = test_app();
    let (_, token) = sign_up(&app, "alice", "a@x.com").await;

    for (method, uri, body) in [
        ("GET", "/api/tasks/abc", None),
        ("DELETE", "/api/tasks/abc", None),
        ("PATCH", "/api/tasks/abc/status", Some(json!({ "status": "completed" }))),
    ] {
        let (status, body) = send(&app, method, uri, Some(token.as_str()), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert!(body["error"].is_string(), "{method} {uri}: {body}");
    }
}
