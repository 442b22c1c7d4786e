//! HTTP API Tests
//!
//! Drives the full router through tower's `oneshot`: request in, response
//! out, no sockets. Each test builds an isolated application with its own
//! registry and stores, so nothing leaks between tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::time::Duration;
use task_offload_api::server::build_router;
use task_offload_api::tasks::executor::TaskExecutor;
use task_offload_api::tasks::registry::TaskRegistry;
use task_offload_api::users::store::UserStore;
use tower::ServiceExt;
use uuid::Uuid;

/// Builds a fresh application with isolated state.
fn app() -> Router {
    let registry = TaskRegistry::new();
    let executor = TaskExecutor::new(registry.clone());
    let users = UserStore::new();
    build_router(registry, executor, users)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "DELETE", uri, None).await
}

fn assert_is_uuid(value: &Value) {
    let raw = value.as_str().expect("id should be a string");
    assert!(Uuid::parse_str(raw).is_ok(), "not a canonical UUID: {}", raw);
}

fn error_of(body: &Value) -> String {
    body["error"]
        .as_str()
        .expect("body should carry an error message")
        .to_lowercase()
}

/// Polls the status endpoint until the task leaves `processing`.
async fn wait_for_terminal(app: &Router, task_id: &str) -> Value {
    for _ in 0..500 {
        let (status, body) = get(app, &format!("/tasks/{}", task_id)).await;
        assert_eq!(status, StatusCode::OK);
        if body["status"] != "processing" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {} did not finish in time", task_id);
}

// ============================================================
// HEALTH
// ============================================================

#[tokio::test]
async fn health_returns_ok() {
    let app = app();

    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ============================================================
// POST /users
// ============================================================

#[tokio::test]
async fn create_user_returns_201_with_the_record() {
    let app = app();

    let (status, body) = post(
        &app,
        "/users",
        json!({"name": "Mario Rossi", "email": "mario@test.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_is_uuid(&body["id"]);
    assert_eq!(body["name"], "Mario Rossi");
    assert_eq!(body["email"], "mario@test.com");
    assert_eq!(body["isActive"], true);

    let created_at = body["createdAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
}

#[tokio::test]
async fn create_user_rejects_short_name() {
    let app = app();

    let (status, body) = post(
        &app,
        "/users",
        json!({"name": "a", "email": "test@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn create_user_rejects_invalid_email() {
    let app = app();

    let (status, body) = post(
        &app,
        "/users",
        json!({"name": "Test User", "email": "invalid-email"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn create_user_rejects_missing_fields() {
    let app = app();

    let (status, _) = post(&app, "/users", json!({"email": "test@example.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/users", json!({"name": "Test User"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_user_rejects_duplicate_email() {
    let app = app();
    let user = json!({"name": "Test User", "email": "duplicate@test.com"});

    let (status, _) = post(&app, "/users", user.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/users", user).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error_of(&body).contains("email"));
}

// ============================================================
// GET /users
// ============================================================

async fn seed_users(app: &Router, count: usize) {
    for i in 0..count {
        let (status, _) = post(
            app,
            "/users",
            json!({"name": format!("User {}", i), "email": format!("user{}@test.com", i)}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn list_users_returns_paginated_envelope() {
    let app = app();
    seed_users(&app, 3).await;

    let (status, body) = get(&app, "/users").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_array());
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let pagination = &body["pagination"];
    assert!(pagination["page"].is_number());
    assert!(pagination["limit"].is_number());
    assert_eq!(pagination["total"], 3);
    assert!(pagination["pages"].is_number());
}

#[tokio::test]
async fn list_users_honors_page_and_limit() {
    let app = app();
    seed_users(&app, 5).await;

    let (status, body) = get(&app, "/users?page=1&limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["pages"], 3);
}

#[tokio::test]
async fn list_users_past_the_end_is_empty() {
    let app = app();
    seed_users(&app, 2).await;

    let (status, body) = get(&app, "/users?page=999&limit=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert_eq!(body["pagination"]["page"], 999);
}

#[tokio::test]
async fn list_users_clamps_invalid_pagination_params() {
    let app = app();
    seed_users(&app, 2).await;

    let (status, body) = get(&app, "/users?page=-1&limit=0").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["pagination"]["page"].as_u64().unwrap() > 0);
    assert!(body["pagination"]["limit"].as_u64().unwrap() > 0);
}

// ============================================================
// GET /users/:userId
// ============================================================

#[tokio::test]
async fn get_user_returns_the_record() {
    let app = app();
    let (_, created) = post(
        &app,
        "/users",
        json!({"name": "Single User", "email": "single@test.com"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = get(&app, &format!("/users/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], *id);
    assert_eq!(body["name"], "Single User");
    assert_eq!(body["email"], "single@test.com");
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn get_unknown_user_returns_404() {
    let app = app();

    let (status, body) = get(&app, "/users/00000000-0000-0000-0000-000000000000").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error_of(&body).contains("not found"));
}

#[tokio::test]
async fn get_user_with_malformed_id_returns_404() {
    let app = app();

    let (status, _) = get(&app, "/users/invalid-id-123").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================
// DELETE /users/:userId
// ============================================================

#[tokio::test]
async fn delete_user_returns_204_and_removes_the_record() {
    let app = app();
    let (_, created) = post(
        &app,
        "/users",
        json!({"name": "Delete Me", "email": "delete@test.com"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = delete(&app, &format!("/users/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = get(&app, &format!("/users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_user_returns_404() {
    let app = app();

    let (status, body) = delete(&app, "/users/00000000-0000-0000-0000-000000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = delete(&app, "/users/invalid-id").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn full_crud_cycle() {
    let app = app();

    let (status, created) = post(
        &app,
        "/users",
        json!({"name": "Full Cycle", "email": "cycle@test.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = get(&app, &format!("/users/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Full Cycle");

    let (status, listed) = get(&app, "/users").await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|user| user["id"] == *id));

    let (status, _) = delete(&app, &format!("/users/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get(&app, &format!("/users/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================
// GET /users/active
// ============================================================

#[tokio::test]
async fn active_users_returns_only_active_records() {
    let app = app();
    seed_users(&app, 2).await;

    let (status, body) = get(&app, "/users/active").await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().expect("should be a bare array");
    assert_eq!(users.len(), 2);
    for user in users {
        assert_eq!(user["isActive"], true);
        assert_is_uuid(&user["id"]);
        assert!(user["name"].is_string());
        assert!(user["email"].is_string());
        assert!(user["createdAt"].is_string());
    }
}

// ============================================================
// POST /tasks/heavy
// ============================================================

#[tokio::test]
async fn submit_heavy_task_returns_202_with_an_acknowledgement() {
    let app = app();

    let (status, body) = post(&app, "/tasks/heavy", json!({"iterations": 100_000})).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_is_uuid(&body["taskId"]);
    assert_eq!(body["status"], "processing");
    assert_eq!(body["iterations"], 100_000);
}

#[tokio::test]
async fn submit_heavy_task_rejects_negative_iterations() {
    let app = app();

    let (status, body) = post(&app, "/tasks/heavy", json!({"iterations": -100})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn submit_heavy_task_rejects_iterations_above_the_maximum() {
    let app = app();

    let (status, body) = post(&app, "/tasks/heavy", json!({"iterations": 2_000_000})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn submit_heavy_task_rejects_missing_and_non_numeric_iterations() {
    let app = app();

    let (status, _) = post(&app, "/tasks/heavy", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/tasks/heavy", json!({"iterations": "not-a-number"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================
// GET /tasks/:taskId
// ============================================================

#[tokio::test]
async fn immediate_poll_after_submission_never_misses_the_task() {
    let app = app();

    let (_, submitted) = post(&app, "/tasks/heavy", json!({"iterations": 100})).await;
    let task_id = submitted["taskId"].as_str().unwrap();

    let (status, body) = get(&app, &format!("/tasks/{}", task_id)).await;

    assert_eq!(status, StatusCode::OK);
    let state = body["status"].as_str().unwrap();
    assert!(["processing", "completed", "error"].contains(&state));
}

#[tokio::test]
async fn task_status_reports_result_and_duration_when_completed() {
    let app = app();

    let (_, submitted) = post(&app, "/tasks/heavy", json!({"iterations": 50_000})).await;
    let task_id = submitted["taskId"].as_str().unwrap();

    let body = wait_for_terminal(&app, task_id).await;

    assert_eq!(body["taskId"], *task_id);
    assert_eq!(body["status"], "completed");
    assert!(body["result"].is_number());
    assert!(body["duration"].is_number());
    assert_eq!(body["iterations"], 50_000);
}

#[tokio::test]
async fn terminal_status_is_stable_across_polls() {
    let app = app();

    let (_, submitted) = post(&app, "/tasks/heavy", json!({"iterations": 1_000})).await;
    let task_id = submitted["taskId"].as_str().unwrap();

    let first = wait_for_terminal(&app, task_id).await;
    let (status, second) = get(&app, &format!("/tasks/{}", task_id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
}

#[tokio::test]
async fn unknown_task_returns_404() {
    let app = app();

    let (status, body) = get(&app, "/tasks/00000000-0000-0000-0000-000000000000").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(error_of(&body).contains("not found"));
}

#[tokio::test]
async fn malformed_task_id_returns_404() {
    let app = app();

    let (status, _) = get(&app, "/tasks/invalid-id-123").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submissions_are_acknowledged_without_waiting_for_the_computation() {
    let app = app();
    let started = std::time::Instant::now();

    // One tiny and one maximal workload, back to back; both acknowledgements
    // must come straight back regardless of the iteration count.
    let (status, _) = post(&app, "/tasks/heavy", json!({"iterations": 1})).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, _) = post(&app, "/tasks/heavy", json!({"iterations": 1_000_000})).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    assert!(started.elapsed() < Duration::from_secs(1));
}
