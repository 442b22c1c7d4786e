use super::executor::TaskExecutor;
use super::protocol::{ErrorResponse, SubmitHeavyTaskResponse, TaskStatusResponse};
use super::registry::TaskRegistry;
use super::types::{TaskId, MAX_ITERATIONS};

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

/// `POST /tasks/heavy`: accepts a heavy task and acknowledges immediately.
///
/// Validates the body, creates the record, dispatches the computation and
/// answers 202 without waiting for it. Invalid input gets a 400 with a
/// descriptive error and causes no registry mutation.
pub async fn handle_submit_heavy_task(
    Extension(registry): Extension<Arc<TaskRegistry>>,
    Extension(executor): Extension<Arc<TaskExecutor>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let iterations = match parse_iterations(&body) {
        Ok(iterations) => iterations,
        Err(message) => {
            tracing::debug!("Rejected heavy task submission: {}", message);
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response();
        }
    };

    let task_id = match registry.create(iterations) {
        Ok(task_id) => task_id,
        Err(e) => {
            tracing::debug!("Rejected heavy task submission: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response();
        }
    };

    executor.dispatch(task_id, iterations);
    tracing::info!("Task {} submitted ({} iterations)", task_id, iterations);

    (
        StatusCode::ACCEPTED,
        Json(SubmitHeavyTaskResponse {
            task_id,
            status: "processing".to_string(),
            iterations,
        }),
    )
        .into_response()
}

/// `GET /tasks/:taskId`: renders the current state of a task.
///
/// Malformed identifiers are treated the same as unknown ones: 404 with an
/// error body. Polling is idempotent and never mutates the record.
pub async fn handle_get_task_status(
    Extension(registry): Extension<Arc<TaskRegistry>>,
    Path(task_id): Path<String>,
) -> Response {
    let Some(task_id) = TaskId::parse(&task_id) else {
        tracing::debug!("Task status query for malformed id: {}", task_id);
        return task_not_found();
    };

    match registry.get(&task_id) {
        Some(record) => {
            tracing::debug!(
                "Task status query: {} -> {}",
                task_id,
                record.status.label()
            );
            (StatusCode::OK, Json(TaskStatusResponse::from(&record))).into_response()
        }
        None => {
            tracing::debug!("Task not found: {}", task_id);
            task_not_found()
        }
    }
}

fn task_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Task not found")),
    )
        .into_response()
}

/// Validates the `iterations` field of a submission body.
///
/// Must be present, numeric, integral, positive and at most
/// [`MAX_ITERATIONS`]. The returned message is the `error` body of the 400
/// response.
pub fn parse_iterations(body: &serde_json::Value) -> Result<u64, String> {
    let raw = match body.get("iterations") {
        Some(raw) => raw,
        None => return Err("iterations is required".to_string()),
    };

    let iterations = match raw.as_u64() {
        Some(iterations) => iterations,
        // Negative integers and non-integral numbers both land here.
        None if raw.is_number() => {
            return Err("iterations must be a positive integer".to_string());
        }
        None => return Err("iterations must be a number".to_string()),
    };

    if iterations == 0 {
        return Err("iterations must be a positive integer".to_string());
    }
    if iterations > MAX_ITERATIONS {
        return Err(format!(
            "iterations must not exceed {}",
            MAX_ITERATIONS
        ));
    }

    Ok(iterations)
}
