//! HTTP Surface
//!
//! Wires the route table and injects the shared components. The router is
//! built from explicitly passed-in state so tests can stand up isolated
//! instances with their own registry and stores.

use crate::tasks::executor::TaskExecutor;
use crate::tasks::handlers::{handle_get_task_status, handle_submit_heavy_task};
use crate::tasks::registry::TaskRegistry;
use crate::users::handlers::{
    handle_create_user, handle_delete_user, handle_get_user, handle_list_active_users,
    handle_list_users,
};
use crate::users::store::UserStore;

use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Builds the application router around the given components.
pub fn build_router(
    registry: Arc<TaskRegistry>,
    executor: Arc<TaskExecutor>,
    users: Arc<UserStore>,
) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/users", post(handle_create_user).get(handle_list_users))
        .route("/users/active", get(handle_list_active_users))
        .route(
            "/users/:userId",
            get(handle_get_user).delete(handle_delete_user),
        )
        .route("/tasks/heavy", post(handle_submit_heavy_task))
        .route("/tasks/:taskId", get(handle_get_task_status))
        .layer(Extension(registry))
        .layer(Extension(executor))
        .layer(Extension(users))
}

/// `GET /health`: liveness probe.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
