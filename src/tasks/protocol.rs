//! Wire Contracts for the Task Endpoints
//!
//! Data Transfer Objects for task submission and status polling. Field names
//! are camelCase on the wire; terminal-only fields are omitted (not null)
//! while a task is still processing.

use super::types::{TaskId, TaskRecord, TaskStatus};
use serde::{Deserialize, Serialize};

/// Acknowledgement returned by `POST /tasks/heavy` (HTTP 202).
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitHeavyTaskResponse {
    pub task_id: TaskId,
    pub status: String,
    pub iterations: u64,
}

/// Projection of a task record returned by `GET /tasks/:taskId`.
///
/// Built from [`TaskStatus`] only here, at the boundary: `result` and
/// `duration` appear exactly when the task completed, `errorMessage` exactly
/// when it failed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusResponse {
    pub task_id: TaskId,
    pub status: String,
    pub iterations: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&TaskRecord> for TaskStatusResponse {
    fn from(record: &TaskRecord) -> Self {
        let mut response = Self {
            task_id: record.id,
            status: record.status.label().to_string(),
            iterations: record.iterations,
            result: None,
            duration: None,
            error_message: None,
        };

        match &record.status {
            TaskStatus::Processing => {}
            TaskStatus::Completed {
                result,
                duration_ms,
            } => {
                response.result = Some(*result);
                response.duration = Some(*duration_ms);
            }
            TaskStatus::Error { message } => {
                response.error_message = Some(message.clone());
            }
        }

        response
    }
}

/// Error body shared by the 400 and 404 responses of the task endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
