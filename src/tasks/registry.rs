//! Task Registry
//!
//! The process-wide store of task records. Maps task ids to their current
//! lifecycle state and owns every record exclusively: handlers and the
//! executor only read or request transitions through this interface.
//!
//! ## Concurrency
//! Backed by a `DashMap`, so `create`/`get`/`complete`/`fail` are atomic at
//! the level of a single record and operations on different records do not
//! contend. Readers always observe a record either before or after a
//! transition, never mid-update.

use super::types::{TaskId, TaskRecord, TaskStatus};

use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrency-safe store of all task records for the process lifetime.
///
/// Records are never evicted: terminal tasks accumulate until the process
/// exits, matching the ephemeral, poll-until-done contract of the API.
pub struct TaskRegistry {
    tasks: DashMap<TaskId, TaskRecord>,
}

impl TaskRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            tasks: DashMap::new(),
        })
    }

    /// Allocates a fresh id, stores a `Processing` record for it and returns
    /// the id. The record is visible to `get` as soon as this returns.
    ///
    /// Fails only when `iterations` is outside the accepted bound.
    pub fn create(&self, iterations: u64) -> Result<TaskId> {
        let id = TaskId::new();
        let record = TaskRecord::new(id, iterations)?;

        self.tasks.insert(id, record);
        tracing::debug!("Registered task {} ({} iterations)", id, iterations);

        Ok(id)
    }

    /// Returns a snapshot of the record's current state. Never blocks on an
    /// in-flight computation.
    pub fn get(&self, id: &TaskId) -> Option<TaskRecord> {
        self.tasks.get(id).map(|entry| entry.value().clone())
    }

    /// Transitions the record to `Completed`, attaching the result and the
    /// measured duration.
    ///
    /// Calling this for an unknown or already-terminal id is a logged no-op:
    /// it should not happen under correct use, but it must not corrupt state
    /// if it does.
    pub fn complete(&self, id: &TaskId, result: f64, duration_ms: u64) {
        match self.tasks.get_mut(id) {
            Some(mut entry) => {
                if entry.status.is_terminal() {
                    tracing::warn!(
                        "Ignoring completion of task {} already in state '{}'",
                        id,
                        entry.status.label()
                    );
                    return;
                }
                entry.status = TaskStatus::Completed {
                    result,
                    duration_ms,
                };
                tracing::info!("Task {} completed in {} ms", id, duration_ms);
            }
            None => {
                tracing::warn!("Ignoring completion of unknown task {}", id);
            }
        }
    }

    /// Transitions the record to `Error`, attaching the failure message.
    /// Same no-op-on-misuse guarantee as [`complete`](Self::complete).
    pub fn fail(&self, id: &TaskId, message: impl Into<String>) {
        let message = message.into();

        match self.tasks.get_mut(id) {
            Some(mut entry) => {
                if entry.status.is_terminal() {
                    tracing::warn!(
                        "Ignoring failure of task {} already in state '{}'",
                        id,
                        entry.status.label()
                    );
                    return;
                }
                tracing::error!("Task {} failed: {}", id, message);
                entry.status = TaskStatus::Error { message };
            }
            None => {
                tracing::warn!("Ignoring failure of unknown task {}", id);
            }
        }
    }

    /// Number of records currently held (any status).
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
