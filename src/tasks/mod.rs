//! Asynchronous Heavy-Task Subsystem
//!
//! Implements the submit/execute/poll engine behind `POST /tasks/heavy` and
//! `GET /tasks/:taskId`: a client submits a CPU-bound computation, gets an
//! immediate acknowledgement with a task id, and polls until the result is
//! available.
//!
//! ## Lifecycle
//! 1. **Submission**: the handler validates the input, creates a `Processing`
//!    record in the [`registry`] and dispatches the computation through the
//!    [`executor`]. The 202 response never waits on the computation.
//! 2. **Execution**: the computation runs on the blocking thread pool,
//!    concurrently with request handling and with other tasks.
//! 3. **Completion**: the executor makes exactly one `complete`/`fail` call
//!    back into the registry; the status transitions once and never
//!    regresses.
//! 4. **Polling**: the status handler renders a snapshot of the record;
//!    terminal payloads are stable across repeated polls.
//!
//! ## Submodules
//! - **`types`**: task id, status variants and the stored record.
//! - **`registry`**: the concurrency-safe id -> record store.
//! - **`executor`**: off-path execution and the workload itself.
//! - **`protocol`**: wire DTOs for the two endpoints.
//! - **`handlers`**: the axum handlers.

pub mod executor;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod types;
