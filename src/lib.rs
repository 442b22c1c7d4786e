//! Heavy-Task REST Service Library
//!
//! This library crate defines the modules that make up the service. It serves
//! as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! The service is composed of three loosely coupled parts:
//!
//! - **`tasks`**: The asynchronous heavy-task engine. Submissions are
//!   acknowledged immediately with a task id while the CPU-bound computation
//!   runs off the request-handling path; clients poll for the result.
//! - **`users`**: The user-record CRUD resource backed by an in-memory store
//!   with email uniqueness and paginated listing.
//! - **`server`**: The HTTP route table, wiring injected components into
//!   axum handlers, plus the liveness probe.

pub mod server;
pub mod tasks;
pub mod users;
