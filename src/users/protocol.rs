//! Wire Contracts for the User Endpoints
//!
//! User records serialize directly (see [`super::types::User`]); this module
//! holds the list envelope, the validated creation input and the error body.

use super::types::User;
use serde::{Deserialize, Serialize};

/// Validated input of `POST /users`, produced by the boundary checks in
/// [`super::handlers`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

/// Envelope of `GET /users`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub data: Vec<User>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

/// Error body of the 400/404/409 responses of the user endpoints.
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
