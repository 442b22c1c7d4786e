use super::protocol::{ErrorResponse, NewUser, Pagination, UserListResponse};
use super::store::{UserStore, UserStoreError};
use super::types::{User, UserId};

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::OnceLock;

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

/// `POST /users`: creates a user.
///
/// 400 on invalid input, 409 when the email is already taken, otherwise 201
/// with the full record.
pub async fn handle_create_user(
    Extension(store): Extension<Arc<UserStore>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let new_user = match parse_new_user(&body) {
        Ok(new_user) => new_user,
        Err(message) => {
            tracing::debug!("Rejected user creation: {}", message);
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response();
        }
    };

    match store.create(&new_user.name, &new_user.email).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e @ UserStoreError::DuplicateEmail(_)) => {
            tracing::debug!("Rejected user creation: {}", e);
            (
                StatusCode::CONFLICT,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// `GET /users`: paginated listing in insertion order.
///
/// Out-of-range parameters are clamped rather than rejected: non-positive
/// values fall back to the defaults, oversized limits are capped. A page
/// past the end returns empty `data` with the requested page echoed back.
pub async fn handle_list_users(
    Extension(store): Extension<Arc<UserStore>>,
    Query(params): Query<ListUsersParams>,
) -> Json<UserListResponse> {
    let page = match params.page {
        Some(page) if page >= 1 => page as u64,
        _ => DEFAULT_PAGE,
    };
    let limit = match params.limit {
        Some(limit) if limit >= 1 => (limit as u64).min(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    };

    let (data, total) = store.page(page, limit).await;
    let pages = total.div_ceil(limit);

    Json(UserListResponse {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            pages,
        },
    })
}

/// `GET /users/active`: bare array of users still flagged active.
pub async fn handle_list_active_users(
    Extension(store): Extension<Arc<UserStore>>,
) -> Json<Vec<User>> {
    Json(store.active().await)
}

/// `GET /users/:userId`: single record, 404 for unknown or malformed ids.
pub async fn handle_get_user(
    Extension(store): Extension<Arc<UserStore>>,
    Path(user_id): Path<String>,
) -> Response {
    let Some(user_id) = UserId::parse(&user_id) else {
        return user_not_found();
    };

    match store.get(&user_id).await {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => user_not_found(),
    }
}

/// `DELETE /users/:userId`: 204 without a body, 404 otherwise.
pub async fn handle_delete_user(
    Extension(store): Extension<Arc<UserStore>>,
    Path(user_id): Path<String>,
) -> Response {
    let Some(user_id) = UserId::parse(&user_id) else {
        return user_not_found();
    };

    if store.delete(&user_id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        user_not_found()
    }
}

fn user_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("User not found")),
    )
        .into_response()
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

/// Validates the body of `POST /users`. The returned message becomes the
/// `error` field of the 400 response.
pub fn parse_new_user(body: &serde_json::Value) -> Result<NewUser, String> {
    let name = match body.get("name").and_then(serde_json::Value::as_str) {
        Some(name) => name.trim(),
        None => return Err("name is required".to_string()),
    };
    if name.chars().count() < 2 {
        return Err("name must be at least 2 characters".to_string());
    }
    if name.chars().count() > 100 {
        return Err("name must be at most 100 characters".to_string());
    }

    let email = match body.get("email").and_then(serde_json::Value::as_str) {
        Some(email) => email,
        None => return Err("email is required".to_string()),
    };
    if !email_regex().is_match(email) {
        return Err("email must be a valid email address".to_string());
    }

    Ok(NewUser {
        name: name.to_string(),
        email: email.to_string(),
    })
}
