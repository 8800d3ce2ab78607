//! User management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::User,
    AppState,
};

use super::SearchQuery;

/// List users, optionally searching name and email
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(SearchQuery),
    responses(
        (status = 200, description = "List of users", body = Vec<User>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, AppError>,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.list(query.search.as_deref()).await?;
    Ok(Json(users))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = crate::models::UserPayload,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input", body = crate::validation::FieldErrors)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<(StatusCode, Json<User>)> {
    let created = state.services.users.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<User>> {
    let user = state.services.users.get(id).await?;
    Ok(Json(user))
}

/// Replace an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = crate::models::UserPayload,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid input", body = crate::validation::FieldErrors),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<Value>, AppError>,
) -> AppResult<Json<User>> {
    let updated = state.services.users.update(id, &payload).await?;
    Ok(Json(updated))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<StatusCode> {
    state.services.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
