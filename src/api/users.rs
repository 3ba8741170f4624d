//! User management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser, User},
};

use super::validate_body;

/// Create user request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Display name, unique
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Email address, unique
    #[validate(email, length(max = 200))]
    pub email: String,
}

/// Partial user update request; absent fields keep their stored values
#[derive(Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    #[validate(email, length(max = 200))]
    pub email: Option<String>,
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "List of users", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<crate::AppState>) -> AppResult<Json<Vec<User>>> {
    tracing::info!("Request to get all users.");
    let users = state.services.users.list_users().await?;
    Ok(Json(users))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    tracing::info!("Request to get user by id [{}].", id);
    let user = state.services.users.get_user(id).await?;
    Ok(Json(user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Name or email already exists")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    tracing::info!("Request to save user [{}].", request.name);
    validate_body(&request)?;

    let user = CreateUser {
        name: request.name,
        email: request.email,
    };
    let created = state.services.users.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update an existing user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found"),
        (status = 409, description = "Name or email already exists")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    tracing::info!("Request to update user with id [{}].", id);
    validate_body(&request)?;

    let update = UpdateUser {
        name: request.name,
        email: request.email,
    };
    let updated = state.services.users.update_user(id, update).await?;
    Ok(Json(updated))
}

/// Delete a user, returning the deleted record
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = User),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<User>> {
    tracing::info!("Request to delete user by id [{}].", id);
    let deleted = state.services.users.delete_user(id).await?;
    Ok(Json(deleted))
}
