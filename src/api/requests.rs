//! Item request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{page::Page, request::RequestWithItems},
};

use super::{validate_body, SharerId};

/// Create request body
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateRequestRequest {
    /// What the user is looking for
    #[validate(length(min = 1, max = 200))]
    pub description: String,
}

/// Pagination for the all-requests listing
#[derive(Deserialize, IntoParams)]
pub struct RequestListQuery {
    /// Zero-based row offset, snaps to page boundaries
    pub from: Option<i64>,
    /// Page size
    pub size: Option<i64>,
}

/// Post a request for an item not currently listed
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateRequestRequest,
    params(
        ("X-Sharer-User-Id" = i32, Header, description = "Requesting user ID")
    ),
    responses(
        (status = 201, description = "Request created", body = RequestWithItems),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
    Json(request): Json<CreateRequestRequest>,
) -> AppResult<(StatusCode, Json<RequestWithItems>)> {
    tracing::info!("Request to add item request with userId [{}].", requester_id);
    validate_body(&request)?;

    let created = state
        .services
        .requests
        .add_request(requester_id, request.description)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List the acting user's own requests with their answering items
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i32, Header, description = "Requesting user ID")
    ),
    responses(
        (status = 200, description = "User's requests", body = Vec<RequestWithItems>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_own_requests(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
) -> AppResult<Json<Vec<RequestWithItems>>> {
    tracing::info!("Request to get own item requests with userId [{}].", requester_id);
    let requests = state.services.requests.get_own_requests(requester_id).await?;
    Ok(Json(requests))
}

/// List other users' requests, newest first, paged
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(
        RequestListQuery,
        ("X-Sharer-User-Id" = i32, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Other users' requests", body = Vec<RequestWithItems>),
        (status = 400, description = "Bad pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_all_requests(
    State(state): State<crate::AppState>,
    SharerId(user_id): SharerId,
    Query(query): Query<RequestListQuery>,
) -> AppResult<Json<Vec<RequestWithItems>>> {
    tracing::info!("Request to get all item requests with userId [{}].", user_id);
    let page = Page::new(query.from.unwrap_or(0), query.size.unwrap_or(20))?;
    let requests = state.services.requests.get_all_requests(user_id, page).await?;
    Ok(Json(requests))
}

/// Get a request by ID with its answering items
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i32, Path, description = "Request ID"),
        ("X-Sharer-User-Id" = i32, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Request details", body = RequestWithItems),
        (status = 404, description = "Request or user not found")
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i32>,
) -> AppResult<Json<RequestWithItems>> {
    tracing::info!("Request to get item request by id [{}] with userId [{}].", id, user_id);
    let request = state.services.requests.get_request(user_id, id).await?;
    Ok(Json(request))
}
