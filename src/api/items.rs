//! Item listing endpoints

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
    models::{
        comment::CommentDetails,
        item::{CreateItem, Item, ItemWithBookings, UpdateItem},
        page::Page,
    },
};

use super::{validate_body, SharerId};

/// Create item request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    /// Availability flag
    pub available: bool,
    /// Request this item answers, if any
    pub request_id: Option<i32>,
}

/// Partial item update request; absent or blank fields keep stored values
#[derive(Deserialize, ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Add comment request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 250))]
    pub text: String,
}

/// Pagination query for the owner-items listing
#[derive(Deserialize, IntoParams)]
pub struct OwnerItemsQuery {
    /// Zero-based row offset, snaps to page boundaries
    pub from: Option<i64>,
    /// Page size
    pub size: Option<i64>,
}

/// Free-text search query
#[derive(Deserialize, IntoParams)]
pub struct SearchQuery {
    pub text: String,
}

/// Create a new item owned by the acting user
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItemRequest,
    params(
        ("X-Sharer-User-Id" = i32, Header, description = "Acting user ID")
    ),
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Owner not found")
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Json(request): Json<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<Item>)> {
    tracing::info!("Request to add item [{}] with ownerId [{}].", request.name, owner_id);
    validate_body(&request)?;

    let item = CreateItem {
        name: request.name,
        description: request.description,
        available: request.available,
        request_id: request.request_id,
    };
    let created = state.services.items.add_item(owner_id, item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Partially update an item; owner only
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i32, Header, description = "Acting user ID")
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found or user not owner")
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Path(id): Path<i32>,
    Json(request): Json<UpdateItemRequest>,
) -> AppResult<Json<Item>> {
    tracing::info!("Request to update item with id [{}] by ownerId [{}].", id, owner_id);

    let update = UpdateItem {
        name: request.name,
        description: request.description,
        available: request.available,
    };
    let updated = state.services.items.update_item(id, owner_id, update).await?;
    Ok(Json(updated))
}

/// Get an item with comments; nearest bookings visible to the owner only
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i32, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Item view", body = ItemWithBookings),
        (status = 404, description = "Item or user not found")
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    SharerId(requester_id): SharerId,
    Path(id): Path<i32>,
) -> AppResult<Json<ItemWithBookings>> {
    tracing::info!("Request to get item by id [{}] with userId [{}].", id, requester_id);
    let view = state.services.items.get_item_by_id(id, requester_id).await?;
    Ok(Json(view))
}

/// List the acting user's items with nearest bookings and comments, paged
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        OwnerItemsQuery,
        ("X-Sharer-User-Id" = i32, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Owner's items", body = Vec<ItemWithBookings>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Query(query): Query<OwnerItemsQuery>,
) -> AppResult<Json<Vec<ItemWithBookings>>> {
    tracing::info!("Request to get all items of ownerId [{}].", owner_id);
    let page = Page::new(query.from.unwrap_or(0), query.size.unwrap_or(20))?;
    let views = state.services.items.get_owner_items(owner_id, page).await?;
    Ok(Json(views))
}

/// Delete an item; owner only. Returns the deleted record.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i32, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Item deleted", body = Item),
        (status = 404, description = "Item not found or user not owner")
    )
)]
pub async fn delete_item(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Path(id): Path<i32>,
) -> AppResult<Json<Item>> {
    tracing::info!("Request to delete item by id [{}] with ownerId [{}].", id, owner_id);
    let deleted = state.services.items.delete_item(id, owner_id).await?;
    Ok(Json(deleted))
}

/// Free-text search over available items
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching available items", body = Vec<Item>)
    )
)]
pub async fn search_items(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Item>>> {
    tracing::info!("Request to search items by text [{}].", query.text);
    let items = state.services.items.search(&query.text).await?;
    Ok(Json(items))
}

/// Add a comment to an item the acting user has rented
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("id" = i32, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i32, Header, description = "Acting user ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment added", body = CommentDetails),
        (status = 400, description = "Owner comment or commenter never rented the item"),
        (status = 404, description = "Item or user not found")
    )
)]
pub async fn add_comment(
    State(state): State<crate::AppState>,
    SharerId(commenter_id): SharerId,
    Path(id): Path<i32>,
    Json(request): Json<CommentRequest>,
) -> AppResult<Json<CommentDetails>> {
    tracing::info!("Request to add comment to item [{}] by userId [{}].", id, commenter_id);
    validate_body(&request)?;

    let comment = state
        .services
        .items
        .add_comment(id, commenter_id, request.text)
        .await?;
    Ok(Json(comment))
}
