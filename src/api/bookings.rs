//! Booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::{
        booking::{BookingDetails, CreateBooking, SearchState},
        page::Page,
    },
};

use super::SharerId;

/// Create booking request
#[derive(Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    /// Start of the booked window, strictly in the future
    pub start: DateTime<Utc>,
    /// End of the booked window, strictly after start
    pub end: DateTime<Utc>,
    /// Item to book
    pub item_id: i32,
}

/// Approve/reject query flag
#[derive(Deserialize, IntoParams)]
pub struct ApproveQuery {
    pub approved: bool,
}

/// State filter and pagination for booking listings
#[derive(Deserialize, IntoParams)]
pub struct BookingListQuery {
    /// ALL (default), CURRENT, PAST, FUTURE, WAITING or REJECTED,
    /// case-insensitive
    pub state: Option<String>,
    /// Zero-based row offset, snaps to page boundaries
    pub from: Option<i64>,
    /// Page size
    pub size: Option<i64>,
}

impl BookingListQuery {
    fn state(&self) -> AppResult<SearchState> {
        SearchState::parse(self.state.as_deref().unwrap_or("ALL"))
    }

    fn page(&self) -> AppResult<Page> {
        Page::new(self.from.unwrap_or(0), self.size.unwrap_or(20))
    }
}

/// Create a booking for an item
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBookingRequest,
    params(
        ("X-Sharer-User-Id" = i32, Header, description = "Booker user ID")
    ),
    responses(
        (status = 201, description = "Booking created in WAITING status", body = BookingDetails),
        (status = 400, description = "Bad time window or item unavailable"),
        (status = 404, description = "Booker or item not found, or booker owns the item")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    SharerId(booker_id): SharerId,
    Json(request): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingDetails>)> {
    tracing::info!(
        "Request to add booking for item [{}] with userId [{}].",
        request.item_id,
        booker_id
    );

    let booking = CreateBooking {
        start: request.start,
        end: request.end,
        item_id: request.item_id,
    };
    let created = state.services.bookings.add_booking(booker_id, booking).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Approve or reject a booking; item owner only
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i32, Path, description = "Booking ID"),
        ApproveQuery,
        ("X-Sharer-User-Id" = i32, Header, description = "Owner user ID")
    ),
    responses(
        (status = 200, description = "Booking approved or rejected", body = BookingDetails),
        (status = 400, description = "Booking already approved"),
        (status = 404, description = "Booking not found or user not owner")
    )
)]
pub async fn approve_booking(
    State(state): State<crate::AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i32>,
    Query(query): Query<ApproveQuery>,
) -> AppResult<Json<BookingDetails>> {
    tracing::info!(
        "Request to approve booking with userId [{}], bookingId [{}], approved [{}].",
        user_id,
        id,
        query.approved
    );
    let booking = state
        .services
        .bookings
        .approve_booking(user_id, id, query.approved)
        .await?;
    Ok(Json(booking))
}

/// Get a booking; visible to the booker and the item's owner
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i32, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i32, Header, description = "Acting user ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingDetails),
        (status = 404, description = "Booking not found or user is neither party")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    SharerId(user_id): SharerId,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetails>> {
    tracing::info!("Request to get booking by id [{}] with userId [{}].", id, user_id);
    let booking = state.services.bookings.get_booking(id, user_id).await?;
    Ok(Json(booking))
}

/// List the acting user's bookings, state-filtered, latest start first
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        BookingListQuery,
        ("X-Sharer-User-Id" = i32, Header, description = "Booker user ID")
    ),
    responses(
        (status = 200, description = "Booker's bookings", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state token or bad pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_user_bookings(
    State(state): State<crate::AppState>,
    SharerId(user_id): SharerId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    tracing::info!(
        "Request to get all user's bookings with userId [{}] and state [{}].",
        user_id,
        query.state.as_deref().unwrap_or("ALL")
    );
    let bookings = state
        .services
        .bookings
        .get_user_bookings(user_id, query.state()?, query.page()?)
        .await?;
    Ok(Json(bookings))
}

/// List bookings on the acting user's items, state-filtered,
/// latest start first
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        BookingListQuery,
        ("X-Sharer-User-Id" = i32, Header, description = "Owner user ID")
    ),
    responses(
        (status = 200, description = "Owner's bookings", body = Vec<BookingDetails>),
        (status = 400, description = "Unknown state token or bad pagination"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_owner_bookings(
    State(state): State<crate::AppState>,
    SharerId(owner_id): SharerId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<BookingDetails>>> {
    tracing::info!(
        "Request to get all owner's bookings with ownerId [{}] and state [{}].",
        owner_id,
        query.state.as_deref().unwrap_or("ALL")
    );
    let bookings = state
        .services
        .bookings
        .get_owner_bookings(owner_id, query.state()?, query.page()?)
        .await?;
    Ok(Json(bookings))
}
