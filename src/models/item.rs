//! Item (listing) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::booking::BookingStatus;
use super::comment::CommentDetails;

/// Item record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i32,
    pub request_id: Option<i32>,
}

// Entity equality is by identifier only.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

/// Fields for creating an item
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i32>,
}

/// Partial item update; absent or blank fields keep their stored values
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Booking projection embedded in an item view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingForItem {
    pub id: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub booker_id: i32,
}

/// Item with its nearest past/future bookings and comments.
///
/// `last_booking` and `next_booking` are populated only for the item's owner
/// on the single-item view; the owner-items listing always carries them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemWithBookings {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i32>,
    pub last_booking: Option<BookingForItem>,
    pub next_booking: Option<BookingForItem>,
    pub comments: Vec<CommentDetails>,
}

impl ItemWithBookings {
    pub fn new(
        item: Item,
        last_booking: Option<BookingForItem>,
        next_booking: Option<BookingForItem>,
        comments: Vec<CommentDetails>,
    ) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
            last_booking,
            next_booking,
            comments,
        }
    }
}
