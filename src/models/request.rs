//! Item request model and related types.
//!
//! A request is a user's posted ask for an item not currently listed,
//! distinct from a booking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::item::Item;

/// Item request record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ItemRequest {
    pub id: i32,
    pub description: String,
    pub requester_id: i32,
    pub created: DateTime<Utc>,
}

// Entity equality is by identifier only.
impl PartialEq for ItemRequest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ItemRequest {}

/// Request with the items listed in response to it
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestWithItems {
    pub id: i32,
    pub description: String,
    pub created: DateTime<Utc>,
    pub items: Vec<Item>,
}

impl RequestWithItems {
    pub fn new(request: ItemRequest, items: Vec<Item>) -> Self {
        Self {
            id: request.id,
            description: request.description,
            created: request.created,
            items,
        }
    }
}
