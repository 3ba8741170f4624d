//! Booking model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::item::Item;
use super::user::User;
use crate::error::{AppError, AppResult};

/// Booking lifecycle status.
///
/// CANCELED exists in the schema but is reachable by no operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

/// Booking record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub item_id: i32,
    pub booker_id: i32,
}

// Entity equality is by identifier only.
impl PartialEq for Booking {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Booking {}

/// Booking enriched with its item and booker
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDetails {
    pub id: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: BookingStatus,
    pub item: Item,
    pub booker: User,
}

/// Fields for creating a booking
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item_id: i32,
}

/// Server-side filter for booking list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    All,
    Current,
    Past,
    Future,
    Waiting,
    Rejected,
}

impl SearchState {
    /// Parse a state token, case-insensitively. An unrecognized token is a
    /// dedicated unsupported-state error carrying the raw input.
    pub fn parse(token: &str) -> AppResult<Self> {
        match token.to_ascii_uppercase().as_str() {
            "ALL" => Ok(SearchState::All),
            "CURRENT" => Ok(SearchState::Current),
            "PAST" => Ok(SearchState::Past),
            "FUTURE" => Ok(SearchState::Future),
            "WAITING" => Ok(SearchState::Waiting),
            "REJECTED" => Ok(SearchState::Rejected),
            _ => Err(AppError::UnsupportedState(token.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tokens_case_insensitively() {
        assert_eq!(SearchState::parse("ALL").unwrap(), SearchState::All);
        assert_eq!(SearchState::parse("current").unwrap(), SearchState::Current);
        assert_eq!(SearchState::parse("Past").unwrap(), SearchState::Past);
        assert_eq!(SearchState::parse("fUtUrE").unwrap(), SearchState::Future);
        assert_eq!(SearchState::parse("waiting").unwrap(), SearchState::Waiting);
        assert_eq!(SearchState::parse("REJECTED").unwrap(), SearchState::Rejected);
    }

    #[test]
    fn unknown_token_carries_raw_input() {
        let err = SearchState::parse("UNSUPPORTED_STATUS").unwrap_err();
        match err {
            AppError::UnsupportedState(token) => assert_eq!(token, "UNSUPPORTED_STATUS"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn approved_is_not_a_filter_token() {
        // APPROVED is a lifecycle status but not a list filter.
        assert!(SearchState::parse("APPROVED").is_err());
    }
}
