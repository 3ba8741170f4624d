//! Booking engine: creation, owner approval and state-filtered retrieval

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{BookingDetails, BookingStatus, CreateBooking, SearchState},
        page::Page,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a booking in WAITING status.
    ///
    /// The window must lie strictly in the future with start before end, the
    /// item must exist and be available, and the booker must exist and must
    /// not own the item. Overlapping windows on the same item are allowed.
    pub async fn add_booking(
        &self,
        booker_id: i32,
        booking: CreateBooking,
    ) -> AppResult<BookingDetails> {
        let now = Utc::now();
        if !is_valid_window(booking.start, booking.end, now) {
            return Err(AppError::Validation(
                "Wrong booking start-end time!".to_string(),
            ));
        }

        self.repository
            .users
            .get_by_id(booker_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::NotFound(format!("Requester with id [{}] not exists.", booker_id))
                }
                other => other,
            })?;
        let item = self
            .repository
            .items
            .get_by_id(booking.item_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound(format!(
                    "Item for booking with id [{}] not exists.",
                    booking.item_id
                )),
                other => other,
            })?;

        if !item.available {
            return Err(AppError::Validation("Item not available.".to_string()));
        }
        // A not-found-class error, so owners cannot probe their own listings.
        if item.owner_id == booker_id {
            return Err(AppError::NotFound(
                "Owner of item cannot be a booker.".to_string(),
            ));
        }

        let id = self
            .repository
            .bookings
            .create(booking.start, booking.end, booking.item_id, booker_id)
            .await?;

        self.repository.bookings.get_with_item_and_booker(id).await
    }

    /// Approve or reject a WAITING booking; owner only.
    ///
    /// Once APPROVED a booking accepts no further transition. The
    /// load-check-mutate sequence runs in one transaction under a row lock.
    pub async fn approve_booking(
        &self,
        user_id: i32,
        booking_id: i32,
        approved: bool,
    ) -> AppResult<BookingDetails> {
        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };

        let mut tx = self.repository.pool.begin().await?;
        let booking = self
            .repository
            .bookings
            .get_for_update(&mut tx, booking_id)
            .await?;
        let item = self.repository.items.get_by_id(booking.item_id).await?;

        if user_id != item.owner_id {
            return Err(AppError::NotOwner(format!(
                "User with id [{}] not owner of Item.",
                user_id
            )));
        }
        if booking.status == BookingStatus::Approved {
            return Err(AppError::Validation(
                "Owner cannot change status after approval.".to_string(),
            ));
        }

        self.repository
            .bookings
            .set_status(&mut tx, booking_id, status)
            .await?;
        tx.commit().await?;

        self.repository
            .bookings
            .get_with_item_and_booker(booking_id)
            .await
    }

    /// Get a booking by ID; visible to the booker and the item's owner only
    pub async fn get_booking(&self, booking_id: i32, user_id: i32) -> AppResult<BookingDetails> {
        let booking = self
            .repository
            .bookings
            .get_with_item_and_booker(booking_id)
            .await?;

        if user_id != booking.booker.id && user_id != booking.item.owner_id {
            return Err(AppError::NotFound(format!(
                "User with id [{}] isn't owner or requester.",
                user_id
            )));
        }
        Ok(booking)
    }

    /// List a booker's bookings filtered by state, latest start first
    pub async fn get_user_bookings(
        &self,
        user_id: i32,
        state: SearchState,
        page: Page,
    ) -> AppResult<Vec<BookingDetails>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository
            .bookings
            .list_for_booker(user_id, state, Utc::now(), page)
            .await
    }

    /// List bookings on a user's items filtered by state, latest start first
    pub async fn get_owner_bookings(
        &self,
        owner_id: i32,
        state: SearchState,
        page: Page,
    ) -> AppResult<Vec<BookingDetails>> {
        self.repository.users.get_by_id(owner_id).await?;
        self.repository
            .bookings
            .list_for_owner(owner_id, state, Utc::now(), page)
            .await
    }
}

/// Both endpoints strictly in the future, start strictly before end
fn is_valid_window(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start > now && end > now && start < end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn accepts_future_window_with_start_before_end() {
        let t = now();
        assert!(is_valid_window(
            t + Duration::days(1),
            t + Duration::days(2),
            t
        ));
    }

    #[test]
    fn rejects_start_in_the_past() {
        let t = now();
        assert!(!is_valid_window(
            t - Duration::hours(1),
            t + Duration::days(1),
            t
        ));
    }

    #[test]
    fn rejects_end_before_start() {
        let t = now();
        assert!(!is_valid_window(
            t + Duration::days(2),
            t + Duration::days(1),
            t
        ));
    }

    #[test]
    fn rejects_equal_start_and_end() {
        let t = now();
        let point = t + Duration::days(1);
        assert!(!is_valid_window(point, point, t));
    }

    #[test]
    fn rejects_window_equal_to_now() {
        let t = now();
        assert!(!is_valid_window(t, t + Duration::days(1), t));
    }
}
