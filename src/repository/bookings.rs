//! Bookings repository for database operations.
//!
//! Every fetch function states the related data it joins; there is no lazy
//! association loading anywhere.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetails, BookingStatus, SearchState},
        item::{BookingForItem, Item},
        page::Page,
        user::User,
    },
};

/// Joined select for a booking with its item (and the item's owner reference)
/// and its booker.
const BOOKING_DETAILS_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status,
           i.id AS item_id, i.name AS item_name, i.description AS item_description,
           i.available AS item_available, i.owner_id AS item_owner_id,
           i.request_id AS item_request_id,
           u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
    FROM bookings b
    JOIN items i ON b.item_id = i.id
    JOIN users u ON b.booker_id = u.id
"#;

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a booking by ID with its item, the item's owner reference and the
    /// booker eagerly attached
    pub async fn get_with_item_and_booker(&self, id: i32) -> AppResult<BookingDetails> {
        let row = sqlx::query(&format!("{} WHERE b.id = $1", BOOKING_DETAILS_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id [{}] not exists.", id)))?;

        Ok(details_from_row(&row))
    }

    /// Get a booking row inside a transaction, locking it for update so a
    /// concurrent status transition cannot interleave
    pub async fn get_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "SELECT id, start_date, end_date, status, item_id, booker_id \
             FROM bookings WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking with id [{}] not exists.", id)))
    }

    /// Create a new booking in WAITING status
    pub async fn create(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        item_id: i32,
        booker_id: i32,
    ) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO bookings (start_date, end_date, status, item_id, booker_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(BookingStatus::Waiting)
        .bind(item_id)
        .bind(booker_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Set a booking's status inside an ongoing transaction
    pub async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        status: BookingStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE bookings SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// List a booker's bookings filtered by state, latest start first
    pub async fn list_for_booker(
        &self,
        booker_id: i32,
        state: SearchState,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<BookingDetails>> {
        self.list_filtered("b.booker_id = $1", booker_id, state, now, page)
            .await
    }

    /// List bookings on items owned by a user, filtered by state,
    /// latest start first
    pub async fn list_for_owner(
        &self,
        owner_id: i32,
        state: SearchState,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<BookingDetails>> {
        self.list_filtered("i.owner_id = $1", owner_id, state, now, page)
            .await
    }

    async fn list_filtered(
        &self,
        party_condition: &str,
        party_id: i32,
        state: SearchState,
        now: DateTime<Utc>,
        page: Page,
    ) -> AppResult<Vec<BookingDetails>> {
        let mut sql = format!("{} WHERE {}", BOOKING_DETAILS_SELECT, party_condition);
        match state {
            SearchState::All => {}
            SearchState::Current => sql.push_str(" AND b.start_date < $2 AND b.end_date > $2"),
            SearchState::Past => sql.push_str(" AND b.end_date < $2"),
            SearchState::Future => sql.push_str(" AND b.start_date > $2"),
            SearchState::Waiting | SearchState::Rejected => sql.push_str(" AND b.status = $2"),
        }
        sql.push_str(&format!(
            " ORDER BY b.start_date DESC LIMIT {} OFFSET {}",
            page.limit(),
            page.offset()
        ));

        let query = sqlx::query(&sql).bind(party_id);
        let query = match state {
            SearchState::All => query,
            SearchState::Waiting => query.bind(BookingStatus::Waiting),
            SearchState::Rejected => query.bind(BookingStatus::Rejected),
            SearchState::Current | SearchState::Past | SearchState::Future => query.bind(now),
        };

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Whether the user has an approved booking of the item that has already
    /// ended (the comment eligibility rule)
    pub async fn has_completed(
        &self,
        booker_id: i32,
        item_id: i32,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE booker_id = $1 AND item_id = $2
                  AND status = $3 AND end_date < $4
            )
            "#,
        )
        .bind(booker_id)
        .bind(item_id)
        .bind(BookingStatus::Approved)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// WAITING and APPROVED bookings of one item, with booker references,
    /// for last/next classification
    pub async fn list_active_for_item(&self, item_id: i32) -> AppResult<Vec<BookingForItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, start_date, end_date, status, booker_id
            FROM bookings
            WHERE item_id = $1 AND status IN ('WAITING', 'APPROVED')
            ORDER BY id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(booking_for_item_from_row).collect())
    }

    /// WAITING and APPROVED bookings across several items, grouped by item.
    /// Batched so the owner-items listing avoids one lookup per item.
    pub async fn map_active_by_item(
        &self,
        item_ids: &[i32],
    ) -> AppResult<HashMap<i32, Vec<BookingForItem>>> {
        let rows = sqlx::query(
            r#"
            SELECT id, start_date, end_date, status, item_id, booker_id
            FROM bookings
            WHERE item_id = ANY($1) AND status IN ('WAITING', 'APPROVED')
            ORDER BY id
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<i32, Vec<BookingForItem>> = HashMap::new();
        for row in &rows {
            let item_id: i32 = row.get("item_id");
            map.entry(item_id)
                .or_default()
                .push(booking_for_item_from_row(row));
        }
        Ok(map)
    }
}

fn details_from_row(row: &PgRow) -> BookingDetails {
    BookingDetails {
        id: row.get("id"),
        start: row.get("start_date"),
        end: row.get("end_date"),
        status: row.get("status"),
        item: Item {
            id: row.get("item_id"),
            name: row.get("item_name"),
            description: row.get("item_description"),
            available: row.get("item_available"),
            owner_id: row.get("item_owner_id"),
            request_id: row.get("item_request_id"),
        },
        booker: User {
            id: row.get("booker_id"),
            name: row.get("booker_name"),
            email: row.get("booker_email"),
        },
    }
}

fn booking_for_item_from_row(row: &PgRow) -> BookingForItem {
    BookingForItem {
        id: row.get("id"),
        start: row.get("start_date"),
        end: row.get("end_date"),
        status: row.get("status"),
        booker_id: row.get("booker_id"),
    }
}
