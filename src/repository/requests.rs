//! Item requests repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{page::Page, request::ItemRequest},
};

const REQUEST_COLUMNS: &str = "id, description, requester_id, created";

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<ItemRequest> {
        sqlx::query_as::<_, ItemRequest>(&format!(
            "SELECT {} FROM requests WHERE id = $1",
            REQUEST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id [{}] not found.", id)))
    }

    /// A user's own requests, newest first
    pub async fn list_by_requester(&self, requester_id: i32) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(&format!(
            "SELECT {} FROM requests WHERE requester_id = $1 ORDER BY created DESC",
            REQUEST_COLUMNS
        ))
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Other users' requests, newest first, paged
    pub async fn list_of_others(&self, user_id: i32, page: Page) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(&format!(
            "SELECT {} FROM requests WHERE requester_id != $1 \
             ORDER BY created DESC LIMIT {} OFFSET {}",
            REQUEST_COLUMNS,
            page.limit(),
            page.offset()
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Create a new request with a server-assigned creation timestamp
    pub async fn create(
        &self,
        requester_id: i32,
        description: &str,
        created: DateTime<Utc>,
    ) -> AppResult<ItemRequest> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO requests (description, requester_id, created)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(description)
        .bind(requester_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }
}
