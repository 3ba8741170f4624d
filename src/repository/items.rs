//! Items repository for database operations

use std::collections::HashMap;

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{CreateItem, Item, UpdateItem},
        page::Page,
    },
};

const ITEM_COLUMNS: &str = "id, name, description, available, owner_id, request_id";

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get item by ID, including its owner reference
    pub async fn get_by_id(&self, id: i32) -> AppResult<Item> {
        sqlx::query_as::<_, Item>(&format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id [{}] not exists.", id)))
    }

    /// List an owner's items, paged, in insertion order
    pub async fn list_by_owner(&self, owner_id: i32, page: Page) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE owner_id = $1 ORDER BY id LIMIT {} OFFSET {}",
            ITEM_COLUMNS,
            page.limit(),
            page.offset()
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Case-insensitive substring search over name and description,
    /// available items only
    pub async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        let pattern = format!("%{}%", text);
        let items = sqlx::query_as::<_, Item>(&format!(
            r#"
            SELECT {}
            FROM items
            WHERE available = TRUE
              AND (name ILIKE $1 OR description ILIKE $1)
            ORDER BY id
            "#,
            ITEM_COLUMNS
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Items listed in response to a request
    pub async fn list_by_request(&self, request_id: i32) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE request_id = $1 ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Items answering any of the given requests, grouped by request id.
    /// Batched so request listings avoid one lookup per request.
    pub async fn map_by_requests(&self, request_ids: &[i32]) -> AppResult<HashMap<i32, Vec<Item>>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {} FROM items WHERE request_id = ANY($1) ORDER BY id",
            ITEM_COLUMNS
        ))
        .bind(request_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<i32, Vec<Item>> = HashMap::new();
        for item in items {
            if let Some(request_id) = item.request_id {
                map.entry(request_id).or_default().push(item);
            }
        }
        Ok(map)
    }

    /// Create a new item owned by the given user
    pub async fn create(&self, owner_id: i32, item: &CreateItem) -> AppResult<Item> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO items (name, description, available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(owner_id)
        .bind(item.request_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Update an item; absent fields keep their stored values
    pub async fn update(&self, id: i32, item: &UpdateItem) -> AppResult<Item> {
        sqlx::query(
            r#"
            UPDATE items
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                available = COALESCE($3, available)
            WHERE id = $4
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.available)
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    /// Delete an item by ID
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
