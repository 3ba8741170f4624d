//! Comments repository for database operations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::comment::CommentDetails,
};

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a comment by ID with the author's display name attached
    pub async fn get_with_author(&self, id: i32) -> AppResult<CommentDetails> {
        sqlx::query_as::<_, CommentDetails>(
            r#"
            SELECT c.id, c.text, u.name AS author_name, c.created
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment with id [{}] not exists.", id)))
    }

    /// Comments on one item, with author names, oldest first
    pub async fn list_for_item(&self, item_id: i32) -> AppResult<Vec<CommentDetails>> {
        let comments = sqlx::query_as::<_, CommentDetails>(
            r#"
            SELECT c.id, c.text, u.name AS author_name, c.created
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.item_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    /// Comments across several items, grouped by item. Batched so the
    /// owner-items listing avoids one lookup per item.
    pub async fn map_by_item(
        &self,
        item_ids: &[i32],
    ) -> AppResult<HashMap<i32, Vec<CommentDetails>>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.text, c.item_id, u.name AS author_name, c.created
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.item_id = ANY($1)
            ORDER BY c.id
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<i32, Vec<CommentDetails>> = HashMap::new();
        for row in &rows {
            let item_id: i32 = row.get("item_id");
            map.entry(item_id).or_default().push(CommentDetails {
                id: row.get("id"),
                text: row.get("text"),
                author_name: row.get("author_name"),
                created: row.get("created"),
            });
        }
        Ok(map)
    }

    /// Create a new comment with a server-assigned creation timestamp
    pub async fn create(
        &self,
        item_id: i32,
        author_id: i32,
        text: &str,
        created: DateTime<Utc>,
    ) -> AppResult<CommentDetails> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO comments (text, item_id, author_id, created)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(text)
        .bind(item_id)
        .bind(author_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        self.get_with_author(id).await
    }
}
