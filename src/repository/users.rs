//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id [{}] not exists.", id)))
    }

    /// List all users
    pub async fn list_all(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Check if a display name is already taken
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE name = $1 AND id != $2)")
                .bind(name)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Check if an email is already taken
    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND id != $2)",
            )
            .bind(email)
            .bind(id)
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    /// Create a new user. A concurrent writer can slip past the service-level
    /// uniqueness pre-check; the UNIQUE constraint still surfaces as a
    /// conflict here.
    pub async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id",
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(
                e,
                "User not saved. User with the same name or email already exists.",
            )
        })?;

        self.get_by_id(id).await
    }

    /// Update an existing user; absent fields keep their stored values
    pub async fn update(&self, id: i32, user: &UpdateUser) -> AppResult<User> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                email = COALESCE($2, email)
            WHERE id = $3
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(
                e,
                "User not updated. User with the same name or email already exists.",
            )
        })?;

        self.get_by_id(id).await
    }

    /// Delete a user by ID
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Translate a unique-constraint violation into a conflict; every other
/// database failure passes through unchanged.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(e),
    }
}
