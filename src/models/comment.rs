//! Comment model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Comment with the author's display name attached
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CommentDetails {
    pub id: i32,
    pub text: String,
    pub author_name: String,
    pub created: DateTime<Utc>,
}
