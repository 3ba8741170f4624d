//! ShareIt Marketplace Server
//!
//! A Rust implementation of the ShareIt item-sharing marketplace server:
//! users list items, other users book time windows on those items, and
//! requests solicit items not yet listed. REST JSON API over PostgreSQL.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
