//! API handlers for the ShareIt REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use validator::Validate;

use crate::{error::AppError, AppState};

/// Out-of-band header carrying the acting user's identifier
pub const USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Extractor for the acting user id from the X-Sharer-User-Id header
pub struct SharerId(pub i32);

#[async_trait]
impl FromRequestParts<AppState> for SharerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Validation(format!("Missing {} header.", USER_ID_HEADER))
            })?;

        let id = value.trim().parse::<i32>().map_err(|_| {
            AppError::Validation(format!("Invalid {} header: [{}].", USER_ID_HEADER, value))
        })?;

        Ok(SharerId(id))
    }
}

/// Run validator-derived checks on a request body, mapping failures to a
/// validation error
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}
