//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{bookings, health, items, requests, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ShareIt API",
        version = "1.0.0",
        description = "Peer-to-peer item sharing REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Items
        items::create_item,
        items::update_item,
        items::get_item,
        items::list_items,
        items::delete_item,
        items::search_items,
        items::add_comment,
        // Bookings
        bookings::create_booking,
        bookings::approve_booking,
        bookings::get_booking,
        bookings::list_user_bookings,
        bookings::list_owner_bookings,
        // Requests
        requests::create_request,
        requests::list_own_requests,
        requests::list_all_requests,
        requests::get_request,
    ),
    components(
        schemas(
            // Users
            crate::models::user::User,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemWithBookings,
            crate::models::item::BookingForItem,
            items::CreateItemRequest,
            items::UpdateItemRequest,
            items::CommentRequest,
            // Bookings
            crate::models::booking::BookingDetails,
            crate::models::booking::BookingStatus,
            bookings::CreateBookingRequest,
            // Comments
            crate::models::comment::CommentDetails,
            // Requests
            crate::models::request::RequestWithItems,
            requests::CreateRequestRequest,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management"),
        (name = "items", description = "Item listings, search and comments"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "requests", description = "Item requests")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
