//! Data models for the ShareIt marketplace

pub mod booking;
pub mod comment;
pub mod item;
pub mod page;
pub mod request;
pub mod user;

// Re-export commonly used types
pub use booking::{Booking, BookingDetails, BookingStatus, SearchState};
pub use comment::CommentDetails;
pub use item::{BookingForItem, Item, ItemWithBookings};
pub use page::Page;
pub use request::{ItemRequest, RequestWithItems};
pub use user::User;
