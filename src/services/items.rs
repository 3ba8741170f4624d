//! Item listing service: CRUD, free-text search, the aggregation view with
//! nearest past/future bookings, and comment addition

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{
        comment::CommentDetails,
        item::{BookingForItem, CreateItem, Item, ItemWithBookings, UpdateItem},
        page::Page,
    },
    repository::Repository,
};

const ITEM_MAX_NAME_SIZE: usize = 200;
const ITEM_MAX_DESCRIPTION_SIZE: usize = 200;

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create an item owned by the given user. Name and description must be
    /// non-blank, not merely non-empty.
    pub async fn add_item(&self, owner_id: i32, item: CreateItem) -> AppResult<Item> {
        if item.name.trim().is_empty() {
            return Err(AppError::Validation(
                "Item not saved. Item with empty name.".to_string(),
            ));
        }
        if item.description.trim().is_empty() {
            return Err(AppError::Validation(
                "Item not saved. Item with empty description.".to_string(),
            ));
        }

        self.repository
            .users
            .get_by_id(owner_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound(format!(
                    "Item not saved. Owner of item with id [{}] not exists.",
                    owner_id
                )),
                other => other,
            })?;
        if let Some(request_id) = item.request_id {
            self.repository.requests.get_by_id(request_id).await?;
        }

        self.repository.items.create(owner_id, &item).await
    }

    /// Update an item; owner only. Absent or blank fields keep their stored
    /// values, and over-long name/description inputs are ignored.
    pub async fn update_item(
        &self,
        item_id: i32,
        owner_id: i32,
        update: UpdateItem,
    ) -> AppResult<Item> {
        let item = self.repository.items.get_by_id(item_id).await?;
        if item.owner_id != owner_id {
            return Err(AppError::NotOwner(
                "Item not updated. User isn't owner of item.".to_string(),
            ));
        }

        let update = sanitize_update(update);
        self.repository.items.update(item_id, &update).await
    }

    /// Delete an item; owner only. Returns the deleted record.
    pub async fn delete_item(&self, item_id: i32, owner_id: i32) -> AppResult<Item> {
        let item = self.repository.items.get_by_id(item_id).await?;
        if item.owner_id != owner_id {
            return Err(AppError::NotOwner(
                "Item not deleted. User isn't owner of item.".to_string(),
            ));
        }
        self.repository.items.delete(item_id).await?;
        Ok(item)
    }

    /// Single-item view with comments. Nearest past/future bookings are
    /// attached only when the requester owns the item.
    pub async fn get_item_by_id(
        &self,
        item_id: i32,
        requester_id: i32,
    ) -> AppResult<ItemWithBookings> {
        let requester = self.repository.users.get_by_id(requester_id).await?;
        let item = self.repository.items.get_by_id(item_id).await?;
        let comments = self.repository.comments.list_for_item(item_id).await?;

        if requester.id != item.owner_id {
            return Ok(ItemWithBookings::new(item, None, None, comments));
        }

        let bookings = self.repository.bookings.list_active_for_item(item_id).await?;
        let (last, next) = find_last_next(&bookings, Utc::now());
        Ok(ItemWithBookings::new(item, last, next, comments))
    }

    /// An owner's items with nearest bookings and comments, paged. Bookings
    /// and comments are batch-fetched across all items.
    pub async fn get_owner_items(
        &self,
        owner_id: i32,
        page: Page,
    ) -> AppResult<Vec<ItemWithBookings>> {
        self.repository.users.get_by_id(owner_id).await?;
        let items = self.repository.items.list_by_owner(owner_id, page).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let item_ids: Vec<i32> = items.iter().map(|item| item.id).collect();
        let mut bookings_by_item = self.repository.bookings.map_active_by_item(&item_ids).await?;
        let mut comments_by_item = self.repository.comments.map_by_item(&item_ids).await?;

        let now = Utc::now();
        let views = items
            .into_iter()
            .map(|item| {
                let bookings = bookings_by_item.remove(&item.id).unwrap_or_default();
                let comments = comments_by_item.remove(&item.id).unwrap_or_default();
                let (last, next) = find_last_next(&bookings, now);
                ItemWithBookings::new(item, last, next, comments)
            })
            .collect();
        Ok(views)
    }

    /// Case-insensitive free-text search over available items. Blank text
    /// returns an empty list without touching the store.
    pub async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.items.search(text).await
    }

    /// Add a comment to an item. The commenter must have an approved booking
    /// of the item that already ended, and must not be the owner.
    pub async fn add_comment(
        &self,
        item_id: i32,
        commenter_id: i32,
        text: String,
    ) -> AppResult<CommentDetails> {
        if text.trim().is_empty() {
            return Err(AppError::Validation(
                "Comment not saved. Comment with empty text.".to_string(),
            ));
        }

        self.repository
            .users
            .get_by_id(commenter_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound(format!(
                    "Comment not saved. User-commenter with id [{}] not found.",
                    commenter_id
                )),
                other => other,
            })?;
        let item = self
            .repository
            .items
            .get_by_id(item_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound(format!(
                    "Comment not saved. Item with id [{}] not found.",
                    item_id
                )),
                other => other,
            })?;

        if item.owner_id == commenter_id {
            return Err(AppError::Validation(
                "Owner cannot comment his item.".to_string(),
            ));
        }

        let now = Utc::now();
        if !self
            .repository
            .bookings
            .has_completed(commenter_id, item_id, now)
            .await?
        {
            return Err(AppError::Validation(
                "Commenter not renter of item.".to_string(),
            ));
        }

        self.repository
            .comments
            .create(item_id, commenter_id, &text, now)
            .await
    }
}

/// Drop update fields that must not overwrite stored values: blank strings
/// and over-long name/description inputs are treated as absent.
fn sanitize_update(update: UpdateItem) -> UpdateItem {
    UpdateItem {
        name: update
            .name
            .filter(|name| !name.trim().is_empty() && name.len() < ITEM_MAX_NAME_SIZE),
        description: update.description.filter(|description| {
            !description.trim().is_empty() && description.len() < ITEM_MAX_DESCRIPTION_SIZE
        }),
        available: update.available,
    }
}

/// Classify an item's active bookings into its nearest past and future ones.
///
/// Last = ended booking with the latest end; next = future booking with the
/// earliest start. A sole booking counts as next if it starts after `now`,
/// otherwise as last, even when it has not ended yet.
fn find_last_next(
    bookings: &[BookingForItem],
    now: DateTime<Utc>,
) -> (Option<BookingForItem>, Option<BookingForItem>) {
    if bookings.is_empty() {
        return (None, None);
    }

    if let [booking] = bookings {
        return if booking.start > now {
            (None, Some(booking.clone()))
        } else {
            (Some(booking.clone()), None)
        };
    }

    let mut last: Option<&BookingForItem> = None;
    let mut next: Option<&BookingForItem> = None;
    for booking in bookings {
        if booking.end < now {
            match last {
                Some(current) if booking.end <= current.end => {}
                _ => last = Some(booking),
            }
        }
        if booking.start > now {
            match next {
                Some(current) if booking.start >= current.start => {}
                _ => next = Some(booking),
            }
        }
    }
    (last.cloned(), next.cloned())
}
