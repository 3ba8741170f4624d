//! Item request service: solicitations for items not yet listed

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{page::Page, request::RequestWithItems},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a request with a server-assigned creation timestamp. The
    /// description must be non-blank.
    pub async fn add_request(
        &self,
        requester_id: i32,
        description: String,
    ) -> AppResult<RequestWithItems> {
        if description.trim().is_empty() {
            return Err(AppError::Validation(
                "Request not saved. Request with empty description.".to_string(),
            ));
        }

        self.repository
            .users
            .get_by_id(requester_id)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => AppError::NotFound(format!(
                    "Request not saved. User with id [{}] not found.",
                    requester_id
                )),
                other => other,
            })?;

        let request = self
            .repository
            .requests
            .create(requester_id, &description, Utc::now())
            .await?;
        Ok(RequestWithItems::new(request, Vec::new()))
    }

    /// Get a request with its answering items; any existing user may view it
    pub async fn get_request(&self, user_id: i32, request_id: i32) -> AppResult<RequestWithItems> {
        self.repository.users.get_by_id(user_id).await?;
        let request = self.repository.requests.get_by_id(request_id).await?;
        let items = self.repository.items.list_by_request(request_id).await?;
        Ok(RequestWithItems::new(request, items))
    }

    /// A user's own requests with their answering items, newest first
    pub async fn get_own_requests(&self, requester_id: i32) -> AppResult<Vec<RequestWithItems>> {
        self.repository.users.get_by_id(requester_id).await?;
        let requests = self.repository.requests.list_by_requester(requester_id).await?;
        self.attach_items(requests).await
    }

    /// Other users' requests with their answering items, newest first, paged
    pub async fn get_all_requests(
        &self,
        user_id: i32,
        page: Page,
    ) -> AppResult<Vec<RequestWithItems>> {
        self.repository.users.get_by_id(user_id).await?;
        let requests = self.repository.requests.list_of_others(user_id, page).await?;
        self.attach_items(requests).await
    }

    async fn attach_items(
        &self,
        requests: Vec<crate::models::request::ItemRequest>,
    ) -> AppResult<Vec<RequestWithItems>> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let request_ids: Vec<i32> = requests.iter().map(|request| request.id).collect();
        let mut items_by_request = self.repository.items.map_by_requests(&request_ids).await?;

        Ok(requests
            .into_iter()
            .map(|request| {
                let items = items_by_request.remove(&request.id).unwrap_or_default();
                RequestWithItems::new(request, items)
            })
            .collect())
    }
}
