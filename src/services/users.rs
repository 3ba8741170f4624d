//! User management service

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get user by ID
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all users
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list_all().await
    }

    /// Create a new user; display name and email must be unique
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        if user.name.trim().is_empty() {
            return Err(AppError::Validation(
                "User not saved. User with empty name.".to_string(),
            ));
        }
        if user.email.trim().is_empty() {
            return Err(AppError::Validation(
                "User not saved. User with empty email.".to_string(),
            ));
        }
        if self.repository.users.name_exists(&user.name, None).await? {
            return Err(AppError::Conflict(format!(
                "User not saved. User with the name [{}] already exists.",
                user.name
            )));
        }
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict(format!(
                "User not saved. User with the email [{}] already exists.",
                user.email
            )));
        }

        self.repository.users.create(&user).await
    }

    /// Update an existing user; null fields keep their stored values
    pub async fn update_user(&self, id: i32, update: UpdateUser) -> AppResult<User> {
        self.repository.users.get_by_id(id).await?;

        if let Some(ref name) = update.name {
            if self.repository.users.name_exists(name, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "User not updated. User with the name [{}] already exists.",
                    name
                )));
            }
        }
        if let Some(ref email) = update.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "User not updated. User with the email [{}] already exists.",
                    email
                )));
            }
        }

        self.repository.users.update(id, &update).await
    }

    /// Delete a user by ID, returning the deleted record
    pub async fn delete_user(&self, id: i32) -> AppResult<User> {
        let user = self.repository.users.get_by_id(id).await?;
        self.repository.users.delete(id).await?;
        Ok(user)
    }
}
