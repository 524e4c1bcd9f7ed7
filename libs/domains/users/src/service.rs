use axum_helpers::ServiceResponse;
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{same_email, CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

fn duplicate_email_message(email: &str) -> String {
    format!("A user with email '{}' already exists", email)
}

fn not_found_message(id: i32) -> String {
    format!("User with ID {} not found", id)
}

/// Service layer for User business logic
///
/// Not-found and duplicate-email outcomes come back as failed envelopes.
/// Infrastructure errors are logged here and replaced with a generic message.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List all users, newest first
    pub async fn list_users(&self) -> ServiceResponse<Vec<User>> {
        match self.repository.list().await {
            Ok(users) => ServiceResponse::success(
                format!("Retrieved {} users successfully", users.len()),
                users,
            ),
            Err(e) => {
                tracing::error!(error = %e, "Failed to list users");
                ServiceResponse::internal("An error occurred while retrieving users")
            }
        }
    }

    pub async fn get_user(&self, id: i32) -> ServiceResponse<User> {
        match self.repository.get_by_id(id).await {
            Ok(Some(user)) => ServiceResponse::success("User retrieved successfully", user),
            Ok(None) => ServiceResponse::not_found(not_found_message(id)),
            Err(e) => {
                tracing::error!(user_id = id, error = %e, "Failed to get user");
                ServiceResponse::internal("An error occurred while retrieving the user")
            }
        }
    }

    /// Create a user. The email pre-check is advisory; a racing insert is
    /// caught by the storage constraint and reported the same way.
    pub async fn create_user(&self, input: CreateUser) -> ServiceResponse<User> {
        match self.repository.email_exists(&input.email, None).await {
            Ok(true) => return ServiceResponse::conflict(duplicate_email_message(&input.email)),
            Ok(false) => {}
            Err(e) => {
                tracing::error!(email = %input.email, error = %e, "Failed to check email uniqueness");
                return ServiceResponse::internal("An error occurred while creating the user");
            }
        }

        match self.repository.create(input).await {
            Ok(user) => ServiceResponse::success("User created successfully", user),
            Err(UserError::DuplicateEmail(email)) => {
                tracing::warn!(email = %email, "Concurrent create hit the email unique index");
                ServiceResponse::conflict(duplicate_email_message(&email))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create user");
                ServiceResponse::internal("An error occurred while creating the user")
            }
        }
    }

    pub async fn update_user(&self, id: i32, input: UpdateUser) -> ServiceResponse<User> {
        let current = match self.repository.get_by_id(id).await {
            Ok(Some(user)) => user,
            Ok(None) => return ServiceResponse::not_found(not_found_message(id)),
            Err(e) => {
                tracing::error!(user_id = id, error = %e, "Failed to load user for update");
                return ServiceResponse::internal("An error occurred while updating the user");
            }
        };

        if !same_email(&current.email, &input.email) {
            match self.repository.email_exists(&input.email, Some(id)).await {
                Ok(true) => {
                    return ServiceResponse::conflict(duplicate_email_message(&input.email));
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::error!(user_id = id, error = %e, "Failed to check email uniqueness");
                    return ServiceResponse::internal("An error occurred while updating the user");
                }
            }
        }

        match self.repository.update(id, input).await {
            Ok(user) => ServiceResponse::success("User updated successfully", user),
            Err(UserError::NotFound(id)) => ServiceResponse::not_found(not_found_message(id)),
            Err(UserError::DuplicateEmail(email)) => {
                ServiceResponse::conflict(duplicate_email_message(&email))
            }
            Err(e) => {
                tracing::error!(user_id = id, error = %e, "Failed to update user");
                ServiceResponse::internal("An error occurred while updating the user")
            }
        }
    }

    pub async fn delete_user(&self, id: i32) -> ServiceResponse<bool> {
        let deleted = match self.repository.exists(id).await {
            Ok(false) => return ServiceResponse::not_found(not_found_message(id)),
            Ok(true) => self.repository.delete(id).await,
            Err(e) => Err(e),
        };

        match deleted {
            Ok(true) => ServiceResponse::success("User deleted successfully", true),
            // Removed by a concurrent request between the check and the delete
            Ok(false) => ServiceResponse::not_found(not_found_message(id)),
            Err(e) => {
                tracing::error!(user_id = id, error = %e, "Failed to delete user");
                ServiceResponse::internal("An error occurred while deleting the user")
            }
        }
    }

    pub async fn exists(&self, id: i32) -> UserResult<bool> {
        self.repository.exists(id).await
    }

    pub async fn email_exists(&self, email: &str, exclude_id: Option<i32>) -> UserResult<bool> {
        self.repository.email_exists(email, exclude_id).await
    }
}
