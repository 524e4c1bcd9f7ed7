use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// A persisted user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// DTO for creating a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[serde(default)]
    #[validate(
        custom(function = "name_required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    #[schema(min_length = 2, max_length = 100, example = "Ada Lovelace")]
    pub name: String,

    #[serde(default)]
    #[validate(
        custom(function = "email_required"),
        email(message = "Invalid email format"),
        length(max = 256, message = "Email must be at most 256 characters")
    )]
    #[schema(max_length = 256, example = "ada@example.com")]
    pub email: String,
}

/// DTO for updating a user; both fields are replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[serde(default)]
    #[validate(
        custom(function = "name_required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    #[schema(min_length = 2, max_length = 100, example = "Ada King")]
    pub name: String,

    #[serde(default)]
    #[validate(
        custom(function = "email_required"),
        email(message = "Invalid email format"),
        length(max = 256, message = "Email must be at most 256 characters")
    )]
    #[schema(max_length = 256, example = "ada.king@example.com")]
    pub email: String,
}

fn name_required(value: &str) -> Result<(), ValidationError> {
    required(value, "Name is required")
}

fn email_required(value: &str) -> Result<(), ValidationError> {
    required(value, "Email is required")
}

/// Rejects empty and whitespace-only values.
fn required(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(message)));
    }
    Ok(())
}

/// Case-insensitive email comparison used for uniqueness checks.
pub(crate) fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
