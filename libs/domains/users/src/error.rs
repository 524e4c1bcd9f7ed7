use thiserror::Error;

/// Failures raised by the repository layer.
///
/// The service turns these into envelopes; they never reach HTTP directly.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User with ID {0} not found")]
    NotFound(i32),

    #[error("A user with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        UserError::Internal(format!("Database error: {}", err))
    }
}
