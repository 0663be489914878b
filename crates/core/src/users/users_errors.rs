use thiserror::Error;

/// Errors specific to user operations.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("A user with email '{0}' already exists")]
    EmailTaken(String),
}

pub type Result<T> = std::result::Result<T, UserError>;
