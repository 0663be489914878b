use thiserror::Error;

/// Errors specific to plan operations.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Plan not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),
}

pub type Result<T> = std::result::Result<T, PlanError>;
