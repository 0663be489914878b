use thiserror::Error;

/// Errors specific to the membership lifecycle.
#[derive(Error, Debug)]
pub enum MembershipError {
    #[error("Member not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Maximum members limit reached: {0}")]
    CapacityExceeded(String),

    #[error("User is already a member: {0}")]
    AlreadyMember(String),

    #[error("Invitation already processed: {0}")]
    AlreadyProcessed(String),
}

pub type Result<T> = std::result::Result<T, MembershipError>;
