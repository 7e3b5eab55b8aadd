use auth::RoleError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Name must not be empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for user directory operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] DisplayNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
