use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

use crate::domain::user::errors::UserError;

/// Outcome taxonomy of authentication operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Email already exists: {0}")]
    AlreadyExists(String),

    /// Unknown email and wrong password are deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    AccessDenied,

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Infrastructure errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(email) => AuthError::AlreadyExists(email),
            UserError::NotFound(id) => AuthError::NotFound(id),
            UserError::InvalidUserId(_) | UserError::InvalidName(_) | UserError::InvalidEmail(_) => {
                AuthError::InvalidInput(err.to_string())
            }
            UserError::InvalidRole(_) | UserError::DatabaseError(_) => {
                AuthError::Internal(err.to_string())
            }
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
