use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error: a digest that cannot be parsed or
/// checked simply does not match.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}
