use thiserror::Error;

/// Error type for JWT operations.
///
/// Everything except `EncodingFailed` describes a presented token that must
/// be treated as unauthenticated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
