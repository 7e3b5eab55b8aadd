use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;
use crate::role::Role;

/// Identity a token pair is minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub id: String,
    pub email: String,
    pub role: Role,
}

/// Wire payload of access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token identifier; two tokens minted in the same second still differ
    pub jti: String,
}

impl Claims {
    /// Build claims for `subject` valid for `lifetime` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - The expiry falls outside the representable time range
    pub fn for_subject(subject: &TokenSubject, lifetime: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(lifetime).ok_or_else(|| {
            JwtError::EncodingFailed(format!("token lifetime out of range: {}", lifetime))
        })?;

        Ok(Self {
            sub: subject.id.clone(),
            email: subject.email.clone(),
            role: subject.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }
}

/// Verified identity decoded from a token.
///
/// Only produced by `TokenIssuer::verify`; never built from unverified input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub subject_id: String,
    pub email: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.sub,
            email: claims.email,
            role: claims.role,
            issued_at: DateTime::from_timestamp(claims.iat, 0).unwrap_or_default(),
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> TokenSubject {
        TokenSubject {
            id: "user123".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Author,
        }
    }

    #[test]
    fn test_for_subject() {
        let claims = Claims::for_subject(&subject(), Duration::minutes(15)).unwrap();

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, Role::Author);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_token_ids_are_unique() {
        let first = Claims::for_subject(&subject(), Duration::days(7)).unwrap();
        let second = Claims::for_subject(&subject(), Duration::days(7)).unwrap();

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let result = Claims::for_subject(&subject(), Duration::days(100_000_000));

        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }

    #[test]
    fn test_principal_from_claims() {
        let claims = Claims::for_subject(&subject(), Duration::minutes(15)).unwrap();
        let principal = Principal::from(claims.clone());

        assert_eq!(principal.subject_id, "user123");
        assert_eq!(principal.role, Role::Author);
        assert_eq!(principal.issued_at.timestamp(), claims.iat);
        assert_eq!(principal.expires_at.timestamp(), claims.exp);
    }
}
