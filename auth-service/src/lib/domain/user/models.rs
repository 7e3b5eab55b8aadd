use std::fmt;
use std::str::FromStr;

use auth::Role;
use auth::TokenSubject;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::errors::DisplayNameError;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::UserIdError;

/// Persisted account record.
///
/// Owned by the user directory; the authentication core reads it and writes
/// only the refresh-token hash.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    /// Hash of the single outstanding refresh token; `None` means no session
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_active_session(&self) -> bool {
        self.refresh_token_hash.is_some()
    }

    /// Claims source for a token pair minted for this account.
    pub fn token_subject(&self) -> TokenSubject {
        TokenSubject {
            id: self.id.to_string(),
            email: self.email.as_str().to_string(),
            role: self.role,
        }
    }
}

// Hashes stay out of logs
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field(
                "refresh_token_hash",
                &self.refresh_token_hash.as_ref().map(|_| "[REDACTED]"),
            )
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Trimmed, non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 255;

    /// Create a new valid display name.
    ///
    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Name exceeds 255 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(DisplayNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser and normalized to lower case, so lookups
/// are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 255;

    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    /// * `TooLong` - Email exceeds 255 characters
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();

        if email.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: email.len(),
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Fields for a record the directory is asked to create.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update of a user record.
///
/// Only fields set to `Some` are written. `refresh_token_hash: Some(None)`
/// clears the stored hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub refresh_token_hash: Option<Option<String>>,
}

impl UserChanges {
    pub fn with_refresh_token_hash(mut self, hash: Option<String>) -> Self {
        self.refresh_token_hash = Some(hash);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.refresh_token_hash.is_none()
    }
}
