use async_trait::async_trait;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;

/// Credential store consumed by the authentication core.
///
/// Implementations own durable state and its consistency; the core holds no
/// lock across these calls.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Retrieve user by normalized email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Persist a new user with no active session.
    ///
    /// # Returns
    /// Created user entity, with generated id and timestamps
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Apply a partial update.
    ///
    /// # Returns
    /// `true` if the user existed and was updated, `false` if no such user
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<bool, UserError>;

    /// Replace the refresh-token hash only if it still equals `expected`.
    ///
    /// This is the serialization point for rotation: of several callers that
    /// read the same hash, exactly one sees `true`.
    ///
    /// # Arguments
    /// * `id` - User to update
    /// * `expected` - Hash the caller verified against
    /// * `replacement` - New hash, or `None` to end the session
    ///
    /// # Returns
    /// `true` if the swap happened, `false` if the stored hash changed or the user is gone
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn swap_refresh_token_hash(
        &self,
        id: &UserId,
        expected: &str,
        replacement: Option<String>,
    ) -> Result<bool, UserError>;
}
