use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::RegisterCommand;
use crate::domain::user::models::UserId;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create an account and open its first session.
    ///
    /// # Returns
    /// Token pair for the new account
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `Internal` - Hashing, signing, or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError>;

    /// Verify credentials and open a new session.
    ///
    /// Any previously outstanding refresh token for the account stops working.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Internal` - Hashing, signing, or storage failed
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError>;

    /// End the account's session.
    ///
    /// # Errors
    /// * `NotFound` - Account no longer exists
    /// * `AccessDenied` - Account has no active session
    async fn logout(&self, user_id: &UserId) -> Result<(), AuthError>;

    /// Redeem a refresh token for a new pair.
    ///
    /// A refresh token can be redeemed at most once, even under concurrent use.
    ///
    /// # Arguments
    /// * `user_id` - Subject of the verified refresh token
    /// * `presented_refresh_token` - The literal token, compared against the stored hash
    ///
    /// # Errors
    /// * `AccessDenied` - No session, token mismatch, or token already redeemed
    async fn refresh(
        &self,
        user_id: &UserId,
        presented_refresh_token: &str,
    ) -> Result<TokenPair, AuthError>;
}
