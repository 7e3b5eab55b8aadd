use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth::TokenPair;

use crate::domain::authentication::errors::AuthError;
use crate::domain::authentication::models::LoginCommand;
use crate::domain::authentication::models::RegisterCommand;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserDirectory;

/// Domain service implementation for authentication operations.
///
/// Refresh tokens are stored only as Argon2 hashes and rotated on every
/// login and refresh. Rotation after a refresh goes through the directory's
/// conditional swap, so a token can be redeemed at most once.
pub struct AuthService<UD>
where
    UD: UserDirectory,
{
    directory: Arc<UD>,
    token_issuer: Arc<TokenIssuer>,
    password_hasher: PasswordHasher,
}

impl<UD> AuthService<UD>
where
    UD: UserDirectory,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - Credential store implementation
    /// * `token_issuer` - Access/refresh token signer
    /// * `password_hasher` - Hasher for passwords and refresh tokens
    pub fn new(
        directory: Arc<UD>,
        token_issuer: Arc<TokenIssuer>,
        password_hasher: PasswordHasher,
    ) -> Self {
        Self {
            directory,
            token_issuer,
            password_hasher,
        }
    }

    /// Mint a pair and unconditionally store the new refresh-token hash.
    async fn open_session(&self, user: &User) -> Result<TokenPair, AuthError> {
        let tokens = self.token_issuer.issue_pair(&user.token_subject())?;
        let refresh_token_hash = self.password_hasher.hash(&tokens.refresh_token)?;

        let updated = self
            .directory
            .update(
                &user.id,
                UserChanges::default().with_refresh_token_hash(Some(refresh_token_hash)),
            )
            .await?;
        if !updated {
            return Err(AuthError::NotFound(user.id.to_string()));
        }

        Ok(tokens)
    }
}

#[async_trait]
impl<UD> AuthServicePort for AuthService<UD>
where
    UD: UserDirectory,
{
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AuthError> {
        if self.directory.find_by_email(&command.email).await?.is_some() {
            return Err(AuthError::AlreadyExists(command.email.to_string()));
        }

        let role = command.granted_role();
        if let Some(requested) = command.requested_role.filter(|r| *r != role) {
            tracing::warn!(
                email = %command.email,
                requested_role = %requested,
                granted_role = %role,
                "Requested role is not self-assignable, downgraded"
            );
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = self
            .directory
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
                role,
            })
            .await?;

        let tokens = self.open_session(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(tokens)
    }

    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError> {
        let user = match EmailAddress::new(command.email) {
            Ok(email) => self.directory.find_by_email(&email).await?,
            Err(_) => None,
        };

        let user = match user {
            Some(user) if self.password_hasher.verify(&command.password, &user.password_hash) => {
                user
            }
            Some(user) => {
                tracing::warn!(user_id = %user.id, "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
            None => {
                self.password_hasher.verify_decoy(&command.password);
                tracing::warn!("Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let tokens = self.open_session(&user).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(tokens)
    }

    async fn logout(&self, user_id: &UserId) -> Result<(), AuthError> {
        let user = self
            .directory
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound(user_id.to_string()))?;

        let Some(stored_hash) = user.refresh_token_hash.as_deref() else {
            tracing::warn!(user_id = %user_id, "Logout without an active session");
            return Err(AuthError::AccessDenied);
        };

        // A concurrent refresh may have rotated the hash since it was read
        if !self
            .directory
            .swap_refresh_token_hash(user_id, stored_hash, None)
            .await?
        {
            tracing::warn!(user_id = %user_id, "Session changed during logout");
            return Err(AuthError::AccessDenied);
        }

        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    async fn refresh(
        &self,
        user_id: &UserId,
        presented_refresh_token: &str,
    ) -> Result<TokenPair, AuthError> {
        let Some(user) = self.directory.find_by_id(user_id).await? else {
            tracing::warn!(user_id = %user_id, "Refresh for unknown user");
            return Err(AuthError::AccessDenied);
        };

        let Some(stored_hash) = user.refresh_token_hash.as_deref() else {
            tracing::warn!(user_id = %user_id, "Refresh without an active session");
            return Err(AuthError::AccessDenied);
        };

        if !self
            .password_hasher
            .verify(presented_refresh_token, stored_hash)
        {
            tracing::warn!(user_id = %user_id, "Refresh token is not the current one");
            return Err(AuthError::AccessDenied);
        }

        let tokens = self.token_issuer.issue_pair(&user.token_subject())?;
        let refresh_token_hash = self.password_hasher.hash(&tokens.refresh_token)?;

        if !self
            .directory
            .swap_refresh_token_hash(user_id, stored_hash, Some(refresh_token_hash))
            .await?
        {
            tracing::warn!(user_id = %user_id, "Refresh token already redeemed concurrently");
            return Err(AuthError::AccessDenied);
        }

        tracing::info!(user_id = %user_id, "Session refreshed");
        Ok(tokens)
    }
}
