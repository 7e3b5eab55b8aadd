use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserDirectory;

/// Process-local user directory.
///
/// Every mutation happens under the write lock, which gives the same
/// compare-and-swap guarantee as the conditional UPDATE in Postgres.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        let now = Utc::now();
        let created = User {
            id: UserId::new(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<bool, UserError> {
        let mut users = self.users.write().await;

        let Some(user) = users.get_mut(id) else {
            return Ok(false);
        };

        if let Some(refresh_token_hash) = changes.refresh_token_hash {
            user.refresh_token_hash = refresh_token_hash;
        }
        user.updated_at = Utc::now();

        Ok(true)
    }

    async fn swap_refresh_token_hash(
        &self,
        id: &UserId,
        expected: &str,
        replacement: Option<String>,
    ) -> Result<bool, UserError> {
        let mut users = self.users.write().await;

        match users.get_mut(id) {
            Some(user) if user.refresh_token_hash.as_deref() == Some(expected) => {
                user.refresh_token_hash = replacement;
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
