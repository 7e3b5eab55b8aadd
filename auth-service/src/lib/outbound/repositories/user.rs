use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserDirectory;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, refresh_token_hash, created_at, updated_at";

pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    refresh_token_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(r.id),
            name: DisplayName::new(r.name)?,
            email: EmailAddress::new(r.email)?,
            password_hash: r.password_hash,
            role: r.role.parse()?,
            refresh_token_hash: r.refresh_token_hash,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, refresh_token_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NULL, NOW(), NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(UserId::new().0)
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
                    return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        User::try_from(row)
    }

    async fn update(&self, id: &UserId, changes: UserChanges) -> Result<bool, UserError> {
        if changes.is_empty() {
            return Ok(self.find_by_id(id).await?.is_some());
        }

        let set_refresh_token_hash = changes.refresh_token_hash.is_some();
        let refresh_token_hash = changes.refresh_token_hash.flatten();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = CASE WHEN $2::BOOLEAN THEN $3::TEXT ELSE refresh_token_hash END,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(set_refresh_token_hash)
        .bind(refresh_token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn swap_refresh_token_hash(
        &self,
        id: &UserId,
        expected: &str,
        replacement: Option<String>,
    ) -> Result<bool, UserError> {
        // Single statement: the row lock taken by UPDATE serializes racing callers
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token_hash = $3, updated_at = NOW()
            WHERE id = $1 AND refresh_token_hash = $2
            "#,
        )
        .bind(id.0)
        .bind(expected)
        .bind(replacement)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}
