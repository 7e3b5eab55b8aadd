use auth::Role;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;

/// Describe the caller as resolved from their access token
pub async fn me(
    Extension(current_user): Extension<CurrentUser>,
) -> Result<ApiSuccess<MeResponseData>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, (&current_user).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl From<&CurrentUser> for MeResponseData {
    fn from(current_user: &CurrentUser) -> Self {
        let principal = &current_user.principal;
        Self {
            id: current_user.user_id.to_string(),
            email: principal.email.clone(),
            role: principal.role,
            issued_at: principal.issued_at,
            expires_at: principal.expires_at,
        }
    }
}
