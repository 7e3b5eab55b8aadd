use auth::Role;
use auth::RoleError;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::authentication::models::RegisterCommand;
use crate::domain::user::errors::DisplayNameError;
use crate::domain::user::errors::EmailError;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Query(query): Query<RegisterQuery>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    let requested_role = query.requested_role()?;
    let command = body.try_into_command(requested_role)?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|tokens| {
            ApiSuccess::new(
                StatusCode::CREATED,
                TokenResponseData::new(tokens, state.access_token_ttl_seconds),
            )
        })
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterQuery {
    role: Option<String>,
}

impl RegisterQuery {
    fn requested_role(&self) -> Result<Option<Role>, ApiError> {
        self.role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(|e: RoleError| ApiError::BadRequest(e.to_string()))
    }
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid name: {0}")]
    Name(#[from] DisplayNameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl RegisterRequest {
    fn try_into_command(
        self,
        requested_role: Option<Role>,
    ) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let name = DisplayName::new(self.name)?;
        let email = EmailAddress::new(self.email)?;
        Ok(RegisterCommand::new(
            name,
            email,
            self.password,
            requested_role,
        ))
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
