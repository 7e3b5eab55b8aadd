use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::authentication::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .auth_service
        .login(LoginCommand::new(body.email, body.password))
        .await
        .map_err(ApiError::from)
        .map(|tokens| {
            ApiSuccess::new(
                StatusCode::OK,
                TokenResponseData::new(tokens, state.access_token_ttl_seconds),
            )
        })
}

/// HTTP request body for login.
///
/// The email is passed through unvalidated so a malformed address gets the
/// same answer as an unknown one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
