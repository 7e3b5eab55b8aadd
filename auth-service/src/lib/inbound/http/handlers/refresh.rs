use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::middleware::RefreshCredential;
use crate::inbound::http::router::AppState;

pub async fn refresh(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Extension(RefreshCredential(refresh_token)): Extension<RefreshCredential>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .auth_service
        .refresh(&current_user.user_id, &refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|tokens| {
            ApiSuccess::new(
                StatusCode::OK,
                TokenResponseData::new(tokens, state.access_token_ttl_seconds),
            )
        })
}
