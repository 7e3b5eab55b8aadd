use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .logout(&current_user.user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
