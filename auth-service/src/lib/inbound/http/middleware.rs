use std::sync::Arc;

use auth::AuthorizationGuard;
use auth::Principal;
use auth::RouteAccess;
use auth::TokenKind;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;

/// Verified caller, stored in request extensions by `enforce`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub principal: Principal,
}

/// Literal refresh token presented on a refresh-guarded route
#[derive(Clone)]
pub struct RefreshCredential(pub String);

/// Guard configuration attached to a group of routes.
#[derive(Clone)]
pub struct RoutePolicy {
    guard: Arc<AuthorizationGuard>,
    access: RouteAccess,
    token_kind: TokenKind,
}

impl RoutePolicy {
    /// Routes authenticated with an access token.
    pub fn access_token(guard: Arc<AuthorizationGuard>, access: RouteAccess) -> Self {
        Self {
            guard,
            access,
            token_kind: TokenKind::Access,
        }
    }

    /// Routes authenticated with a refresh token (logout, refresh).
    pub fn refresh_token(guard: Arc<AuthorizationGuard>) -> Self {
        Self {
            guard,
            access: RouteAccess::authenticated(),
            token_kind: TokenKind::Refresh,
        }
    }
}

/// Middleware that runs the guard and stores the caller in request extensions.
///
/// Adds `CurrentUser` when a principal was resolved, and `RefreshCredential`
/// as well on refresh-token routes.
pub async fn enforce(
    State(policy): State<RoutePolicy>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let authenticated = policy
        .guard
        .check(authorization, policy.token_kind, &policy.access)
        .map_err(|rejection| {
            tracing::warn!(
                token_kind = ?policy.token_kind,
                reason = %rejection,
                "Request rejected by guard"
            );
            ApiError::from(rejection)
        })?;

    if let Some(authenticated) = authenticated {
        let user_id = UserId::from_string(&authenticated.principal.subject_id).map_err(|e| {
            tracing::error!("Failed to parse user ID from token: {}", e);
            ApiError::Unauthorized("Invalid token format".to_string())
        })?;

        if policy.token_kind == TokenKind::Refresh {
            req.extensions_mut()
                .insert(RefreshCredential(authenticated.token));
        }
        req.extensions_mut().insert(CurrentUser {
            user_id,
            principal: authenticated.principal,
        });
    }

    Ok(next.run(req).await)
}
