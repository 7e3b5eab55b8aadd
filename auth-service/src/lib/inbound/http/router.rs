use std::sync::Arc;
use std::time::Duration;

use auth::AuthorizationGuard;
use auth::RouteAccess;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::middleware::enforce;
use super::middleware::RoutePolicy;
use crate::domain::authentication::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub access_token_ttl_seconds: i64,
}

pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    guard: Arc<AuthorizationGuard>,
    access_token_ttl_seconds: i64,
) -> Router {
    let state = AppState {
        auth_service,
        access_token_ttl_seconds,
    };

    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let session_routes = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route_layer(middleware::from_fn_with_state(
            RoutePolicy::refresh_token(Arc::clone(&guard)),
            enforce,
        ));

    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            RoutePolicy::access_token(guard, RouteAccess::authenticated()),
            enforce,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
