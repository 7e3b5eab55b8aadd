#![allow(dead_code)]

use std::sync::Arc;

use auth::AuthorizationGuard;
use auth::Claims;
use auth::JwtHandler;
use auth::PasswordHasher;
use auth::Role;
use auth::RouteAccess;
use auth::TokenIssuer;
use auth::TokenLifetimes;
use auth::TokenSubject;
use auth_service::domain::authentication::service::AuthService;
use auth_service::inbound::http::middleware::enforce;
use auth_service::inbound::http::middleware::RoutePolicy;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::repositories::InMemoryUserDirectory;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use serde_json::json;
use serde_json::Value;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret-key-at-least-32-bytes";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret-key-at-least-32-bytes";

/// Route gated on {AUTHOR, ADMIN}, mounted the way a resource collaborator would
pub const EDITORIAL_ROUTE: &str = "/test/editorial";
/// Route gated on {AUTHOR} only
pub const AUTHOR_ONLY_ROUTE: &str = "/test/authors";

/// Test application that spawns a real server backed by the in-memory directory
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub directory: Arc<InMemoryUserDirectory>,
    pub token_issuer: Arc<TokenIssuer>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let lifetimes = TokenLifetimes::default();
        let token_issuer = Arc::new(TokenIssuer::new(ACCESS_SECRET, REFRESH_SECRET, lifetimes));
        let directory = Arc::new(InMemoryUserDirectory::new());
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&directory),
            Arc::clone(&token_issuer),
            PasswordHasher::new().expect("Failed to build hasher"),
        ));
        let guard = Arc::new(AuthorizationGuard::new(Arc::clone(&token_issuer)));

        let role_gated_routes = Router::new()
            .route(
                EDITORIAL_ROUTE,
                get(|| async { "editorial" }).route_layer(middleware::from_fn_with_state(
                    RoutePolicy::access_token(
                        Arc::clone(&guard),
                        RouteAccess::roles([Role::Author, Role::Admin]),
                    ),
                    enforce,
                )),
            )
            .route(
                AUTHOR_ONLY_ROUTE,
                get(|| async { "authors" }).route_layer(middleware::from_fn_with_state(
                    RoutePolicy::access_token(Arc::clone(&guard), RouteAccess::roles([Role::Author])),
                    enforce,
                )),
            );

        let router = create_router(auth_service, guard, lifetimes.access.num_seconds())
            .merge(role_gated_routes);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            directory,
            token_issuer,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register an account and return the `data` object of the response
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Value {
        let response = self
            .post("/auth/register")
            .json(&json!({
                "name": name,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Mint an access token directly, bypassing registration's role clamp
    pub fn access_token_for(&self, role: Role) -> String {
        let subject = TokenSubject {
            id: Uuid::new_v4().to_string(),
            email: format!("{}@example.com", role.as_str().to_lowercase()),
            role,
        };
        self.token_issuer
            .issue_pair(&subject)
            .expect("Failed to issue tokens")
            .access_token
    }

    /// Access token signed with the right secret but already expired
    pub fn expired_access_token(&self) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "expired@example.com".to_string(),
            role: Role::Reader,
            iat: now - 3600,
            exp: now - 60,
            jti: Uuid::new_v4().to_string(),
        };
        JwtHandler::new(ACCESS_SECRET)
            .encode(&claims)
            .expect("Failed to encode token")
    }
}

/// Throwaway Postgres database with migrations applied
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
    admin_url: String,
}

impl TestDb {
    /// Create a uniquely named database on the server at `DATABASE_URL`.
    ///
    /// Returns `None` when `DATABASE_URL` is not set, so suites can run
    /// without a database server.
    pub async fn try_new() -> Option<Self> {
        let Ok(admin_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping Postgres-backed test");
            return None;
        };

        let db_name = format!("test_auth_service_{}", Uuid::new_v4().simple());

        let mut conn = PgConnection::connect(&admin_url)
            .await
            .expect("Failed to connect to Postgres");
        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = admin_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            db_name,
            admin_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Database cleanup happens asynchronously
        let db_name = self.db_name.clone();
        let admin_url = self.admin_url.clone();
        let pool = self.pool.clone();
        tokio::spawn(async move {
            pool.close().await;

            if let Ok(mut conn) = PgConnection::connect(&admin_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
