//! Credential issuance and access-control library
//!
//! Provides the reusable pieces of the platform's authentication core:
//! - Password and refresh-token hashing (Argon2id)
//! - Dual access/refresh JWT issuance and verification
//! - Roles and per-route capability descriptors
//! - The per-request authorization guard
//!
//! Persistence is left to the embedding service.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new().unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Token Pairs
//! ```
//! use auth::{Role, TokenIssuer, TokenKind, TokenLifetimes, TokenSubject};
//!
//! let issuer = TokenIssuer::new(
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_long",
//!     TokenLifetimes::default(),
//! );
//! let subject = TokenSubject {
//!     id: "user123".to_string(),
//!     email: "alice@example.com".to_string(),
//!     role: Role::Author,
//! };
//! let pair = issuer.issue_pair(&subject).unwrap();
//! let principal = issuer.verify(&pair.access_token, TokenKind::Access).unwrap();
//! assert_eq!(principal.role, Role::Author);
//! ```
//!
//! ## Guarding a Route
//! ```
//! use std::sync::Arc;
//! use auth::{AuthorizationGuard, GuardRejection, Role, RouteAccess, TokenIssuer, TokenKind, TokenLifetimes};
//!
//! let issuer = Arc::new(TokenIssuer::new(
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_long",
//!     TokenLifetimes::default(),
//! ));
//! let guard = AuthorizationGuard::new(issuer);
//! let access = RouteAccess::roles([Role::Author, Role::Admin]);
//!
//! let result = guard.check(None, TokenKind::Access, &access);
//! assert_eq!(result, Err(GuardRejection::MissingCredentials));
//! ```

pub mod access;
pub mod guard;
pub mod jwt;
pub mod password;
pub mod role;

// Re-export commonly used items
pub use access::RouteAccess;
pub use guard::bearer_token;
pub use guard::Authenticated;
pub use guard::AuthorizationGuard;
pub use guard::GuardRejection;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::Principal;
pub use jwt::TokenIssuer;
pub use jwt::TokenKind;
pub use jwt::TokenLifetimes;
pub use jwt::TokenPair;
pub use jwt::TokenSubject;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use role::Role;
pub use role::RoleError;
