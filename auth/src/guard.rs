use std::sync::Arc;

use thiserror::Error;

use crate::access::RouteAccess;
use crate::jwt::JwtError;
use crate::jwt::Principal;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenKind;

const BEARER_SCHEME: &str = "Bearer";

/// Why a request was turned away by the guard.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardRejection {
    #[error("Missing or malformed Authorization header")]
    MissingCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(JwtError),

    #[error("Insufficient role for this operation")]
    Forbidden,
}

impl GuardRejection {
    /// Authentication failures (401) as opposed to authorization failures (403).
    pub fn is_unauthenticated(&self) -> bool {
        !matches!(self, GuardRejection::Forbidden)
    }
}

/// Verified caller together with the literal token it presented.
///
/// The raw token is needed by refresh, which compares it against the stored
/// hash: a valid signature alone does not prove the token is still the
/// current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub principal: Principal,
    pub token: String,
}

/// Per-request access decision.
///
/// Two checks run in order: authentication (bearer token verified against
/// the secret for the requested `TokenKind`) and authorization (principal's
/// role against the route's declared roles). Pure and synchronous.
#[derive(Clone)]
pub struct AuthorizationGuard {
    issuer: Arc<TokenIssuer>,
}

impl AuthorizationGuard {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }

    /// Authentication check alone.
    ///
    /// # Arguments
    /// * `authorization` - Raw `Authorization` header value, if present
    /// * `kind` - Which secret the token must be signed with
    ///
    /// # Errors
    /// * `MissingCredentials` - No header, or not a `Bearer <token>` value
    /// * `InvalidToken` - Bad signature, malformed token, or expired
    pub fn authenticate(
        &self,
        authorization: Option<&str>,
        kind: TokenKind,
    ) -> Result<Authenticated, GuardRejection> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(GuardRejection::MissingCredentials)?;

        let principal = self
            .issuer
            .verify(token, kind)
            .map_err(GuardRejection::InvalidToken)?;

        Ok(Authenticated {
            principal,
            token: token.to_string(),
        })
    }

    /// Full decision for a route.
    ///
    /// Public routes proceed without a principal when authentication fails;
    /// all others are rejected. The role check then runs against whatever
    /// principal was resolved.
    ///
    /// # Returns
    /// The authenticated caller, or `None` for an anonymous caller on a public route
    ///
    /// # Errors
    /// * `MissingCredentials`, `InvalidToken` - Authentication failed on a protected route
    /// * `Forbidden` - Caller's role is not among the route's declared roles
    pub fn check(
        &self,
        authorization: Option<&str>,
        kind: TokenKind,
        access: &RouteAccess,
    ) -> Result<Option<Authenticated>, GuardRejection> {
        let authenticated = match self.authenticate(authorization, kind) {
            Ok(authenticated) => Some(authenticated),
            Err(rejection) if !access.requires_auth => {
                if authorization.is_some() {
                    tracing::debug!(
                        token_kind = ?kind,
                        reason = %rejection,
                        "Ignoring credentials on public route"
                    );
                }
                None
            }
            Err(rejection) => return Err(rejection),
        };

        if access.permits(authenticated.as_ref().map(|a| &a.principal)) {
            Ok(authenticated)
        } else {
            Err(GuardRejection::Forbidden)
        }
    }
}

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme name is matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::jwt::TokenLifetimes;
    use crate::jwt::TokenPair;
    use crate::jwt::TokenSubject;
    use crate::role::Role;

    fn issuer_with(lifetimes: TokenLifetimes) -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(
            b"access_secret_at_least_32_bytes_long!",
            b"refresh_secret_at_least_32_bytes_long",
            lifetimes,
        ))
    }

    fn pair_for(issuer: &TokenIssuer, role: Role) -> TokenPair {
        issuer
            .issue_pair(&TokenSubject {
                id: "user123".to_string(),
                email: "dave@example.com".to_string(),
                role,
            })
            .expect("Failed to issue pair")
    }

    fn header(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token("bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("BEARER abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Bearerabc.def.ghi"), None);
        assert_eq!(bearer_token("Bear abc.def.ghi"), None);
    }

    #[test]
    fn test_authenticate_returns_principal_and_raw_token() {
        let issuer = issuer_with(TokenLifetimes::default());
        let guard = AuthorizationGuard::new(issuer.clone());
        let pair = pair_for(&issuer, Role::Author);

        let authenticated = guard
            .authenticate(Some(&header(&pair.refresh_token)), TokenKind::Refresh)
            .expect("Refresh token rejected");

        assert_eq!(authenticated.token, pair.refresh_token);
        assert_eq!(authenticated.principal.role, Role::Author);
    }

    #[test]
    fn test_missing_header_on_protected_route() {
        let guard = AuthorizationGuard::new(issuer_with(TokenLifetimes::default()));

        let result = guard.check(None, TokenKind::Access, &RouteAccess::authenticated());
        assert_eq!(result, Err(GuardRejection::MissingCredentials));
        assert!(result.unwrap_err().is_unauthenticated());
    }

    #[test]
    fn test_public_route_proceeds_without_principal() {
        let guard = AuthorizationGuard::new(issuer_with(TokenLifetimes::default()));

        assert_eq!(
            guard.check(None, TokenKind::Access, &RouteAccess::public()),
            Ok(None)
        );
        assert_eq!(
            guard.check(
                Some("Bearer garbage"),
                TokenKind::Access,
                &RouteAccess::public()
            ),
            Ok(None)
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_public_route_logs_dropped_credentials() {
        let guard = AuthorizationGuard::new(issuer_with(TokenLifetimes::default()));
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || {
            guard.check(
                Some("Bearer garbage"),
                TokenKind::Access,
                &RouteAccess::public(),
            )
        });

        assert_eq!(result, Ok(None));
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Ignoring credentials on public route"));
    }

    #[test]
    fn test_public_route_still_resolves_a_valid_token() {
        let issuer = issuer_with(TokenLifetimes::default());
        let guard = AuthorizationGuard::new(issuer.clone());
        let pair = pair_for(&issuer, Role::Reader);

        let result = guard
            .check(
                Some(&header(&pair.access_token)),
                TokenKind::Access,
                &RouteAccess::public(),
            )
            .unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn test_role_gating() {
        let issuer = issuer_with(TokenLifetimes::default());
        let guard = AuthorizationGuard::new(issuer.clone());
        let reader = pair_for(&issuer, Role::Reader);
        let admin = pair_for(&issuer, Role::Admin);

        let authors_or_admins = RouteAccess::roles([Role::Author, Role::Admin]);
        assert_eq!(
            guard.check(
                Some(&header(&reader.access_token)),
                TokenKind::Access,
                &authors_or_admins
            ),
            Err(GuardRejection::Forbidden)
        );

        let authors_only = RouteAccess::roles([Role::Author]);
        assert_eq!(
            guard.check(
                Some(&header(&admin.access_token)),
                TokenKind::Access,
                &authors_only
            ),
            Err(GuardRejection::Forbidden)
        );
        assert!(guard
            .check(
                Some(&header(&admin.access_token)),
                TokenKind::Access,
                &authors_or_admins
            )
            .is_ok());
    }

    #[test]
    fn test_expired_access_token_is_unauthenticated() {
        let issuer = issuer_with(TokenLifetimes {
            access: Duration::seconds(-1),
            refresh: Duration::days(7),
        });
        let guard = AuthorizationGuard::new(issuer.clone());
        let pair = pair_for(&issuer, Role::Admin);

        let result = guard.check(
            Some(&header(&pair.access_token)),
            TokenKind::Access,
            &RouteAccess::authenticated(),
        );
        assert_eq!(result, Err(GuardRejection::InvalidToken(JwtError::Expired)));
    }

    #[test]
    fn test_refresh_guard_rejects_access_tokens() {
        let issuer = issuer_with(TokenLifetimes::default());
        let guard = AuthorizationGuard::new(issuer.clone());
        let pair = pair_for(&issuer, Role::Reader);

        let result = guard.authenticate(Some(&header(&pair.access_token)), TokenKind::Refresh);
        assert_eq!(
            result,
            Err(GuardRejection::InvalidToken(JwtError::InvalidSignature))
        );
    }
}
