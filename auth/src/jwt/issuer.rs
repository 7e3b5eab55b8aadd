use chrono::Duration;
use serde::Serialize;

use super::claims::Claims;
use super::claims::Principal;
use super::claims::TokenSubject;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Which signing secret a token is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Validity windows for the two token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
        }
    }
}

/// Freshly minted credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mints and verifies access/refresh tokens.
///
/// Each kind has its own secret and lifetime, so a refresh token is never
/// accepted where an access token is expected and vice versa.
pub struct TokenIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    pub fn new(access_secret: &[u8], refresh_secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        Self {
            access: JwtHandler::new(access_secret),
            refresh: JwtHandler::new(refresh_secret),
            lifetimes,
        }
    }

    /// Sign an access token and a refresh token for the same subject.
    ///
    /// # Errors
    /// * `EncodingFailed` - Either token could not be signed, or a lifetime
    ///   pushes its expiry out of range
    pub fn issue_pair(&self, subject: &TokenSubject) -> Result<TokenPair, JwtError> {
        let access_claims = Claims::for_subject(subject, self.lifetimes.access)?;
        let refresh_claims = Claims::for_subject(subject, self.lifetimes.refresh)?;

        Ok(TokenPair {
            access_token: self.access.encode(&access_claims)?,
            refresh_token: self.refresh.encode(&refresh_claims)?,
        })
    }

    /// Verify signature and expiry of `token` against the secret for `kind`.
    ///
    /// # Errors
    /// * `Expired`, `InvalidSignature`, `Malformed` - The token must be treated as unauthenticated
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Principal, JwtError> {
        self.handler(kind)
            .decode::<Claims>(token)
            .map(Principal::from)
    }

    fn handler(&self, kind: TokenKind) -> &JwtHandler {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}
