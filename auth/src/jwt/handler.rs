use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// JWT signer and verifier bound to a single HS256 secret.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encode claims into a signed JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.validation.algorithms[0]);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode a JWT token, checking its signature and expiry.
    ///
    /// # Errors
    /// * `Expired` - The `exp` claim is in the past
    /// * `InvalidSignature` - Token was not signed with this handler's secret
    /// * `Malformed` - Token or its claims could not be decoded
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed(e.to_string()),
            })
    }
}
