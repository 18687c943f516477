use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims;
use super::claims::Claims;
use super::errors::JwtError;

/// Signer and validator for access tokens.
///
/// Uses HS256 (HMAC with SHA-256). Validation pins the algorithm, so a token
/// whose header names anything else (e.g. an asymmetric algorithm) is
/// rejected before signature checking, so the usual algorithm-confusion
/// attack does not get past the header.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new handler with a symmetric signing secret.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed access token for a user.
    ///
    /// # Arguments
    /// * `user_id` - Token subject
    /// * `ttl` - Time until the token expires
    ///
    /// # Returns
    /// Compact signed token (header.payload.signature)
    ///
    /// # Errors
    /// * `EncodingFailed` - Claim serialization or signing failed
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);
        let claims = Claims::for_user(user_id, ttl);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate a token and return its subject.
    ///
    /// Rejects tokens with a bad signature, a non-HS256 algorithm, a missing
    /// or wrong issuer, an elapsed `exp`, or a subject that does not parse
    /// as a user id.
    ///
    /// # Arguments
    /// * `token` - Compact signed token string
    ///
    /// # Errors
    /// * `TokenExpired` - `exp` is in the past
    /// * `InvalidAlgorithm` - Header names a different signing algorithm
    /// * `InvalidSubject` - `sub` is not a valid UUID
    /// * `DecodingFailed` - Signature or structure is invalid
    pub fn validate(&self, token: &str) -> Result<Uuid, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // No clock leeway: a token is invalid the moment `exp` passes.
        validation.leeway = 0;
        validation.set_issuer(&[claims::ISSUER]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    ErrorKind::InvalidAlgorithm => JwtError::InvalidAlgorithm,
                    _ => JwtError::DecodingFailed(e.to_string()),
                }
            })?;

        token_data.claims.subject()
    }
}
