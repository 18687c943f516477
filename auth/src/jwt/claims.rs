use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;

/// Issuer written into every access token.
pub const ISSUER: &str = "chirp-service";

/// Registered claim set carried by access tokens.
///
/// Access tokens are stateless: validity is purely a function of the
/// signature and the `exp` claim, no server-side lookup happens per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Issuer (fixed application name)
    pub iss: String,

    /// Subject (user identifier in string form)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build the claim set for a user session expiring after `ttl`.
    pub fn for_user(user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Parse the subject claim back into a user identifier.
    ///
    /// # Errors
    /// * `InvalidSubject` - Subject is not a valid UUID
    pub fn subject(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidSubject(self.sub.clone()))
    }
}
