use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use http::HeaderMap;

use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::session::models::Session;
use crate::domain::user::models::UserId;
use crate::session::errors::AuthError;

/// Port for session operations called by the request layer.
///
/// Each operation surfaces exactly one failure kind from [`AuthError`];
/// internal persistence detail never crosses this boundary.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Verify credentials and open a session.
    ///
    /// Issues both a short-lived access token and a long-lived refresh
    /// token. Unknown emails and wrong passwords are indistinguishable to
    /// the caller.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `SigningFailed` - Access token could not be signed
    /// * `Unavailable` - Persistence call timed out
    /// * `DatabaseError` - Persistence call failed
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Authenticate a request from its bearer access token.
    ///
    /// Stateless: signature and expiry checks only, no persistence lookup.
    ///
    /// # Errors
    /// * `MissingCredential` - Authorization header absent or malformed
    /// * `TokenExpired` - Access token past its expiry
    /// * `InvalidToken` - Bad signature, wrong algorithm, or bad subject
    async fn authenticate_request(&self, headers: &HeaderMap) -> Result<UserId, AuthError>;

    /// Mint a new access token from the refresh token in the headers.
    ///
    /// The refresh token is not rotated or extended.
    ///
    /// # Errors
    /// * `MissingCredential` - Authorization header absent or malformed
    /// * `RefreshNotFound` - Token was never issued
    /// * `RefreshExpired` - Token past its expiry
    /// * `RefreshRevoked` - Token was revoked
    /// * `SigningFailed` - New access token could not be signed
    /// * `Unavailable` - Persistence call timed out
    /// * `DatabaseError` - Persistence call failed
    async fn refresh_session(&self, headers: &HeaderMap) -> Result<String, AuthError>;

    /// Revoke the refresh token in the headers.
    ///
    /// Revoking an already-revoked token is an idempotent success.
    ///
    /// # Errors
    /// * `MissingCredential` - Authorization header absent or malformed
    /// * `RefreshNotFound` - Token was never issued
    /// * `Unavailable` - Persistence call timed out
    /// * `DatabaseError` - Persistence call failed
    async fn revoke_session(&self, headers: &HeaderMap) -> Result<(), AuthError>;

    /// Authenticate a webhook call by its static API key.
    ///
    /// Comparison against the configured key is constant-time.
    ///
    /// # Errors
    /// * `MissingCredential` - API key header absent or malformed
    /// * `InvalidApiKey` - Presented key does not match
    fn authenticate_webhook(&self, headers: &HeaderMap) -> Result<(), AuthError>;
}

/// Persistence operations for refresh tokens.
///
/// Implementations must provide at least read-committed consistency so a
/// revoke is visible to subsequent renewals from any worker.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a newly issued refresh token record.
    ///
    /// # Errors
    /// * `DatabaseError` - Persistence call failed
    async fn create(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, AuthError>;

    /// Look up a record by its raw token string.
    ///
    /// # Errors
    /// * `DatabaseError` - Persistence call failed
    async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Set `revoked_at` on the matching record.
    ///
    /// Returns whether a previously unrevoked record was updated. Records
    /// already revoked are left untouched (last-write-wins is acceptable
    /// when revoke races renew).
    ///
    /// # Errors
    /// * `DatabaseError` - Persistence call failed
    async fn revoke(&self, token: &str, revoked_at: DateTime<Utc>) -> Result<bool, AuthError>;
}
