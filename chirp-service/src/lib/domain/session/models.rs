use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Server-side record backing an opaque refresh token.
///
/// The token string itself has no structure; everything that decides its
/// validity lives in this record. Records are never deleted (audit trail),
/// revocation only sets `revoked_at`.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Derive the token's lifecycle state at `now`.
    ///
    /// Revocation wins over expiry: a token that is both revoked and past
    /// its expiry reports `Revoked`. Both states are terminal.
    pub fn status(&self, now: DateTime<Utc>) -> RefreshTokenStatus {
        if self.revoked_at.is_some() {
            RefreshTokenStatus::Revoked
        } else if self.expires_at <= now {
            RefreshTokenStatus::Expired
        } else {
            RefreshTokenStatus::Active
        }
    }
}

/// Lifecycle state of a refresh token.
///
/// `Expired` is a derived predicate of `expires_at`, not a stored flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenStatus {
    Active,
    Expired,
    Revoked,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}
