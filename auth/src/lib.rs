//! Authentication utilities library
//!
//! Provides the credential primitives for the chirp service:
//! - Password hashing (Argon2id)
//! - Signed access tokens (JWT, HS256)
//! - Opaque refresh token generation
//! - Credential extraction from request headers
//! - Constant-time API key verification
//!
//! The service defines its own session logic on top of these primitives;
//! this crate stays stateless and side-effect free so every operation is
//! reentrant under concurrent request handling.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let user_id = Uuid::new_v4();
//! let token = handler.issue(user_id, Duration::hours(1)).unwrap();
//! assert_eq!(handler.validate(&token).unwrap(), user_id);
//! ```
//!
//! ## Credential Extraction
//! ```
//! use http::header::AUTHORIZATION;
//! use http::HeaderMap;
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(AUTHORIZATION, "Bearer some-token".parse().unwrap());
//! assert_eq!(auth::extract::bearer_token(&headers).unwrap(), "some-token");
//! ```

pub mod apikey;
pub mod extract;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use apikey::verify_api_key;
pub use extract::ExtractError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::generate_refresh_token;
