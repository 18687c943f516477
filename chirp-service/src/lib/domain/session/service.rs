use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use http::HeaderMap;

use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::session::models::RefreshTokenStatus;
use crate::domain::session::models::Session;
use crate::domain::user::models::UserId;
use crate::session::errors::AuthError;
use crate::session::ports::RefreshTokenRepository;
use crate::session::ports::SessionServicePort;
use crate::user::ports::UserRepository;

/// Tunables for session issuance, supplied by the surrounding process.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Access token lifetime (default 1 hour).
    pub access_ttl: Duration,
    /// Refresh token lifetime (default 60 days).
    pub refresh_ttl: Duration,
    /// Static key expected on webhook calls.
    pub webhook_key: String,
    /// Upper bound on any single persistence call.
    pub persistence_timeout: StdDuration,
}

impl SessionSettings {
    pub fn new(webhook_key: String) -> Self {
        Self {
            access_ttl: Duration::hours(1),
            refresh_ttl: Duration::days(60),
            webhook_key,
            persistence_timeout: StdDuration::from_secs(5),
        }
    }
}

/// Domain service for session operations.
///
/// Composes the credential primitives (hashing, signing, extraction) over
/// the injected repositories. Holds no mutable state of its own, so it is
/// freely shared across request workers without locking.
pub struct SessionService<RR, UR>
where
    RR: RefreshTokenRepository,
    UR: UserRepository,
{
    refresh_tokens: Arc<RR>,
    users: Arc<UR>,
    password_hasher: auth::PasswordHasher,
    jwt_handler: auth::JwtHandler,
    settings: SessionSettings,
}

impl<RR, UR> SessionService<RR, UR>
where
    RR: RefreshTokenRepository,
    UR: UserRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `refresh_tokens` - Refresh token persistence implementation
    /// * `users` - User persistence implementation
    /// * `jwt_secret` - Symmetric signing secret for access tokens
    /// * `password_hasher` - Configured hashing primitive
    /// * `settings` - Token lifetimes, webhook key, persistence timeout
    pub fn new(
        refresh_tokens: Arc<RR>,
        users: Arc<UR>,
        jwt_secret: &[u8],
        password_hasher: auth::PasswordHasher,
        settings: SessionSettings,
    ) -> Self {
        Self {
            refresh_tokens,
            users,
            password_hasher,
            jwt_handler: auth::JwtHandler::new(jwt_secret),
            settings,
        }
    }

    /// Bound a persistence call by the configured timeout.
    ///
    /// No retries here: retry policy belongs to the request layer.
    async fn bounded<F, T>(&self, operation: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, AuthError>>,
    {
        tokio::time::timeout(self.settings.persistence_timeout, operation)
            .await
            .map_err(|_| AuthError::Unavailable("persistence call timed out".to_string()))?
    }
}

#[async_trait]
impl<RR, UR> SessionServicePort for SessionService<RR, UR>
where
    RR: RefreshTokenRepository,
    UR: UserRepository,
{
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let user = self
            .bounded(async { self.users.find_by_email(email).await.map_err(AuthError::from) })
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        match self.password_hasher.verify(password, &user.password_hash) {
            Ok(()) => {}
            Err(auth::PasswordError::Mismatch) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(AuthError::Unknown(e.to_string())),
        }

        let access_token = self.jwt_handler.issue(user.id.0, self.settings.access_ttl)?;

        let refresh_token = auth::generate_refresh_token();
        let now = Utc::now();
        let record = RefreshTokenRecord {
            token: refresh_token.clone(),
            user_id: user.id,
            created_at: now,
            updated_at: now,
            expires_at: now + self.settings.refresh_ttl,
            revoked_at: None,
        };

        self.bounded(self.refresh_tokens.create(record)).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(Session {
            user,
            access_token,
            refresh_token,
        })
    }

    async fn authenticate_request(&self, headers: &HeaderMap) -> Result<UserId, AuthError> {
        let token = auth::extract::bearer_token(headers)?;
        let user_id = self.jwt_handler.validate(token)?;
        Ok(UserId(user_id))
    }

    async fn refresh_session(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        let token = auth::extract::bearer_token(headers)?;

        let record = self
            .bounded(self.refresh_tokens.find(token))
            .await?
            .ok_or(AuthError::RefreshNotFound)?;

        match record.status(Utc::now()) {
            RefreshTokenStatus::Revoked => Err(AuthError::RefreshRevoked),
            RefreshTokenStatus::Expired => Err(AuthError::RefreshExpired),
            RefreshTokenStatus::Active => {
                let access_token = self
                    .jwt_handler
                    .issue(record.user_id.0, self.settings.access_ttl)?;
                tracing::debug!(user_id = %record.user_id, "Access token renewed");
                Ok(access_token)
            }
        }
    }

    async fn revoke_session(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let token = auth::extract::bearer_token(headers)?;

        let record = self
            .bounded(self.refresh_tokens.find(token))
            .await?
            .ok_or(AuthError::RefreshNotFound)?;

        // Revoking twice is a no-op success; only a token that was never
        // issued is an error.
        if record.revoked_at.is_some() {
            return Ok(());
        }

        self.bounded(self.refresh_tokens.revoke(token, Utc::now()))
            .await?;

        tracing::info!(user_id = %record.user_id, "Refresh token revoked");

        Ok(())
    }

    fn authenticate_webhook(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let presented = auth::extract::api_key(headers)?;

        if auth::verify_api_key(presented, &self.settings.webhook_key) {
            Ok(())
        } else {
            Err(AuthError::InvalidApiKey)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use http::header::AUTHORIZATION;
    use uuid::Uuid;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::RegisterUserCommand;
    use crate::domain::user::models::User;
    use crate::user::errors::UserError;
    use crate::user::ports::UserServicePort;
    use crate::user::service::UserService;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";
    const WEBHOOK_KEY: &str = "f271c81ff7084ee5";

    /// Refresh token store backed by a map, with an optional artificial
    /// latency to exercise the persistence timeout.
    #[derive(Default)]
    struct InMemoryRefreshTokenRepository {
        records: Mutex<HashMap<String, RefreshTokenRecord>>,
        delay: Option<StdDuration>,
    }

    impl InMemoryRefreshTokenRepository {
        fn with_delay(delay: StdDuration) -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
                delay: Some(delay),
            }
        }

        fn insert(&self, record: RefreshTokenRecord) {
            self.records
                .lock()
                .unwrap()
                .insert(record.token.clone(), record);
        }

        async fn simulate_latency(&self) {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
        }
    }

    #[async_trait]
    impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
        async fn create(
            &self,
            record: RefreshTokenRecord,
        ) -> Result<RefreshTokenRecord, AuthError> {
            self.simulate_latency().await;
            self.insert(record.clone());
            Ok(record)
        }

        async fn find(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError> {
            self.simulate_latency().await;
            Ok(self.records.lock().unwrap().get(token).cloned())
        }

        async fn revoke(
            &self,
            token: &str,
            revoked_at: chrono::DateTime<Utc>,
        ) -> Result<bool, AuthError> {
            self.simulate_latency().await;
            let mut records = self.records.lock().unwrap();
            match records.get_mut(token) {
                Some(record) if record.revoked_at.is_none() => {
                    record.revoked_at = Some(revoked_at);
                    record.updated_at = revoked_at;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    #[derive(Default)]
    struct InMemoryUserRepository {
        users: Mutex<HashMap<Uuid, User>>,
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn create(&self, user: User) -> Result<User, UserError> {
            let mut users = self.users.lock().unwrap();
            if users.values().any(|u| u.email == user.email) {
                return Err(UserError::EmailAlreadyExists(
                    user.email.as_str().to_string(),
                ));
            }
            users.insert(user.id.0, user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
            Ok(self.users.lock().unwrap().get(&id.0).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email.as_str() == email)
                .cloned())
        }

        async fn update(&self, user: User) -> Result<User, UserError> {
            let mut users = self.users.lock().unwrap();
            if !users.contains_key(&user.id.0) {
                return Err(UserError::NotFound(user.id.to_string()));
            }
            users.insert(user.id.0, user.clone());
            Ok(user)
        }

        async fn upgrade_to_red(&self, id: &UserId) -> Result<(), UserError> {
            let mut users = self.users.lock().unwrap();
            match users.get_mut(&id.0) {
                Some(user) => {
                    user.is_red = true;
                    Ok(())
                }
                None => Err(UserError::NotFound(id.to_string())),
            }
        }

        async fn delete_all(&self) -> Result<(), UserError> {
            self.users.lock().unwrap().clear();
            Ok(())
        }
    }

    fn cheap_hasher() -> auth::PasswordHasher {
        auth::PasswordHasher::with_work_factor(1024, 1, 1).unwrap()
    }

    fn settings() -> SessionSettings {
        SessionSettings {
            access_ttl: Duration::hours(1),
            refresh_ttl: Duration::days(60),
            webhook_key: WEBHOOK_KEY.to_string(),
            persistence_timeout: StdDuration::from_secs(1),
        }
    }

    type TestSessionService =
        SessionService<InMemoryRefreshTokenRepository, InMemoryUserRepository>;

    fn session_service(
        refresh_tokens: Arc<InMemoryRefreshTokenRepository>,
        users: Arc<InMemoryUserRepository>,
    ) -> TestSessionService {
        SessionService::new(refresh_tokens, users, SECRET, cheap_hasher(), settings())
    }

    async fn registered_user(users: &Arc<InMemoryUserRepository>, email: &str, password: &str) {
        let user_service = UserService::new(Arc::clone(users), cheap_hasher());
        user_service
            .register(RegisterUserCommand::new(
                EmailAddress::new(email.to_string()).unwrap(),
                password.to_string(),
            ))
            .await
            .expect("registration failed");
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        headers
    }

    fn api_key_header(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("ApiKey {}", key).parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn test_login_success() {
        let users = Arc::new(InMemoryUserRepository::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());
        registered_user(&users, "a@example.com", "secret1").await;

        let service = session_service(Arc::clone(&refresh_tokens), users);
        let session = service.login("a@example.com", "secret1").await.unwrap();

        assert_eq!(session.user.email.as_str(), "a@example.com");
        assert_eq!(session.access_token.split('.').count(), 3);
        // Opaque, not JWT-structured
        assert!(!session.refresh_token.contains('.'));
        assert!(refresh_tokens
            .records
            .lock()
            .unwrap()
            .contains_key(&session.refresh_token));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let users = Arc::new(InMemoryUserRepository::default());
        registered_user(&users, "a@example.com", "secret1").await;

        let service =
            session_service(Arc::new(InMemoryRefreshTokenRepository::default()), users);
        let result = service.login("a@example.com", "wrong").await;

        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let service = session_service(
            Arc::new(InMemoryRefreshTokenRepository::default()),
            Arc::new(InMemoryUserRepository::default()),
        );
        let result = service.login("nobody@example.com", "secret1").await;

        // Indistinguishable from a wrong password
        assert!(matches!(result.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_request_roundtrip() {
        let users = Arc::new(InMemoryUserRepository::default());
        registered_user(&users, "a@example.com", "secret1").await;

        let service =
            session_service(Arc::new(InMemoryRefreshTokenRepository::default()), users);
        let session = service.login("a@example.com", "secret1").await.unwrap();

        let user_id = service
            .authenticate_request(&bearer(&session.access_token))
            .await
            .unwrap();
        assert_eq!(user_id, session.user.id);
    }

    #[tokio::test]
    async fn test_authenticate_request_missing_header() {
        let service = session_service(
            Arc::new(InMemoryRefreshTokenRepository::default()),
            Arc::new(InMemoryUserRepository::default()),
        );

        let result = service.authenticate_request(&HeaderMap::new()).await;
        assert!(matches!(
            result.unwrap_err(),
            AuthError::MissingCredential(_)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_request_garbage_token() {
        let service = session_service(
            Arc::new(InMemoryRefreshTokenRepository::default()),
            Arc::new(InMemoryUserRepository::default()),
        );

        let result = service
            .authenticate_request(&bearer("not.a.token"))
            .await;
        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_refresh_session_unknown_token() {
        let service = session_service(
            Arc::new(InMemoryRefreshTokenRepository::default()),
            Arc::new(InMemoryUserRepository::default()),
        );

        let result = service.refresh_session(&bearer("never-issued")).await;
        assert!(matches!(result.unwrap_err(), AuthError::RefreshNotFound));
    }

    #[tokio::test]
    async fn test_refresh_session_expired_token() {
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());
        let now = Utc::now();
        refresh_tokens.insert(RefreshTokenRecord {
            token: "stale".to_string(),
            user_id: UserId::new(),
            created_at: now - Duration::days(61),
            updated_at: now - Duration::days(61),
            expires_at: now - Duration::days(1),
            revoked_at: None,
        });

        let service =
            session_service(refresh_tokens, Arc::new(InMemoryUserRepository::default()));

        let result = service.refresh_session(&bearer("stale")).await;
        assert!(matches!(result.unwrap_err(), AuthError::RefreshExpired));
    }

    #[tokio::test]
    async fn test_revoke_then_refresh_fails() {
        let users = Arc::new(InMemoryUserRepository::default());
        registered_user(&users, "a@example.com", "secret1").await;

        let service =
            session_service(Arc::new(InMemoryRefreshTokenRepository::default()), users);
        let session = service.login("a@example.com", "secret1").await.unwrap();
        let headers = bearer(&session.refresh_token);

        service.revoke_session(&headers).await.unwrap();

        let result = service.refresh_session(&headers).await;
        assert!(matches!(result.unwrap_err(), AuthError::RefreshRevoked));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let users = Arc::new(InMemoryUserRepository::default());
        registered_user(&users, "a@example.com", "secret1").await;

        let service =
            session_service(Arc::new(InMemoryRefreshTokenRepository::default()), users);
        let session = service.login("a@example.com", "secret1").await.unwrap();
        let headers = bearer(&session.refresh_token);

        service.revoke_session(&headers).await.unwrap();
        // Second revoke is a no-op success
        service.revoke_session(&headers).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke_unknown_token() {
        let service = session_service(
            Arc::new(InMemoryRefreshTokenRepository::default()),
            Arc::new(InMemoryUserRepository::default()),
        );

        let result = service.revoke_session(&bearer("never-issued")).await;
        assert!(matches!(result.unwrap_err(), AuthError::RefreshNotFound));
    }

    #[tokio::test]
    async fn test_refresh_does_not_rotate_token() {
        let users = Arc::new(InMemoryUserRepository::default());
        registered_user(&users, "a@example.com", "secret1").await;

        let service =
            session_service(Arc::new(InMemoryRefreshTokenRepository::default()), users);
        let session = service.login("a@example.com", "secret1").await.unwrap();
        let headers = bearer(&session.refresh_token);

        // Same refresh token keeps working across renewals
        service.refresh_session(&headers).await.unwrap();
        service.refresh_session(&headers).await.unwrap();
    }

    #[tokio::test]
    async fn test_persistence_timeout_maps_to_unavailable() {
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::with_delay(
            StdDuration::from_millis(200),
        ));
        let users = Arc::new(InMemoryUserRepository::default());

        let mut slow_settings = settings();
        slow_settings.persistence_timeout = StdDuration::from_millis(50);
        let service =
            SessionService::new(refresh_tokens, users, SECRET, cheap_hasher(), slow_settings);

        let result = service.refresh_session(&bearer("any-token")).await;
        assert!(matches!(result.unwrap_err(), AuthError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_authenticate_webhook() {
        let service = session_service(
            Arc::new(InMemoryRefreshTokenRepository::default()),
            Arc::new(InMemoryUserRepository::default()),
        );

        assert!(service
            .authenticate_webhook(&api_key_header(WEBHOOK_KEY))
            .is_ok());

        let result = service.authenticate_webhook(&api_key_header("wrong-key"));
        assert!(matches!(result.unwrap_err(), AuthError::InvalidApiKey));

        let result = service.authenticate_webhook(&HeaderMap::new());
        assert!(matches!(
            result.unwrap_err(),
            AuthError::MissingCredential(_)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_revoke_and_refresh() {
        let users = Arc::new(InMemoryUserRepository::default());
        registered_user(&users, "a@example.com", "secret1").await;

        let service = Arc::new(session_service(
            Arc::new(InMemoryRefreshTokenRepository::default()),
            users,
        ));
        let session = service.login("a@example.com", "secret1").await.unwrap();
        let headers = bearer(&session.refresh_token);

        // No ordering guarantee between a racing revoke and renew: the renew
        // may observe the token either before or after revocation. Both
        // outcomes are acceptable; neither call may fail any other way.
        let (revoked, refreshed) = tokio::join!(
            service.revoke_session(&headers),
            service.refresh_session(&headers),
        );

        revoked.unwrap();
        match refreshed {
            Ok(_) | Err(AuthError::RefreshRevoked) => {}
            other => panic!("unexpected renew outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_full_session_lifecycle() {
        let users = Arc::new(InMemoryUserRepository::default());
        let refresh_tokens = Arc::new(InMemoryRefreshTokenRepository::default());

        let user_service = UserService::new(Arc::clone(&users), cheap_hasher());
        let session_service = session_service(refresh_tokens, Arc::clone(&users));

        // Register
        let user = user_service
            .register(RegisterUserCommand::new(
                EmailAddress::new("a@example.com".to_string()).unwrap(),
                "secret1".to_string(),
            ))
            .await
            .unwrap();

        // Login yields a validating access token and a refresh token
        let session = session_service
            .login("a@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(session.user.id, user.id);
        let authenticated = session_service
            .authenticate_request(&bearer(&session.access_token))
            .await
            .unwrap();
        assert_eq!(authenticated, user.id);

        // Renew: fresh access token for the same identity
        let renewed = session_service
            .refresh_session(&bearer(&session.refresh_token))
            .await
            .unwrap();
        let authenticated = session_service
            .authenticate_request(&bearer(&renewed))
            .await
            .unwrap();
        assert_eq!(authenticated, user.id);

        // Revoke, then renewal fails
        session_service
            .revoke_session(&bearer(&session.refresh_token))
            .await
            .unwrap();
        let result = session_service
            .refresh_session(&bearer(&session.refresh_token))
            .await;
        assert!(matches!(result.unwrap_err(), AuthError::RefreshRevoked));
    }
}
