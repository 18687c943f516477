use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::ChirpQuery;
use crate::domain::chirp::models::CreateChirpCommand;
use crate::domain::chirp::models::SortOrder;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::domain::user::models::UserId;

/// Maximum chirp body length in characters.
const MAX_BODY_LENGTH: usize = 140;

/// Words replaced by `****` in chirp bodies.
const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

/// Domain service implementation for chirp operations.
pub struct ChirpService<CR>
where
    CR: ChirpRepository,
{
    repository: Arc<CR>,
}

impl<CR> ChirpService<CR>
where
    CR: ChirpRepository,
{
    pub fn new(repository: Arc<CR>) -> Self {
        Self { repository }
    }
}

/// Replace banned words with `****`.
///
/// Whole words only, case-insensitive; punctuation attached to a word
/// protects it, matching the original moderation behavior.
fn clean_body(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            if BANNED_WORDS.contains(&word.to_lowercase().as_str()) {
                "****"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl<CR> ChirpServicePort for ChirpService<CR>
where
    CR: ChirpRepository,
{
    async fn create_chirp(&self, command: CreateChirpCommand) -> Result<Chirp, ChirpError> {
        let length = command.body.chars().count();
        if length > MAX_BODY_LENGTH {
            return Err(ChirpError::TooLong {
                max: MAX_BODY_LENGTH,
                actual: length,
            });
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: ChirpId::new(),
            user_id: command.user_id,
            body: clean_body(&command.body),
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(chirp).await?;

        tracing::info!(chirp_id = %created.id, user_id = %created.user_id, "Chirp posted");

        Ok(created)
    }

    async fn get_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ChirpError::NotFound(id.to_string()))
    }

    async fn list_chirps(&self, query: ChirpQuery) -> Result<Vec<Chirp>, ChirpError> {
        let mut chirps = match query.author_id {
            Some(author_id) => self.repository.list_by_author(&author_id).await?,
            None => self.repository.list_all().await?,
        };

        // Repository returns ascending; only a descending request reorders.
        if query.order == Some(SortOrder::Descending) {
            chirps.sort_by(|l, r| r.created_at.cmp(&l.created_at));
        }

        Ok(chirps)
    }

    async fn delete_chirp(&self, id: &ChirpId, requester: &UserId) -> Result<(), ChirpError> {
        let chirp = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ChirpError::NotFound(id.to_string()))?;

        if chirp.user_id != *requester {
            return Err(ChirpError::NotOwner);
        }

        self.repository.delete(id).await?;

        tracing::info!(chirp_id = %id, user_id = %requester, "Chirp deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;

    mock! {
        pub TestChirpRepository {}

        #[async_trait]
        impl ChirpRepository for TestChirpRepository {
            async fn create(&self, chirp: Chirp) -> Result<Chirp, ChirpError>;
            async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError>;
            async fn list_all(&self) -> Result<Vec<Chirp>, ChirpError>;
            async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Chirp>, ChirpError>;
            async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError>;
        }
    }

    fn chirp_at(offset: Duration) -> Chirp {
        let at = Utc::now() + offset;
        Chirp {
            id: ChirpId::new(),
            user_id: UserId::new(),
            body: "hello".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_clean_body_replaces_banned_words() {
        assert_eq!(
            clean_body("This is a kerfuffle opinion I need to share"),
            "This is a **** opinion I need to share"
        );
        assert_eq!(clean_body("SHARBERT and Fornax"), "**** and ****");
        // Punctuation protects a word
        assert_eq!(clean_body("kerfuffle!"), "kerfuffle!");
        assert_eq!(clean_body("no bad words here"), "no bad words here");
    }

    #[tokio::test]
    async fn test_create_chirp_cleans_body() {
        let mut repository = MockTestChirpRepository::new();

        repository
            .expect_create()
            .withf(|chirp| chirp.body == "what a ****")
            .times(1)
            .returning(|chirp| Ok(chirp));

        let service = ChirpService::new(Arc::new(repository));
        let result = service
            .create_chirp(CreateChirpCommand {
                user_id: UserId::new(),
                body: "what a fornax".to_string(),
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_chirp_too_long() {
        let repository = MockTestChirpRepository::new();
        let service = ChirpService::new(Arc::new(repository));

        let result = service
            .create_chirp(CreateChirpCommand {
                user_id: UserId::new(),
                body: "x".repeat(141),
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            ChirpError::TooLong { max: 140, actual: 141 }
        ));
    }

    #[tokio::test]
    async fn test_create_chirp_at_limit() {
        let mut repository = MockTestChirpRepository::new();
        repository
            .expect_create()
            .times(1)
            .returning(|chirp| Ok(chirp));

        let service = ChirpService::new(Arc::new(repository));
        let result = service
            .create_chirp(CreateChirpCommand {
                user_id: UserId::new(),
                body: "x".repeat(140),
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_list_chirps_descending() {
        let mut repository = MockTestChirpRepository::new();

        let older = chirp_at(Duration::seconds(-10));
        let newer = chirp_at(Duration::zero());
        let ascending = vec![older.clone(), newer.clone()];
        repository
            .expect_list_all()
            .times(1)
            .returning(move || Ok(ascending.clone()));

        let service = ChirpService::new(Arc::new(repository));
        let chirps = service
            .list_chirps(ChirpQuery {
                author_id: None,
                order: Some(SortOrder::Descending),
            })
            .await
            .unwrap();

        assert_eq!(chirps[0].id, newer.id);
        assert_eq!(chirps[1].id, older.id);
    }

    #[tokio::test]
    async fn test_list_chirps_by_author() {
        let mut repository = MockTestChirpRepository::new();

        let author_id = UserId::new();
        let chirp = chirp_at(Duration::zero());
        let returned = vec![chirp.clone()];
        repository
            .expect_list_by_author()
            .withf(move |id| *id == author_id)
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let service = ChirpService::new(Arc::new(repository));
        let chirps = service
            .list_chirps(ChirpQuery {
                author_id: Some(author_id),
                order: None,
            })
            .await
            .unwrap();

        assert_eq!(chirps.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_chirp_requires_ownership() {
        let mut repository = MockTestChirpRepository::new();

        let chirp = chirp_at(Duration::zero());
        let chirp_id = chirp.id;
        let returned = chirp.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repository.expect_delete().times(0);

        let service = ChirpService::new(Arc::new(repository));
        let stranger = UserId::new();

        let result = service.delete_chirp(&chirp_id, &stranger).await;
        assert!(matches!(result.unwrap_err(), ChirpError::NotOwner));
    }

    #[tokio::test]
    async fn test_delete_chirp_by_author() {
        let mut repository = MockTestChirpRepository::new();

        let chirp = chirp_at(Duration::zero());
        let chirp_id = chirp.id;
        let author_id = chirp.user_id;
        let returned = chirp.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));
        repository
            .expect_delete()
            .withf(move |id| *id == chirp_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = ChirpService::new(Arc::new(repository));
        let result = service.delete_chirp(&chirp_id, &author_id).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_chirp_not_found() {
        let mut repository = MockTestChirpRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = ChirpService::new(Arc::new(repository));
        let result = service.delete_chirp(&ChirpId::new(), &UserId::new()).await;
        assert!(matches!(result.unwrap_err(), ChirpError::NotFound(_)));
    }
}
