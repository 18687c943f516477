use async_trait::async_trait;

use crate::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::ChirpQuery;
use crate::domain::chirp::models::CreateChirpCommand;
use crate::domain::user::models::UserId;

/// Port for chirp domain service operations.
#[async_trait]
pub trait ChirpServicePort: Send + Sync + 'static {
    /// Post a new chirp after length validation and word cleaning.
    ///
    /// # Errors
    /// * `TooLong` - Body exceeds the length limit
    /// * `DatabaseError` - Database operation failed
    async fn create_chirp(&self, command: CreateChirpCommand) -> Result<Chirp, ChirpError>;

    /// Retrieve a single chirp.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError>;

    /// List chirps, optionally filtered by author and ordered by creation
    /// time.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_chirps(&self, query: ChirpQuery) -> Result<Vec<Chirp>, ChirpError>;

    /// Delete a chirp; only its author may do so.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    /// * `NotOwner` - Requester is not the chirp's author
    /// * `DatabaseError` - Database operation failed
    async fn delete_chirp(&self, id: &ChirpId, requester: &UserId) -> Result<(), ChirpError>;
}

/// Persistence operations for the chirp aggregate.
#[async_trait]
pub trait ChirpRepository: Send + Sync + 'static {
    /// Persist new chirp to storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, chirp: Chirp) -> Result<Chirp, ChirpError>;

    /// Retrieve chirp by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError>;

    /// Retrieve all chirps ordered by creation time ascending.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<Chirp>, ChirpError>;

    /// Retrieve all chirps by one author, ordered by creation time
    /// ascending.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Chirp>, ChirpError>;

    /// Remove chirp from storage.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError>;
}
