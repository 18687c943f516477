use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::create_chirp::ChirpResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::chirp::models::ChirpQuery;
use crate::domain::chirp::models::SortOrder;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Query string for listing chirps (raw values, parsed here)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListChirpsParams {
    author_id: Option<String>,
    sort: Option<String>,
}

impl ListChirpsParams {
    fn try_into_query(self) -> Result<ChirpQuery, ApiError> {
        let author_id = self
            .author_id
            .as_deref()
            .map(UserId::from_string)
            .transpose()
            .map_err(UserError::from)?;

        let order = match self.sort.as_deref() {
            None => None,
            Some("asc") => Some(SortOrder::Ascending),
            Some("desc") => Some(SortOrder::Descending),
            Some(other) => {
                return Err(ApiError::BadRequest(format!(
                    "Invalid sort order: {}, expected asc or desc",
                    other
                )))
            }
        };

        Ok(ChirpQuery { author_id, order })
    }
}

pub async fn list_chirps(
    State(state): State<AppState>,
    Query(params): Query<ListChirpsParams>,
) -> Result<ApiSuccess<Vec<ChirpResponseData>>, ApiError> {
    let query = params.try_into_query()?;

    state
        .chirp_service
        .list_chirps(query)
        .await
        .map_err(ApiError::from)
        .map(|chirps| {
            ApiSuccess::new(
                StatusCode::OK,
                chirps.iter().map(ChirpResponseData::from).collect(),
            )
        })
}
