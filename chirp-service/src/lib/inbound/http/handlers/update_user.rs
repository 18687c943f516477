use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::create_user::CreateUserResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateCredentialsCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;

/// HTTP request body for replacing login credentials (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    email: String,
    password: String,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateCredentialsCommand, EmailError> {
        let email = EmailAddress::new(self.email)?;
        Ok(UpdateCredentialsCommand {
            email,
            password: self.password,
        })
    }
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(requester): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<CreateUserResponseData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .user_service
        .update_credentials(&requester.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
