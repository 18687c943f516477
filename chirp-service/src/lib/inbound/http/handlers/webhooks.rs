use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::session::ports::SessionServicePort;
use crate::user::errors::UserError;

const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Payment provider webhook.
///
/// Key-checked before the body is inspected. Events other than
/// `user.upgraded` are acknowledged and ignored so the provider does not
/// retry them.
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<WebhookRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .session_service
        .authenticate_webhook(&headers)
        .map_err(ApiError::from)?;

    if body.event != USER_UPGRADED_EVENT {
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = UserId::from_string(&body.data.user_id).map_err(UserError::from)?;

    state
        .user_service
        .upgrade_to_red(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|()| StatusCode::NO_CONTENT)
}

/// Webhook payload (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookRequest {
    event: String,
    data: WebhookData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookData {
    user_id: String,
}
