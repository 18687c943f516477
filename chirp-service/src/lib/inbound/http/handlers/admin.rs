use axum::extract::State;
use axum::response::Html;

use super::ApiError;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n\
         <body>\n\
         <h1>Welcome, Chirpy Admin</h1>\n\
         <p>Chirpy has been visited {} times!</p>\n\
         </body>\n\
         </html>",
        state.hit_counter.value()
    ))
}

/// Wipe users and zero the hit counter. Development environments only.
pub async fn reset(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    if state.platform != "dev" {
        return Err(ApiError::Forbidden(
            "Reset is only allowed on the dev platform".to_string(),
        ));
    }

    state.user_service.delete_all().await.map_err(ApiError::from)?;
    state.hit_counter.reset();

    tracing::info!("Users deleted and hit counter reset");

    Ok("Hits reset to 0 and database reset to initial state.")
}
