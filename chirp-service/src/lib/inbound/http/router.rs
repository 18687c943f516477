use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin::metrics;
use super::handlers::admin::reset;
use super::handlers::create_chirp::create_chirp;
use super::handlers::create_user::create_user;
use super::handlers::delete_chirp::delete_chirp;
use super::handlers::get_chirp::get_chirp;
use super::handlers::health::healthz;
use super::handlers::list_chirps::list_chirps;
use super::handlers::login::login;
use super::handlers::refresh::refresh;
use super::handlers::revoke::revoke;
use super::handlers::update_user::update_user;
use super::handlers::webhooks::polka_webhook;
use super::metrics::HitCounter;
use super::middleware::authenticate as auth_middleware;
use super::middleware::count_hit;
use crate::domain::chirp::service::ChirpService;
use crate::domain::session::service::SessionService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::PostgresChirpRepository;
use crate::outbound::repositories::PostgresRefreshTokenRepository;
use crate::outbound::repositories::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository>>,
    pub session_service: Arc<SessionService<PostgresRefreshTokenRepository, PostgresUserRepository>>,
    pub chirp_service: Arc<ChirpService<PostgresChirpRepository>>,
    pub hit_counter: Arc<HitCounter>,
    pub platform: String,
}

pub fn create_router(
    user_service: Arc<UserService<PostgresUserRepository>>,
    session_service: Arc<SessionService<PostgresRefreshTokenRepository, PostgresUserRepository>>,
    chirp_service: Arc<ChirpService<PostgresChirpRepository>>,
    platform: String,
) -> Router {
    let state = AppState {
        user_service,
        session_service,
        chirp_service,
        hit_counter: Arc::new(HitCounter::new()),
        platform,
    };

    let public_routes = Router::new()
        .route("/api/healthz", get(healthz))
        .route("/api/users", post(create_user))
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
        .route("/api/revoke", post(revoke))
        .route("/api/chirps", get(list_chirps))
        .route("/api/chirps/:chirp_id", get(get_chirp))
        .route("/api/webhooks", post(polka_webhook));

    let protected_routes = Router::new()
        .route("/api/users", put(update_user))
        .route("/api/chirps", post(create_chirp))
        .route("/api/chirps/:chirp_id", delete(delete_chirp))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), count_hit));

    let admin_routes = Router::new()
        .route("/admin/metrics", get(metrics))
        .route("/admin/reset", post(reset));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(api_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
