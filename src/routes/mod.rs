use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::Config,
    middleware::{make_span_with_request_id, request_id_middleware},
    state::AppState,
};

pub mod auth;
pub mod movies;
pub mod recommendations;
pub mod users;

/// Creates the application router with all routes
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(cors_layer(config))
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::register))
        .route(
            "/users/favorites/:id",
            put(users::add_favorite).delete(users::remove_favorite),
        )
        .route(
            "/users/watchlist/:id",
            put(users::add_watchlist).delete(users::remove_watchlist),
        )
        .route("/users/ratings/:id", post(users::rate_movie))
        .route("/auth", post(auth::login).get(auth::current_user))
        .route("/movies/:id", get(movies::movie_detail))
        .route("/recommendations", get(recommendations::recommend))
        .route(
            "/recommendations/similar/:id",
            get(recommendations::similar),
        )
        .route(
            "/recommendations/because-you-watched/:id",
            get(recommendations::because_you_watched),
        )
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-auth-token"),
        ])
        .allow_credentials(true)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
