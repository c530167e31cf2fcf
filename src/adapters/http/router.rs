//! Top-level HTTP router: versioned API, health probe, and middleware.

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

use super::patron::{healthz, patron_routes, PatronAppState};

/// Builds the full application router.
///
/// `GET /healthz` stays at the root; patron routes are nested under
/// `config.api.prefix`.
pub fn build_router(state: PatronAppState, config: &AppConfig) -> Router {
    let api = match config.api.prefix.as_str() {
        "" | "/" => patron_routes(),
        prefix => Router::new().nest(prefix, patron_routes()),
    };

    Router::new()
        .route("/healthz", get(healthz))
        .merge(api)
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(allowed)
}
