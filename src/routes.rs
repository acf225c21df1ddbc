//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`        - Create a short link (rate limited)
//! - `POST /shorten/batch`  - Create up to five short links (rate limited)
//! - `GET  /health`         - Health check: storage, cache
//! - `GET  /{code}`         - Short link redirect
//!
//! Static segments win over `/{code}`, which is why `health` and `shorten`
//! are reserved and never handed out as codes.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the create routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `config` - supplies the rate limit quota for the create routes
pub fn app_router(state: AppState, config: &Config) -> NormalizePath<Router> {
    let create_router = api::routes::create_routes().layer(rate_limit::layer(
        config.rate_limit_per_second,
        config.rate_limit_burst,
    ));

    let router = Router::new()
        .merge(create_router)
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
