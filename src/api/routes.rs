//! API route configuration.

use crate::api::handlers::{batch_shorten_handler, shorten_handler};
use crate::state::AppState;
use axum::{Router, routing::post};

/// Link creation routes.
///
/// # Endpoints
///
/// - `POST /shorten`        - Create one short link
/// - `POST /shorten/batch`  - Create up to five short links, each processed independently
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/shorten/batch", post(batch_shorten_handler))
}
