//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::{debug, error};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Check cache for the target
/// 2. On cache miss, resolve through the store (expiry is enforced here)
/// 3. Asynchronously cache the target, bounded by its remaining validity
/// 4. Return 302 Found
///
/// # Cache Strategy
///
/// - **Cache hit**: Immediate redirect; entries never outlive the link
/// - **Cache miss**: Resolve, spawn async cache write
/// - **Cache error**: Log and fall back to the store
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let target_url = match state.cache.get_url(&code).await {
        Ok(Some(cached_url)) => {
            debug!("Cache HIT for {}", code);
            cached_url
        }
        Ok(None) => {
            debug!("Cache MISS for {}", code);

            let record = state.resolver.lookup_active(&code).await?;
            let remaining = record.remaining_seconds(state.resolver.clock().now());

            // Asynchronously update cache (fire-and-forget)
            let cache = state.cache.clone();
            let target = record.target_url.clone();
            tokio::spawn(async move {
                if let Err(e) = cache.set_url(&code, &target, Some(remaining)).await {
                    error!("Failed to cache URL: {}", e);
                }
            });

            record.target_url
        }
        Err(e) => {
            error!("Cache error: {}", e);
            state.resolver.resolve(&code).await?
        }
    };

    Ok((StatusCode::FOUND, [(header::LOCATION, target_url)]))
}
