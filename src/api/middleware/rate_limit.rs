//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Per-IP limiter layer applied to the create routes.
pub type RateLimitLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter for the link creation endpoints.
///
/// # Limits
///
/// - **Replenish**: one request every `per_second` seconds
///   (`RATE_LIMIT_PER_SECOND`, default 2)
/// - **Burst**: `burst` requests (`RATE_LIMIT_BURST`, default 100)
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .layer(rate_limit::layer(2, 100));
/// ```
pub fn layer(per_second: u64, burst: u32) -> RateLimitLayer {
    // Zero values are rejected by `Config::validate`; clamp for direct callers.
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second.max(1))
            .burst_size(burst.max(1))
            .finish()
            .expect("non-zero quota always builds"),
    );

    GovernorLayer::new(governor_conf)
}
