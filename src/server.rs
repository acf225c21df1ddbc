//! HTTP server initialization and runtime setup.
//!
//! Handles storage selection, cache setup, service wiring, and Axum server lifecycle.

use crate::application::services::{CodeAllocator, ResolverService};
use crate::config::Config;
use crate::domain::clock::SystemClock;
use crate::domain::expiry::ExpiryPolicy;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Resolver service
/// - Axum HTTP server with graceful shutdown on Ctrl-C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config).await?;
    let cache = build_cache(&config).await;

    let resolver = build_resolver(&config, store)?;
    let state = AppState::new(Arc::new(resolver), cache);

    let app = app_router(state, &config);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Opens a PostgreSQL pool using the configured pool settings.
pub async fn connect_database(database_url: &str, config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Selects the link store: PostgreSQL when a database is configured, memory otherwise.
pub async fn build_store(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    match &config.database_url {
        Some(database_url) => {
            let pool = connect_database(database_url, config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
        }
        None => {
            tracing::warn!("No database configured, links are kept in memory only");
            Ok(Arc::new(MemoryLinkRepository::new()))
        }
    }
}

/// Connects the redirect cache, falling back to [`NullCache`] on any failure.
pub async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    }
}

/// Wires generator, allocator and expiry policy into a [`ResolverService`] over `store`.
pub fn build_resolver(config: &Config, store: Arc<dyn LinkRepository>) -> Result<ResolverService> {
    let generator = RandomCodeGenerator::new(&config.code_alphabet, config.code_length)
        .map_err(|e| anyhow::anyhow!("Invalid code generator settings: {}", e))?;

    tracing::debug!(
        "Code space: {} codes of length {}",
        generator.code_space(),
        generator.length()
    );

    let allocator = CodeAllocator::new(Arc::new(generator), config.code_max_attempts);
    let expiry = ExpiryPolicy::new(
        config.default_validity_minutes,
        config.max_validity_minutes,
    );

    Ok(ResolverService::new(
        store,
        allocator,
        expiry,
        Arc::new(SystemClock),
        config.base_url.clone(),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
