use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinematch_api::{
    api::{create_router, AppState},
    config::Config,
    db::{build_profile_store, create_redis_client, Cache},
    services::{ImageUrls, TmdbCatalog},
};

const DEFAULT_LOG_FILTER: &str = "cinematch_api=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client.clone()).await;

    let catalog = TmdbCatalog::new(cache, config.tmdb_api_key.clone(), config.tmdb_api_url.clone())
        .context("Movie catalog is not configured")?;
    let profiles = build_profile_store(&config, redis_client)
        .await
        .context("Failed to initialize profile store")?;

    let state = AppState::new(
        profiles,
        Arc::new(catalog),
        ImageUrls::new(config.tmdb_image_url.clone()),
    );
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
