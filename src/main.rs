use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use cinegraph_api::api::{create_router, AppState};
use cinegraph_api::config::Config;
use cinegraph_api::db::{create_redis_client, Cache};
use cinegraph_api::middleware::{make_span_with_request_id, request_id_middleware};
use cinegraph_api::services::providers::{CatalogClient, FilmArchiveClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinegraph_api=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client).await;

    let catalog = Arc::new(CatalogClient::new(
        cache.clone(),
        config.catalog_api_url.clone(),
    ));
    let archive = Arc::new(FilmArchiveClient::new(
        cache,
        config.archive_api_url.clone(),
        config.archive_api_key.clone(),
    ));

    let state = AppState::new(catalog, archive);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush queued cache writes before exiting.
    cache_writer.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
