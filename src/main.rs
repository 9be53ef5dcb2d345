use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use movie_tracker::{
    api::{create_router, AppState},
    config::Config,
    db::{create_pool, create_redis_client, run_migrations, Cache, PgMovieRepository},
    services::providers::{CachedDirectory, TmdbDirectory},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_tracker=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    run_migrations(&pool).await?;

    let mut state = AppState::with_repository(Arc::new(PgMovieRepository::new(pool)));

    let mut cache_handle = None;
    match &config.tmdb_api_key {
        Some(key) => {
            let redis_client = create_redis_client(&config.redis_url)?;
            let (cache, handle) = Cache::new(redis_client);
            let tmdb = TmdbDirectory::new(Some(key.clone()), config.tmdb_api_url.as_str());
            state = state.with_directory(Arc::new(CachedDirectory::new(Arc::new(tmdb), cache)));
            cache_handle = Some(handle);
        }
        None => tracing::warn!("TMDB_API_KEY not set, /search/movie is disabled"),
    }

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Movie store listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Movie store stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
