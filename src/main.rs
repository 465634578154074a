use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinemood_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{
        genre_directory::GenreDirectory,
        preference_store::PreferenceStore,
        providers::{tmdb::TmdbProvider, CatalogProvider},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn CatalogProvider> = Arc::new(
        TmdbProvider::from_config(&config).context("Failed to build catalog client")?,
    );
    tracing::info!(
        provider = catalog.name(),
        timeout_secs = config.http_timeout_secs,
        "Catalog provider ready"
    );

    let genres = GenreDirectory::load(catalog.as_ref())
        .await
        .context("Failed to load genre list from the catalog")?;

    let store = PreferenceStore::open(&config.user_data_path).await;

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, catalog, genres, store));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app).await?;
    Ok(())
}
