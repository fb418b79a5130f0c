use std::sync::Arc;

use movie_similarity_api::{
    api::{create_router, AppState},
    config::Config,
    services::{
        catalog::{CatalogSource, CsvCatalog},
        rebuild::build_snapshot,
        BuildOptions,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn CatalogSource> =
        Arc::new(CsvCatalog::new(&config.movies_path, &config.credits_path));

    // The first build is quadratic in the catalog size; keep it off the runtime threads
    let options = BuildOptions::default().with_max_features(config.max_features);
    let source = catalog.clone();
    let snapshot =
        tokio::task::spawn_blocking(move || build_snapshot(source.as_ref(), &options)).await??;

    let state = AppState::new(&config, catalog, snapshot);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
