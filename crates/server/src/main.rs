use server::config;
use server::routes;
use server::state::AppState;

use puzzle_engine::{CatalogSource, PuzzleCatalog};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    // A missing or broken catalog is not fatal: the server starts empty and
    // the admin reload route can fix it later.
    let source = CatalogSource::from(config.puzzle_source.as_str());
    tracing::info!("Loading puzzle catalog from {source}...");
    let mut catalog = PuzzleCatalog::new();
    match catalog.load(&source, config.catalog_timeout()).await {
        Ok(report) => {
            tracing::info!(
                "Loaded {} puzzles ({} rejected)",
                report.loaded,
                report.rejected.len()
            );
        }
        Err(e) => tracing::warn!("Starting with an empty catalog: {e}"),
    }

    let addr = format!("{}:{}", config.host, config.port);
    let app = routes::router(AppState::new(config, catalog));

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
