#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use puzzle_engine::catalog::DEFAULT_FETCH_TIMEOUT;
use puzzle_engine::{CatalogSource, PuzzleCatalog};
use reqwest::Client;
use server::config::Config;
use server::state::AppState;

/// Sample catalog shipped with the repository.
pub const SAMPLE_CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/puzzles.json");

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

/// Generate a unique suffix based on timestamp to avoid collisions.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", ts % 1_000_000_000)
}

/// Write `contents` to a fresh file in the temp dir and return its path.
pub fn temp_catalog(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("puzzles-{}.json", unique_suffix()));
    std::fs::write(&path, contents).expect("Failed to write temp catalog");
    path
}

pub async fn sample_catalog() -> PuzzleCatalog {
    let mut catalog = PuzzleCatalog::with_seed(7);
    catalog
        .load(&CatalogSource::from(SAMPLE_CATALOG), DEFAULT_FETCH_TIMEOUT)
        .await
        .expect("Failed to load sample catalog");
    catalog
}

/// Serve the full router on an ephemeral port, backed by the sample
/// catalog. Returns the base URL.
pub async fn spawn_server() -> String {
    let config = Config {
        puzzle_source: SAMPLE_CATALOG.to_string(),
        ..Config::default()
    };
    let state = AppState::new(config, sample_catalog().await);
    let app = server::routes::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });
    format!("http://{addr}")
}
