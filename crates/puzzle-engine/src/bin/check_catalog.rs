//! Validate a puzzle catalog without starting the server.
//!
//! Loads the catalog the same way the server does and lists every puzzle
//! that would be skipped, with the reason.
//!
//! Usage:
//!   cargo run --bin check-catalog -- data/puzzles.json
//!   cargo run --bin check-catalog -- https://example.org/puzzles.json

use std::collections::BTreeMap;
use std::env;

use anyhow::Context;
use puzzle_engine::catalog::DEFAULT_FETCH_TIMEOUT;
use puzzle_engine::{CatalogSource, PuzzleCatalog};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let arg = env::args()
        .nth(1)
        .context("usage: check-catalog <path-or-url>")?;
    let source = CatalogSource::from(arg.as_str());

    let mut catalog = PuzzleCatalog::new();
    let report = catalog
        .load(&source, DEFAULT_FETCH_TIMEOUT)
        .await
        .with_context(|| format!("loading {source}"))?;

    println!("Source:   {source}");
    println!("Loaded:   {}", report.loaded);
    println!("Rejected: {}", report.rejected.len());

    let mut per_theme: BTreeMap<String, usize> = BTreeMap::new();
    for puzzle in catalog.puzzles() {
        *per_theme.entry(puzzle.theme.to_string()).or_default() += 1;
    }
    for (theme, count) in &per_theme {
        println!("  {theme:<24} {count}");
    }

    if !report.rejected.is_empty() {
        println!();
        for r in &report.rejected {
            println!("  #{:<4} {:<20} {}", r.index, r.id, r.reason);
        }
    }

    Ok(())
}
