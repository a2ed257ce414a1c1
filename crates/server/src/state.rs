//! Shared server state: the loaded catalog and the open sittings.
//!
//! A sitting is one client's run through a series of puzzles. It owns a
//! solution engine, a scoreboard and its own catalog cursor. Each sitting
//! sits behind its own mutex, so moves from one client are applied one at
//! a time while different clients never wait on each other.
//!
//! Sittings are anonymous, so nothing but idleness tells us a client has
//! gone. Every lookup stamps the sitting; any sitting left alone longer
//! than `Config::sitting_idle` is dropped on the next create or lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use puzzle_engine::{
    CatalogLoadError, CatalogSource, LoadReport, PuzzleCatalog, SessionScoreboard, SolutionEngine,
};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

pub struct Sitting {
    pub engine: SolutionEngine,
    pub scoreboard: SessionScoreboard,
    pub catalog: PuzzleCatalog,
}

impl Sitting {
    pub fn new(catalog: PuzzleCatalog) -> Self {
        Self {
            engine: SolutionEngine::new(),
            scoreboard: SessionScoreboard::new(),
            catalog,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    config: Config,
    catalog: RwLock<PuzzleCatalog>,
    sittings: Mutex<HashMap<Uuid, SittingSlot>>,
}

struct SittingSlot {
    sitting: Arc<Mutex<Sitting>>,
    last_seen: Instant,
}

impl AppState {
    pub fn new(config: Config, catalog: PuzzleCatalog) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                catalog: RwLock::new(catalog),
                sittings: Mutex::new(HashMap::new()),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Copy of the current catalog. Puzzles are shared, not duplicated.
    pub async fn catalog(&self) -> PuzzleCatalog {
        self.inner.catalog.read().await.clone()
    }

    /// Reload from the configured source. The old catalog stays in place
    /// if the load fails. Open sittings keep the catalog they started with.
    pub async fn reload_catalog(&self) -> Result<LoadReport, CatalogLoadError> {
        let source = CatalogSource::from(self.inner.config.puzzle_source.as_str());
        let mut fresh = PuzzleCatalog::new();
        let report = fresh
            .load(&source, self.inner.config.catalog_timeout())
            .await?;
        *self.inner.catalog.write().await = fresh;
        Ok(report)
    }

    pub async fn create_sitting(&self) -> Uuid {
        let id = Uuid::new_v4();
        let sitting = Sitting::new(self.catalog().await);

        let mut sittings = self.inner.sittings.lock().await;
        self.expire_idle(&mut sittings);
        sittings.insert(
            id,
            SittingSlot {
                sitting: Arc::new(Mutex::new(sitting)),
                last_seen: Instant::now(),
            },
        );
        tracing::info!(sitting = %id, open = sittings.len(), "Sitting created");
        id
    }

    /// Look up a sitting and mark it as used.
    pub async fn sitting(&self, id: Uuid) -> Result<Arc<Mutex<Sitting>>, AppError> {
        let mut sittings = self.inner.sittings.lock().await;
        self.expire_idle(&mut sittings);
        let slot = sittings
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Sitting {id} not found")))?;
        slot.last_seen = Instant::now();
        Ok(Arc::clone(&slot.sitting))
    }

    pub async fn close_sitting(&self, id: Uuid) -> Result<(), AppError> {
        self.inner
            .sittings
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Sitting {id} not found")))
    }

    pub async fn open_sittings(&self) -> usize {
        self.inner.sittings.lock().await.len()
    }

    fn expire_idle(&self, sittings: &mut HashMap<Uuid, SittingSlot>) {
        let idle = self.inner.config.sitting_idle();
        let before = sittings.len();
        sittings.retain(|_, slot| slot.last_seen.elapsed() < idle);
        let expired = before - sittings.len();
        if expired > 0 {
            tracing::info!(expired, "Dropped idle sittings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(idle_secs: u64) -> AppState {
        let config = Config {
            sitting_idle_secs: idle_secs,
            ..Config::default()
        };
        AppState::new(config, PuzzleCatalog::new())
    }

    #[tokio::test]
    async fn test_idle_sittings_are_dropped() {
        let state = state(0);
        let first = state.create_sitting().await;
        let second = state.create_sitting().await;

        assert_eq!(state.open_sittings().await, 1);
        assert!(matches!(state.sitting(first).await, Err(AppError::NotFound(_))));
        assert!(matches!(state.sitting(second).await, Err(AppError::NotFound(_))));
        assert_eq!(state.open_sittings().await, 0);
    }

    #[tokio::test]
    async fn test_active_sittings_survive() {
        let state = state(3600);
        let first = state.create_sitting().await;
        let second = state.create_sitting().await;

        assert!(state.sitting(first).await.is_ok());
        assert!(state.sitting(second).await.is_ok());
        assert_eq!(state.open_sittings().await, 2);

        state.close_sitting(first).await.unwrap();
        assert_eq!(state.open_sittings().await, 1);
    }
}
