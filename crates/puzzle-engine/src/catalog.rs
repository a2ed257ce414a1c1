//! The puzzle catalog: loads a collection of puzzle records, rejects the
//! broken ones, and hands out puzzles by id, at random, or in order.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::error::{CatalogError, CatalogLoadError, PuzzleDataError};
use crate::puzzle::record::RawPuzzle;
use crate::puzzle::{Difficulty, Puzzle, Theme};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(String),
}

impl From<&str> for CatalogSource {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            CatalogSource::Url(s.to_string())
        } else {
            CatalogSource::File(PathBuf::from(s))
        }
    }
}

impl FromStr for CatalogSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CatalogSource::from(s))
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedPuzzle {
    /// Position of the record in the source document.
    pub index: usize,
    pub id: String,
    pub reason: String,
    #[serde(skip)]
    pub error: PuzzleDataError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<RejectedPuzzle>,
}

/// Selection predicates. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleFilter {
    pub theme: Option<Theme>,
    pub difficulty: Option<Difficulty>,
    pub min_rating: Option<u32>,
    pub max_rating: Option<u32>,
}

impl PuzzleFilter {
    pub fn matches(&self, puzzle: &Puzzle) -> bool {
        self.theme.map_or(true, |t| puzzle.theme == t)
            && self.difficulty.map_or(true, |d| puzzle.difficulty == d)
            && self.min_rating.map_or(true, |r| puzzle.rating >= r)
            && self.max_rating.map_or(true, |r| puzzle.rating <= r)
    }
}

#[derive(Debug, Clone)]
pub struct PuzzleCatalog {
    puzzles: Vec<Arc<Puzzle>>,
    cursor: Option<usize>,
    rng: StdRng,
}

impl Default for PuzzleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleCatalog {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic random selection, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            puzzles: Vec::new(),
            cursor: None,
            rng,
        }
    }

    /// Read `source` and replace the catalog contents with its valid puzzles.
    ///
    /// On error the current contents are left untouched.
    pub async fn load(
        &mut self,
        source: &CatalogSource,
        timeout: Duration,
    ) -> Result<LoadReport, CatalogLoadError> {
        info!(%source, "Loading puzzle catalog");
        let text = fetch(source, timeout).await?;
        let report = self.load_str(&text)?;
        info!(
            %source,
            loaded = report.loaded,
            rejected = report.rejected.len(),
            "Puzzle catalog loaded"
        );
        Ok(report)
    }

    /// Parse a catalog document: a JSON array of records or `{"puzzles": [...]}`.
    pub fn load_str(&mut self, text: &str) -> Result<LoadReport, CatalogLoadError> {
        let doc: JsonValue =
            serde_json::from_str(text).map_err(|e| CatalogLoadError::Malformed(e.to_string()))?;

        let records = match doc {
            JsonValue::Array(items) => items,
            JsonValue::Object(mut map) => match map.remove("puzzles") {
                Some(JsonValue::Array(items)) => items,
                _ => {
                    return Err(CatalogLoadError::Malformed(
                        "expected an array of puzzles or an object with a \"puzzles\" array"
                            .into(),
                    ))
                }
            },
            _ => {
                return Err(CatalogLoadError::Malformed(
                    "expected an array of puzzles".into(),
                ))
            }
        };

        let mut raws = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let raw: RawPuzzle = serde_json::from_value(record)
                .map_err(|e| CatalogLoadError::Malformed(format!("puzzle #{index}: {e}")))?;
            raws.push(raw);
        }

        let mut puzzles = Vec::with_capacity(raws.len());
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();

        for (index, raw) in raws.into_iter().enumerate() {
            let id = raw.id.clone().into_string();
            let result = if seen.contains(&id) {
                Err(PuzzleDataError::DuplicateId(id.clone()))
            } else {
                raw.normalize()
            };

            match result {
                Ok(puzzle) => {
                    seen.insert(id);
                    puzzles.push(Arc::new(puzzle));
                }
                Err(error) => {
                    warn!(index, puzzle = %id, %error, "Skipping puzzle");
                    rejected.push(RejectedPuzzle {
                        index,
                        id,
                        reason: error.to_string(),
                        error,
                    });
                }
            }
        }

        self.puzzles = puzzles;
        self.cursor = None;

        Ok(LoadReport {
            loaded: self.puzzles.len(),
            rejected,
        })
    }

    /// Add one already-built puzzle after validating it.
    pub fn insert(&mut self, puzzle: Puzzle) -> Result<Arc<Puzzle>, PuzzleDataError> {
        if self.puzzles.iter().any(|p| p.id == puzzle.id) {
            return Err(PuzzleDataError::DuplicateId(puzzle.id));
        }
        puzzle.check_line()?;
        let puzzle = Arc::new(puzzle);
        self.puzzles.push(Arc::clone(&puzzle));
        Ok(puzzle)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    pub fn puzzles(&self) -> &[Arc<Puzzle>] {
        &self.puzzles
    }

    pub fn get(&self, id: &str) -> Result<Arc<Puzzle>, CatalogError> {
        self.puzzles
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Puzzle the cursor currently points at.
    pub fn current(&self) -> Option<Arc<Puzzle>> {
        self.cursor.and_then(|i| self.puzzles.get(i)).cloned()
    }

    pub fn random_puzzle(&mut self) -> Result<Arc<Puzzle>, CatalogError> {
        if self.puzzles.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let index = self.rng.gen_range(0..self.puzzles.len());
        Ok(self.select(index))
    }

    /// Advance the cursor, wrapping past the end.
    pub fn next_puzzle(&mut self) -> Result<Arc<Puzzle>, CatalogError> {
        let len = self.puzzles.len();
        if len == 0 {
            return Err(CatalogError::EmptyCatalog);
        }
        let index = self.cursor.map_or(0, |c| (c + 1) % len);
        Ok(self.select(index))
    }

    /// Step the cursor back, wrapping before the start.
    pub fn previous_puzzle(&mut self) -> Result<Arc<Puzzle>, CatalogError> {
        let len = self.puzzles.len();
        if len == 0 {
            return Err(CatalogError::EmptyCatalog);
        }
        let index = self.cursor.map_or(len - 1, |c| (c + len - 1) % len);
        Ok(self.select(index))
    }

    pub fn filter(&self, criteria: &PuzzleFilter) -> Vec<Arc<Puzzle>> {
        self.puzzles
            .iter()
            .filter(|p| criteria.matches(p))
            .cloned()
            .collect()
    }

    /// Random puzzle among those matching `criteria`.
    pub fn random_matching(&mut self, criteria: &PuzzleFilter) -> Result<Arc<Puzzle>, CatalogError> {
        if self.puzzles.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        let candidates: Vec<usize> = self
            .puzzles
            .iter()
            .enumerate()
            .filter(|(_, p)| criteria.matches(p))
            .map(|(i, _)| i)
            .collect();

        let index = *candidates
            .choose(&mut self.rng)
            .ok_or(CatalogError::NoPuzzlesAvailable)?;
        Ok(self.select(index))
    }

    /// Distinct themes present, in enum order.
    pub fn themes(&self) -> Vec<Theme> {
        self.puzzles
            .iter()
            .map(|p| p.theme)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn select(&mut self, index: usize) -> Arc<Puzzle> {
        self.cursor = Some(index);
        Arc::clone(&self.puzzles[index])
    }
}

async fn fetch(source: &CatalogSource, timeout: Duration) -> Result<String, CatalogLoadError> {
    match source {
        CatalogSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogLoadError::Io {
                    path: path.display().to_string(),
                    source,
                })
        }
        CatalogSource::Url(url) => {
            let http_err = |source: reqwest::Error| CatalogLoadError::Http {
                url: url.clone(),
                source,
            };

            let client = reqwest::Client::builder()
                .user_agent("ChessPuzzles/1.0")
                .timeout(timeout)
                .build()
                .map_err(http_err)?;

            let resp = client.get(url).send().await.map_err(http_err)?;
            if !resp.status().is_success() {
                return Err(CatalogLoadError::Status {
                    url: url.clone(),
                    status: resp.status().as_u16(),
                });
            }
            resp.text().await.map_err(http_err)
        }
    }
}
