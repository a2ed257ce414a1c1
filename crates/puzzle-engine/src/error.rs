//! Error types for the puzzle engine.
//!
//! Gameplay outcomes (illegal or wrong moves) are *not* errors; they are
//! [`crate::engine::Verdict`] values. Everything here is either a data
//! integrity fault or a caller breaking the engine's contract.

use thiserror::Error;

use crate::engine::Phase;

/// A puzzle record that must not reach the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleDataError {
    #[error("solution is empty")]
    EmptySolution,

    #[error("step {step} has no opponent reply but is not the final step")]
    MissingReply { step: usize },

    #[error("invalid starting position: {0}")]
    InvalidPosition(String),

    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    #[error("move '{mv}' in step {step} is not legal")]
    IllegalLine { step: usize, mv: String },

    #[error("expected move '{mv}' in step {step} is in coordinate notation, not SAN")]
    CoordinateNotation { step: usize, mv: String },

    #[error("duplicate puzzle id '{0}'")]
    DuplicateId(String),
}

/// The catalog source could not be read at all. Retryable.
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Catalog source returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed catalog: {0}")]
    Malformed(String),
}

/// Nothing to hand out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog is empty")]
    EmptyCatalog,

    #[error("no puzzles match the filter")]
    NoPuzzlesAvailable,

    #[error("puzzle '{0}' not found")]
    NotFound(String),
}

/// Misuse of the solution engine or a puzzle it refused to load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("no puzzle loaded")]
    NoPuzzleLoaded,

    #[error("puzzle session already finished ({0:?})")]
    SessionFinished(Phase),

    #[error("puzzle rejected: {0}")]
    PuzzleData(#[from] PuzzleDataError),

    #[error("rules engine failed: {0}")]
    Rules(#[from] chess_core::RulesError),
}
