//! Chess tactics trainer core.
//!
//! A [`catalog::PuzzleCatalog`] loads and hands out puzzles, a
//! [`engine::SolutionEngine`] checks a solver's moves against one puzzle's
//! stored line, and a [`scoring::SessionScoreboard`] keeps the tally for a
//! sitting.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod hints;
pub mod orientation;
pub mod puzzle;
pub mod scoring;

pub use catalog::{CatalogSource, LoadReport, PuzzleCatalog, PuzzleFilter};
pub use engine::{Phase, SessionSnapshot, SolutionEngine, Submission, Verdict};
pub use error::{CatalogError, CatalogLoadError, EngineError, PuzzleDataError};
pub use hints::{HintProvider, HintReply};
pub use orientation::BoardOrientation;
pub use puzzle::{Difficulty, Puzzle, SolutionStep, Theme};
pub use scoring::{FlatAward, ScorePolicy, SessionScoreboard};
