//! Puzzle records as they appear in a catalog document, and their
//! normalization into [`Puzzle`].

use serde::Deserialize;

use super::{Difficulty, Puzzle, SolutionStep, Theme};
use crate::error::PuzzleDataError;

/// A solution entry in either of the two shapes found in real data.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawStep {
    /// Legacy shape: just the move.
    Bare(String),
    Full {
        #[serde(alias = "expectedMove", alias = "expected_move")]
        #[serde(rename = "move")]
        mv: String,
        #[serde(
            default,
            alias = "opponentResponse",
            alias = "opponent_response",
            alias = "opponentReply"
        )]
        opponent_reply: Option<String>,
        #[serde(default)]
        explanation: Option<String>,
    },
}

impl From<RawStep> for SolutionStep {
    fn from(raw: RawStep) -> Self {
        match raw {
            RawStep::Bare(mv) => SolutionStep::new(mv.trim()),
            RawStep::Full {
                mv,
                opponent_reply,
                explanation,
            } => SolutionStep {
                expected_move: mv.trim().to_string(),
                opponent_reply: opponent_reply
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty()),
                explanation,
            },
        }
    }
}

/// Ids appear as strings or numbers depending on the exporter.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPuzzle {
    pub id: RawId,
    pub theme: String,
    pub difficulty: String,
    pub rating: u32,
    pub points: u32,
    #[serde(alias = "starting_position", alias = "fen")]
    pub starting_position: String,
    /// Missing is treated like empty and rejected by validation.
    #[serde(default)]
    pub solution: Vec<RawStep>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl RawPuzzle {
    /// Fold the record into a [`Puzzle`] without touching the board.
    /// Use [`RawPuzzle::normalize`] to also validate the line.
    pub fn into_puzzle(self) -> Result<Puzzle, PuzzleDataError> {
        let theme: Theme = self.theme.parse()?;
        let difficulty: Difficulty = self.difficulty.parse()?;

        let mut hints: Vec<String> = self
            .hints
            .into_iter()
            .chain(self.hint)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .collect();
        hints.dedup();

        Ok(Puzzle {
            id: self.id.into_string(),
            theme,
            difficulty,
            rating: self.rating,
            points: self.points,
            starting_position: self.starting_position.trim().to_string(),
            solution: self.solution.into_iter().map(SolutionStep::from).collect(),
            hints,
            title: self.title,
            description: self.description,
        })
    }

    pub fn normalize(self) -> Result<Puzzle, PuzzleDataError> {
        let puzzle = self.into_puzzle()?;
        let check = puzzle.check_line()?;
        for (step, stored, canonical) in &check.non_canonical {
            tracing::warn!(
                puzzle = %puzzle.id,
                step,
                %stored,
                %canonical,
                "Stored move differs from its canonical notation and cannot be matched"
            );
        }
        Ok(puzzle)
    }
}
