//! Puzzle data model.
//!
//! Puzzles are immutable once built. The only way to build one from outside
//! data is [`record::RawPuzzle::normalize`], which folds both solution shapes
//! (bare move strings and move objects) into [`SolutionStep`] and validates
//! the line against the starting position.

pub mod record;

use std::fmt;
use std::str::FromStr;

use chess_core::{notation, ChessRules, Color, RulesEngine};
use serde::{Deserialize, Serialize};

use crate::error::PuzzleDataError;

/// Tactical motif a puzzle is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    Fork,
    Pin,
    Skewer,
    MateIn1,
    MateIn2,
    MateIn3,
    Mate,
    BackRankMate,
    SmotheredMate,
    Sacrifice,
    Deflection,
    Decoy,
    DiscoveredAttack,
    DoubleAttack,
    RemovingTheDefender,
    Overloading,
    Intermezzo,
    HangingPiece,
    TrappedPiece,
    Promotion,
    Endgame,
}

impl Theme {
    pub const ALL: [Theme; 21] = [
        Theme::Fork,
        Theme::Pin,
        Theme::Skewer,
        Theme::MateIn1,
        Theme::MateIn2,
        Theme::MateIn3,
        Theme::Mate,
        Theme::BackRankMate,
        Theme::SmotheredMate,
        Theme::Sacrifice,
        Theme::Deflection,
        Theme::Decoy,
        Theme::DiscoveredAttack,
        Theme::DoubleAttack,
        Theme::RemovingTheDefender,
        Theme::Overloading,
        Theme::Intermezzo,
        Theme::HangingPiece,
        Theme::TrappedPiece,
        Theme::Promotion,
        Theme::Endgame,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Fork => "Fork",
            Theme::Pin => "Pin",
            Theme::Skewer => "Skewer",
            Theme::MateIn1 => "Mate in 1",
            Theme::MateIn2 => "Mate in 2",
            Theme::MateIn3 => "Mate in 3",
            Theme::Mate => "Mate",
            Theme::BackRankMate => "Back Rank Mate",
            Theme::SmotheredMate => "Smothered Mate",
            Theme::Sacrifice => "Sacrifice",
            Theme::Deflection => "Deflection",
            Theme::Decoy => "Decoy",
            Theme::DiscoveredAttack => "Discovered Attack",
            Theme::DoubleAttack => "Double Attack",
            Theme::RemovingTheDefender => "Removing the Defender",
            Theme::Overloading => "Overloading",
            Theme::Intermezzo => "Intermezzo",
            Theme::HangingPiece => "Hanging Piece",
            Theme::TrappedPiece => "Trapped Piece",
            Theme::Promotion => "Promotion",
            Theme::Endgame => "Endgame",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase and drop everything but letters and digits, so
/// `"Mate-in-2"`, `"mate in 2"` and `"mateIn2"` all compare equal.
fn fold_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for Theme {
    type Err = PuzzleDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let theme = match fold_key(s).as_str() {
            "fork" => Theme::Fork,
            "pin" => Theme::Pin,
            "skewer" => Theme::Skewer,
            "matein1" | "mateinone" => Theme::MateIn1,
            "matein2" | "mateintwo" => Theme::MateIn2,
            "matein3" | "mateinthree" => Theme::MateIn3,
            "mate" | "checkmate" | "matein4" | "matein5" | "mateinn" => Theme::Mate,
            "backrankmate" | "backrank" => Theme::BackRankMate,
            "smotheredmate" => Theme::SmotheredMate,
            "sacrifice" => Theme::Sacrifice,
            "deflection" => Theme::Deflection,
            "decoy" | "attraction" => Theme::Decoy,
            "discoveredattack" | "discovery" | "discoveredcheck" => Theme::DiscoveredAttack,
            "doubleattack" => Theme::DoubleAttack,
            "removingthedefender" | "removingdefender" | "capturingdefender" => {
                Theme::RemovingTheDefender
            }
            "overloading" | "overload" => Theme::Overloading,
            "intermezzo" | "zwischenzug" => Theme::Intermezzo,
            "hangingpiece" => Theme::HangingPiece,
            "trappedpiece" => Theme::TrappedPiece,
            "promotion" => Theme::Promotion,
            "endgame" => Theme::Endgame,
            _ => return Err(PuzzleDataError::UnknownTheme(s.to_string())),
        };
        Ok(theme)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for Difficulty {
    type Err = PuzzleDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold_key(s).as_str() {
            "beginner" | "easy" | "novice" => Ok(Difficulty::Beginner),
            "intermediate" | "medium" => Ok(Difficulty::Intermediate),
            "advanced" | "hard" | "expert" => Ok(Difficulty::Advanced),
            _ => Err(PuzzleDataError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// One player move the solver must find, plus the scripted answer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionStep {
    pub expected_move: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl SolutionStep {
    pub fn new(expected_move: impl Into<String>) -> Self {
        Self {
            expected_move: expected_move.into(),
            opponent_reply: None,
            explanation: None,
        }
    }

    pub fn with_reply(expected_move: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            opponent_reply: Some(reply.into()),
            ..Self::new(expected_move)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: String,
    pub theme: Theme,
    pub difficulty: Difficulty,
    pub rating: u32,
    pub points: u32,
    pub starting_position: String,
    pub solution: Vec<SolutionStep>,
    pub hints: Vec<String>,
    pub title: String,
    pub description: String,
}

/// Outcome of replaying a puzzle's line from its starting position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCheck {
    /// Side the solver plays.
    pub solver: Color,
    /// Steps whose stored notation differs from the canonical SAN of the
    /// move, as `(step, stored, canonical)`. Such a step can never be
    /// matched by an exact comparison.
    pub non_canonical: Vec<(usize, String, String)>,
}

impl Puzzle {
    /// Structural checks that need no board: a non-empty solution where
    /// every step but the last carries an opponent reply.
    pub fn check_shape(&self) -> Result<(), PuzzleDataError> {
        if self.solution.is_empty() {
            return Err(PuzzleDataError::EmptySolution);
        }
        let last = self.solution.len() - 1;
        for (step, s) in self.solution.iter().enumerate() {
            if s.expected_move.trim().is_empty() {
                return Err(PuzzleDataError::IllegalLine {
                    step,
                    mv: s.expected_move.clone(),
                });
            }
            if step < last && s.opponent_reply.is_none() {
                return Err(PuzzleDataError::MissingReply { step });
            }
        }
        Ok(())
    }

    /// Full integrity check: shape, starting position, and every move of
    /// the line (player moves and replies) legal in sequence. Expected moves
    /// must be SAN; replies may be SAN or coordinates.
    pub fn check_line(&self) -> Result<LineCheck, PuzzleDataError> {
        self.check_shape()?;

        let mut rules = ChessRules::from_fen(&self.starting_position)
            .map_err(|e| PuzzleDataError::InvalidPosition(e.to_string()))?;
        let solver = rules.side_to_move();
        let mut non_canonical = Vec::new();

        for (step, s) in self.solution.iter().enumerate() {
            if notation::looks_like_uci(&s.expected_move) {
                return Err(PuzzleDataError::CoordinateNotation {
                    step,
                    mv: s.expected_move.clone(),
                });
            }
            let played = rules
                .apply_move(&s.expected_move)
                .map_err(|_| PuzzleDataError::IllegalLine {
                    step,
                    mv: s.expected_move.clone(),
                })?;
            if played.san != s.expected_move {
                non_canonical.push((step, s.expected_move.clone(), played.san));
            }

            if let Some(reply) = &s.opponent_reply {
                rules
                    .apply_move(reply)
                    .map_err(|_| PuzzleDataError::IllegalLine {
                        step,
                        mv: reply.clone(),
                    })?;
            }
        }

        Ok(LineCheck {
            solver,
            non_canonical,
        })
    }

    /// Number of moves the solver has to find.
    pub fn solver_moves(&self) -> usize {
        self.solution.len()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_theme_parsing_is_forgiving() {
        assert_eq!("mate-in-2".parse::<Theme>().unwrap(), Theme::MateIn2);
        assert_eq!("Mate in 1".parse::<Theme>().unwrap(), Theme::MateIn1);
        assert_eq!("discoveredAttack".parse::<Theme>().unwrap(), Theme::DiscoveredAttack);
        assert_eq!("Attraction".parse::<Theme>().unwrap(), Theme::Decoy);
        assert!(matches!(
            "opening".parse::<Theme>(),
            Err(PuzzleDataError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_difficulty_aliases() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!("Intermediate".parse::<Difficulty>().unwrap(), Difficulty::Intermediate);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Advanced);
        assert!("legendary".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_theme_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&Theme::MateIn2).unwrap(), "\"mateIn2\"");
        assert_eq!(Theme::BackRankMate.to_string(), "Back Rank Mate");
    }

    #[test]
    fn test_check_line_accepts_valid_puzzle() {
        let check = back_rank().check_line().unwrap();
        assert_eq!(check.solver, Color::White);
        assert!(check.non_canonical.is_empty());
    }

    #[test]
    fn test_check_shape_rejects_empty_solution() {
        let p = puzzle("empty", BACK_RANK_FEN, vec![]);
        assert_eq!(p.check_shape(), Err(PuzzleDataError::EmptySolution));
    }

    #[test]
    fn test_check_shape_requires_reply_on_non_final_steps() {
        let p = puzzle(
            "stalls",
            BACK_RANK_FEN,
            vec![SolutionStep::new("Re8+"), SolutionStep::new("Rh8#")],
        );
        assert_eq!(p.check_shape(), Err(PuzzleDataError::MissingReply { step: 0 }));
    }

    #[test]
    fn test_check_line_rejects_bad_position() {
        let p = puzzle("bad-fen", "8/8/8 w - - 0 1", vec![SolutionStep::new("e4")]);
        assert!(matches!(p.check_line(), Err(PuzzleDataError::InvalidPosition(_))));
    }

    #[test]
    fn test_check_line_rejects_illegal_reply() {
        let p = puzzle(
            "bad-reply",
            BACK_RANK_FEN,
            vec![
                SolutionStep::with_reply("Re8+", "Kg7"),
                SolutionStep::new("Rh8#"),
            ],
        );
        assert_eq!(
            p.check_line(),
            Err(PuzzleDataError::IllegalLine {
                step: 0,
                mv: "Kg7".into()
            })
        );
    }

    #[test]
    fn test_check_line_flags_missing_suffix() {
        let p = puzzle(
            "no-suffix",
            BACK_RANK_FEN,
            vec![SolutionStep::with_reply("Re8", "Kh7"), SolutionStep::new("Rh8#")],
        );
        let check = p.check_line().unwrap();
        assert_eq!(
            check.non_canonical,
            vec![(0, "Re8".to_string(), "Re8+".to_string())]
        );
    }

    #[test]
    fn test_check_line_reports_solver_side() {
        assert_eq!(back_rank().check_line().unwrap().solver, Color::White);
        let black = puzzle(
            "black",
            "6k1/8/8/8/8/8/5PPP/6K1 b - - 0 1",
            vec![SolutionStep::new("Kf7")],
        );
        assert_eq!(black.check_line().unwrap().solver, Color::Black);
    }

    #[test]
    fn test_check_line_rejects_coordinate_notation() {
        let p = puzzle("uci", ITALIAN_FEN, vec![SolutionStep::new("f3e5")]);
        assert_eq!(
            p.check_line(),
            Err(PuzzleDataError::CoordinateNotation {
                step: 0,
                mv: "f3e5".into()
            })
        );
    }
}
