//! The rules-engine seam.
//!
//! The solution engine never inspects a board itself; it asks a
//! [`RulesEngine`] whether a move is legal, what it is called once played,
//! and to apply it. [`ChessRules`] is the shakmaty-backed implementation.

use serde::Serialize;
use shakmaty::{Chess, Color, Move, Position};

use crate::error::RulesError;
use crate::notation;

/// Board condition after the last applied move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PositionStatus {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub draw: bool,
}

/// A legal candidate, named the way it would be written once played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMove {
    pub san: String,
    pub uci: String,
}

/// Record of a move that was actually applied to the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMove {
    pub san: String,
    pub uci: String,
    pub fen_after: String,
}

pub trait RulesEngine {
    /// Replace the current position.
    fn load_position(&mut self, fen: &str) -> Result<(), RulesError>;

    /// Legality check. `None` means the candidate is not a legal move here.
    fn resolve(&self, candidate: &str) -> Option<ResolvedMove>;

    /// Play a move (SAN or UCI) from the current position.
    fn apply_move(&mut self, mv: &str) -> Result<AppliedMove, RulesError>;

    /// Current position as FEN.
    fn current_position(&self) -> String;

    fn side_to_move(&self) -> Color;

    fn status(&self) -> PositionStatus;
}

#[derive(Debug, Clone, Default)]
pub struct ChessRules {
    pos: Chess,
}

impl ChessRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        Ok(Self {
            pos: notation::parse_position(fen)?,
        })
    }

    fn find(&self, text: &str) -> Option<Move> {
        notation::parse_move(&self.pos, text).filter(|mv| self.pos.is_legal(mv.clone()))
    }
}

impl RulesEngine for ChessRules {
    fn load_position(&mut self, fen: &str) -> Result<(), RulesError> {
        self.pos = notation::parse_position(fen)?;
        Ok(())
    }

    fn resolve(&self, candidate: &str) -> Option<ResolvedMove> {
        let mv = self.find(candidate)?;
        Some(ResolvedMove {
            san: notation::san_as_played(&self.pos, &mv),
            uci: notation::uci_of(&mv),
        })
    }

    fn apply_move(&mut self, mv: &str) -> Result<AppliedMove, RulesError> {
        let legal = self.find(mv).ok_or_else(|| RulesError::IllegalMove {
            mv: mv.to_string(),
            fen: self.current_position(),
        })?;

        let san = notation::san_as_played(&self.pos, &legal);
        let uci = notation::uci_of(&legal);
        self.pos.play_unchecked(legal);
        tracing::trace!(%san, %uci, "applied move");

        Ok(AppliedMove {
            san,
            uci,
            fen_after: self.current_position(),
        })
    }

    fn current_position(&self) -> String {
        notation::to_fen(&self.pos)
    }

    fn side_to_move(&self) -> Color {
        self.pos.turn()
    }

    fn status(&self) -> PositionStatus {
        let stalemate = self.pos.is_stalemate();
        PositionStatus {
            check: self.pos.is_check(),
            checkmate: self.pos.is_checkmate(),
            stalemate,
            draw: stalemate || self.pos.is_insufficient_material() || self.pos.halfmoves() >= 100,
        }
    }
}
