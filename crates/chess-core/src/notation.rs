//! Notation helpers: FEN in and out, and move text in either SAN or UCI.
//!
//! A board widget reports drags as from/to squares (`g1f3`), puzzle data is
//! written in SAN (`Nf3`). Both resolve to the same shakmaty `Move`, and the
//! canonical SAN of that move (with its `+`/`#` suffix) is what gets compared
//! against stored solutions.

use std::sync::LazyLock;

use regex::Regex;
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move};

use crate::error::RulesError;

static UCI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-h][1-8][a-h][1-8][qrbnQRBN]?$").expect("valid UCI regex"));

/// Parse a FEN string into a legal standard-chess position.
pub fn parse_position(fen: &str) -> Result<Chess, RulesError> {
    let trimmed = fen.trim();
    let parsed: Fen = trimmed.parse().map_err(|e: shakmaty::fen::ParseFenError| {
        RulesError::InvalidFen {
            fen: trimmed.to_string(),
            reason: e.to_string(),
        }
    })?;

    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| RulesError::IllegalPosition {
            fen: trimmed.to_string(),
            reason: e.to_string(),
        })
}

/// Render a position back to FEN.
pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

/// True for coordinate notation such as `e2e4` or `e7e8q`.
pub fn looks_like_uci(text: &str) -> bool {
    UCI_RE.is_match(text)
}

/// Resolve move text against a position. Returns `None` when the text does
/// not parse or names a move that is not legal here.
pub fn parse_move(pos: &Chess, text: &str) -> Option<Move> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if looks_like_uci(text) {
        let uci: UciMove = text.to_ascii_lowercase().parse().ok()?;
        if let Ok(mv) = uci.to_move(pos) {
            return Some(mv);
        }
    }

    let san: SanPlus = text.parse().ok()?;
    san.san.to_move(pos).ok()
}

/// Canonical SAN of `mv` played from `pos`, including the check or mate suffix.
pub fn san_as_played(pos: &Chess, mv: &Move) -> String {
    let mut scratch = pos.clone();
    SanPlus::from_move_and_play_unchecked(&mut scratch, mv.clone()).to_string()
}

/// Coordinate notation for `mv`, e.g. `e1g1` for short castling.
pub fn uci_of(mv: &Move) -> String {
    mv.to_uci(CastlingMode::Standard).to_string()
}
