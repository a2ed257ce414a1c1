//! Board orientation: which colour is drawn at the bottom for a puzzle.

use chess_core::Color;
use serde::Serialize;

/// Which side of the board is drawn at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardOrientation {
    WhiteBottom,
    BlackBottom,
}

impl BoardOrientation {
    /// The solver is always the side to move, and sits at the bottom.
    pub fn resolve(side_to_move: Color) -> Self {
        match side_to_move {
            Color::White => BoardOrientation::WhiteBottom,
            Color::Black => BoardOrientation::BlackBottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        assert_eq!(BoardOrientation::resolve(Color::White), BoardOrientation::WhiteBottom);
        assert_eq!(BoardOrientation::resolve(Color::Black), BoardOrientation::BlackBottom);
    }
}
