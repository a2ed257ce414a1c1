use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Illegal position '{fen}': {reason}")]
    IllegalPosition { fen: String, reason: String },

    #[error("Move '{mv}' is not legal in {fen}")]
    IllegalMove { mv: String, fen: String },
}
