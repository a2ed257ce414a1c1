//! Chess rules primitives shared by the puzzle engine and the server.
//!
//! Everything that needs to know how chess works goes through the
//! [`rules::RulesEngine`] trait; the rest of the workspace only ever sees
//! notation strings and FEN.

pub mod error;
pub mod notation;
pub mod rules;

pub use error::RulesError;
pub use rules::{AppliedMove, ChessRules, PositionStatus, ResolvedMove, RulesEngine};
pub use shakmaty::Color;
