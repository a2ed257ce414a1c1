//! Scoring: how much a solve is worth, and the running tally for a sitting.

use serde::Serialize;

use crate::engine::Verdict;
use crate::puzzle::Puzzle;

/// Decides the award for a solved puzzle.
pub trait ScorePolicy {
    fn score(&self, puzzle: &Puzzle, attempts: u32, hints_used: u32) -> u32;
}

/// Full `puzzle.points`, regardless of wrong attempts or hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatAward;

impl ScorePolicy for FlatAward {
    fn score(&self, puzzle: &Puzzle, _attempts: u32, _hints_used: u32) -> u32 {
        puzzle.points
    }
}

/// Totals across the puzzles attempted in one sitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionScoreboard {
    pub total_score: u64,
    pub solved_count: u32,
    pub attempted_count: u32,
    pub revealed_count: u32,
}

impl SessionScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a solve. Any other verdict leaves the board unchanged.
    pub fn record(&mut self, verdict: &Verdict) {
        if let Verdict::Solved { score } = verdict {
            self.total_score += u64::from(*score);
            self.solved_count += 1;
        }
    }

    /// A puzzle was started in this sitting.
    pub fn record_attempt(&mut self) {
        self.attempted_count += 1;
    }

    /// A puzzle was given up on.
    pub fn record_reveal(&mut self) {
        self.revealed_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::fixtures;

    #[test]
    fn test_flat_award_ignores_attempts_and_hints() {
        let puzzle = fixtures::back_rank();
        assert_eq!(FlatAward.score(&puzzle, 0, 0), 30);
        assert_eq!(FlatAward.score(&puzzle, 4, 2), 30);
    }

    #[test]
    fn test_scoreboard_accumulates_solves_only() {
        let mut board = SessionScoreboard::new();
        board.record(&Verdict::Solved { score: 30 });
        board.record(&Verdict::WrongMove);
        board.record(&Verdict::Illegal);
        board.record(&Verdict::Correct);
        board.record(&Verdict::Solved { score: 10 });

        assert_eq!(board.total_score, 40);
        assert_eq!(board.solved_count, 2);
    }

    #[test]
    fn test_scoreboard_counts_attempts_and_reveals() {
        let mut board = SessionScoreboard::new();
        board.record_attempt();
        board.record_attempt();
        board.record_reveal();
        assert_eq!(board.attempted_count, 2);
        assert_eq!(board.revealed_count, 1);
        assert_eq!(board.total_score, 0);
    }
}
