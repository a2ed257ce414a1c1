//! The solution engine: the state machine that checks a solver's moves
//! against a puzzle's stored line.
//!
//! ```text
//! Idle --load--> AwaitingPlayerMove --last step matched--> Solved
//!                        |
//!                        +--------reveal_solution-------> Revealed
//! ```
//!
//! Scripted opponent replies are played inside the same `submit_move` call
//! that accepted the player's move, so callers never observe a
//! "waiting for the opponent" state. The reply is reported separately in
//! [`Submission::opponent_replied`] so a UI can animate it as its own move.
//!
//! Every mutating operation takes `&mut self`; one engine serves one
//! puzzle session at a time and callers must not share it between event
//! sources without their own synchronization.

use std::sync::Arc;

use chess_core::{ChessRules, PositionStatus, RulesEngine};
use serde::Serialize;
use tracing::debug;

use crate::error::{EngineError, PuzzleDataError};
use crate::hints::{HintProvider, HintReply};
use crate::orientation::BoardOrientation;
use crate::puzzle::{Puzzle, SolutionStep};
use crate::scoring::{FlatAward, ScorePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingPlayerMove,
    Solved,
    Revealed,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Phase::AwaitingPlayerMove)
    }
}

/// Gameplay result of one submitted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Not a legal move in the current position. Nothing changed.
    Illegal,
    /// Legal, but not the expected move. Nothing changed except the
    /// attempt counter; the board should snap back.
    WrongMove,
    /// Expected move; the line continues.
    Correct,
    /// Expected move, and it was the last one.
    Solved { score: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    #[serde(flatten)]
    pub verdict: Verdict,
    /// Candidate as the rules engine names it. `None` for illegal input.
    pub played: Option<String>,
    /// Scripted reply played right after an accepted move.
    pub opponent_replied: Option<String>,
    /// Position after the call. For rejected moves this is the position the
    /// board must snap back to.
    pub fen: String,
    pub status: PositionStatus,
    pub step_index: usize,
    pub attempts: u32,
}

impl Submission {
    pub fn needs_snapback(&self) -> bool {
        matches!(self.verdict, Verdict::WrongMove | Verdict::Illegal)
    }
}

/// State of the puzzle currently loaded into an engine.
#[derive(Debug, Clone)]
pub struct SolutionSession {
    puzzle: Arc<Puzzle>,
    step_index: usize,
    phase: Phase,
    attempts: u32,
    hints_used: u32,
    orientation: BoardOrientation,
}

impl SolutionSession {
    pub fn puzzle(&self) -> &Arc<Puzzle> {
        &self.puzzle
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn orientation(&self) -> BoardOrientation {
        self.orientation
    }

    fn remaining(&self) -> Vec<SolutionStep> {
        self.puzzle.solution[self.step_index..].to_vec()
    }
}

/// Read-only view of a session, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub puzzle_id: String,
    pub step_index: usize,
    pub total_steps: usize,
    pub phase: Phase,
    pub attempts: u32,
    pub hints_used: u32,
    pub hints_total: usize,
    /// Hints shown so far, in order.
    pub hints_revealed: Vec<String>,
    pub fen: String,
    pub orientation: BoardOrientation,
}

pub struct SolutionEngine<R = ChessRules, S = FlatAward> {
    rules: R,
    policy: S,
    hints: HintProvider,
    session: Option<SolutionSession>,
}

impl SolutionEngine {
    pub fn new() -> Self {
        Self::with_parts(ChessRules::new(), FlatAward)
    }
}

impl Default for SolutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RulesEngine, S: ScorePolicy> SolutionEngine<R, S> {
    pub fn with_parts(rules: R, policy: S) -> Self {
        Self {
            rules,
            policy,
            hints: HintProvider::default(),
            session: None,
        }
    }

    /// Start a fresh session on `puzzle`, discarding any current one.
    ///
    /// A malformed puzzle leaves the engine idle.
    pub fn load(&mut self, puzzle: Arc<Puzzle>) -> Result<SessionSnapshot, EngineError> {
        self.session = None;

        puzzle.check_line()?;
        self.rules
            .load_position(&puzzle.starting_position)
            .map_err(|e| PuzzleDataError::InvalidPosition(e.to_string()))?;

        self.hints.reset(puzzle.hints.clone());

        debug!(puzzle = %puzzle.id, steps = puzzle.solution.len(), "puzzle loaded");
        self.session = Some(SolutionSession {
            orientation: BoardOrientation::resolve(self.rules.side_to_move()),
            puzzle,
            step_index: 0,
            phase: Phase::AwaitingPlayerMove,
            attempts: 0,
            hints_used: 0,
        });

        self.snapshot().ok_or(EngineError::NoPuzzleLoaded)
    }

    /// Drop the current session. The engine goes back to idle.
    pub fn reset(&mut self) {
        self.session = None;
        self.hints.reset(Vec::new());
    }

    pub fn submit_move(&mut self, candidate: &str) -> Result<Submission, EngineError> {
        let Self {
            rules,
            policy,
            session,
            ..
        } = self;
        let session = session.as_mut().ok_or(EngineError::NoPuzzleLoaded)?;
        if session.phase.is_terminal() {
            return Err(EngineError::SessionFinished(session.phase));
        }

        let Some(resolved) = rules.resolve(candidate) else {
            debug!(%candidate, "illegal move");
            return Ok(Submission {
                verdict: Verdict::Illegal,
                played: None,
                opponent_replied: None,
                fen: rules.current_position(),
                status: rules.status(),
                step_index: session.step_index,
                attempts: session.attempts,
            });
        };

        let step_no = session.step_index;
        let step = session.puzzle.solution[step_no].clone();

        if resolved.san != step.expected_move {
            session.attempts += 1;
            debug!(played = %resolved.san, expected = %step.expected_move, "wrong move");
            return Ok(Submission {
                verdict: Verdict::WrongMove,
                played: Some(resolved.san),
                opponent_replied: None,
                fen: rules.current_position(),
                status: rules.status(),
                step_index: session.step_index,
                attempts: session.attempts,
            });
        }

        let played = rules.apply_move(&resolved.uci)?;
        session.step_index += 1;

        // Replies were replayed when the puzzle was loaded; a failure here
        // means the puzzle changed under us.
        let opponent_replied = match &step.opponent_reply {
            Some(reply) => {
                let applied = rules
                    .apply_move(reply)
                    .map_err(|_| PuzzleDataError::IllegalLine {
                        step: step_no,
                        mv: reply.clone(),
                    })?;
                debug!(reply = %applied.san, "opponent replied");
                Some(applied.san)
            }
            None => None,
        };

        let verdict = if session.step_index == session.puzzle.solution.len() {
            session.phase = Phase::Solved;
            let score = policy.score(&session.puzzle, session.attempts, session.hints_used);
            debug!(puzzle = %session.puzzle.id, score, "puzzle solved");
            Verdict::Solved { score }
        } else {
            Verdict::Correct
        };

        Ok(Submission {
            verdict,
            played: Some(played.san),
            opponent_replied,
            fen: rules.current_position(),
            status: rules.status(),
            step_index: session.step_index,
            attempts: session.attempts,
        })
    }

    pub fn request_hint(&mut self) -> Result<HintReply, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NoPuzzleLoaded)?;
        let reply = self.hints.next();
        if matches!(reply, HintReply::Hint { .. }) {
            session.hints_used += 1;
        }
        Ok(reply)
    }

    /// Give up on the puzzle and get the steps still to be played.
    ///
    /// Moves an active session to `Revealed`, which forfeits the score.
    /// On a finished session it changes nothing and returns the same steps.
    pub fn reveal_solution(&mut self) -> Result<Vec<SolutionStep>, EngineError> {
        let session = self.session.as_mut().ok_or(EngineError::NoPuzzleLoaded)?;
        if session.phase == Phase::AwaitingPlayerMove {
            session.phase = Phase::Revealed;
            debug!(puzzle = %session.puzzle.id, step = session.step_index, "solution revealed");
        }
        Ok(session.remaining())
    }

    pub fn session(&self) -> Option<&SolutionSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.session.as_ref().map(|s| s.phase)
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let session = self.session.as_ref()?;
        Some(SessionSnapshot {
            puzzle_id: session.puzzle.id.clone(),
            step_index: session.step_index,
            total_steps: session.puzzle.solution.len(),
            phase: session.phase,
            attempts: session.attempts,
            hints_used: session.hints_used,
            hints_total: self.hints.total(),
            hints_revealed: self.hints.revealed().to_vec(),
            fen: self.rules.current_position(),
            orientation: session.orientation,
        })
    }
}
