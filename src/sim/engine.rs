//! Move engine
//!
//! Validates and applies tile moves and drives the session through
//! Idle -> Playing -> LevelComplete -> Playing.

use rand::Rng;

use super::board::Board;
use super::shuffle::generate;
use super::state::{GamePhase, Session};
use crate::difficulty::Difficulty;

/// Result of a tap on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Tile slid into the blank
    Moved,
    /// Tile slid and the board is now solved
    Solved,
    /// Tile isn't next to the blank; nothing changed
    Rejected,
    /// Not playing; tap ignored
    Inactive,
}

impl MoveOutcome {
    /// Whether the board changed
    pub fn is_move(self) -> bool {
        matches!(self, MoveOutcome::Moved | MoveOutcome::Solved)
    }
}

/// Slide the tile at `index` into the blank if it is adjacent
///
/// Returns false, leaving the board untouched, for any other index.
pub fn attempt_move(board: &mut Board, index: usize) -> bool {
    if !board.is_movable(index) {
        return false;
    }
    board.swap_with_blank(index);
    true
}

/// A fresh level-1 session at `difficulty`, already playing
pub fn start_session<R: Rng + ?Sized>(
    difficulty: Difficulty,
    sounds_enabled: bool,
    rng: &mut R,
) -> Session {
    let board = generate(difficulty.grid_size(), 1, rng);
    Session {
        sounds_enabled,
        phase: GamePhase::Playing,
        ..Session::with_board(board)
    }
}

/// Apply a tap to a playing session
pub fn play_move(session: &mut Session, index: usize) -> MoveOutcome {
    if session.phase != GamePhase::Playing {
        return MoveOutcome::Inactive;
    }
    if !attempt_move(&mut session.board, index) {
        return MoveOutcome::Rejected;
    }

    session.moves = session.moves.saturating_add(1);

    if session.board.is_solved() {
        session.phase = GamePhase::LevelComplete;
        MoveOutcome::Solved
    } else {
        MoveOutcome::Moved
    }
}

/// LevelComplete -> Playing on a new, more scrambled board of the same size
pub fn advance_level<R: Rng + ?Sized>(session: &mut Session, rng: &mut R) -> bool {
    if session.phase != GamePhase::LevelComplete {
        return false;
    }

    session.level = session.level.saturating_add(1);
    session.moves = 0;
    session.seconds = 0;
    session.board = generate(session.grid_size(), session.level, rng);
    session.phase = GamePhase::Playing;
    true
}

/// Replace the board mid-level and reset the counters
pub fn reshuffle<R: Rng + ?Sized>(session: &mut Session, rng: &mut R) -> bool {
    if session.phase != GamePhase::Playing {
        return false;
    }

    session.board = generate(session.grid_size(), session.level, rng);
    session.moves = 0;
    session.seconds = 0;
    true
}

/// Idle -> Playing for a restored session
///
/// A restored board that is already solved resumes at the level-complete
/// overlay so the player can move on.
pub fn resume(session: &mut Session) -> bool {
    if session.phase != GamePhase::Idle {
        return false;
    }

    session.phase = if session.board.is_solved() {
        GamePhase::LevelComplete
    } else {
        GamePhase::Playing
    };
    true
}
