//! Puzzle state engine
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Randomness only through a caller-supplied RNG
//! - Time only through explicit clock advances
//! - No rendering, storage or platform dependencies

pub mod board;
pub mod clock;
pub mod engine;
pub mod shuffle;
pub mod state;

pub use board::{Board, BoardError, Tile};
pub use clock::ElapsedClock;
pub use engine::{
    MoveOutcome, advance_level, attempt_move, play_move, reshuffle, resume, start_session,
};
pub use shuffle::{generate, shuffle_steps};
pub use state::{GamePhase, LevelSummary, Session};
