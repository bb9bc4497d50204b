//! Slide Puzzle - an NxN sliding-tile puzzle with levels
//!
//! Core modules:
//! - `sim`: Puzzle state engine (board, shuffling, moves, session state, clock)
//! - `tracker`: Owns the live session, drives the clock and persists progress
//! - `persistence`: Save record, validation and storage backends
//! - `difficulty`: Supported grid sizes
//! - `audio`: Feedback cues and the Web Audio player

pub mod audio;
pub mod difficulty;
pub mod persistence;
pub mod sim;
pub mod tracker;

pub use audio::{FeedbackSink, SoundEffect};
pub use difficulty::Difficulty;
pub use persistence::{LoadError, MemoryStorage, SaveError, SlotStorage, StorageError};
pub use sim::{Board, GamePhase, MoveOutcome, Session};
pub use tracker::{Applied, SaveStatus, SessionTracker};

/// Game configuration constants
pub mod consts {
    /// Grid sizes a session may use (3x3, 4x4, 5x5)
    pub const SUPPORTED_GRID_SIZES: [usize; 3] = [3, 4, 5];

    /// Grid size of the demo board shown before any game starts
    pub const DEMO_GRID_SIZE: usize = 4;

    /// Name of the single persisted save slot
    pub const SAVE_KEY: &str = "swipeSave";

    /// Random-walk steps at level 0; each level adds one
    pub const SHUFFLE_BASE_STEPS: u32 = 3;
    /// Upper bound on random-walk steps regardless of level
    pub const SHUFFLE_MAX_STEPS: u32 = 28;

    /// Elapsed-time counter period (seconds)
    pub const TICK_SECONDS: f64 = 1.0;
}

/// Row and column of a linear board index
#[inline]
pub fn index_to_cell(index: usize, size: usize) -> (usize, usize) {
    (index / size, index % size)
}

/// Linear board index of a row and column
#[inline]
pub fn cell_to_index(row: usize, col: usize, size: usize) -> usize {
    row * size + col
}
