//! Session state
//!
//! Everything that must be persisted for Continue lives on `Session`,
//! except the phase, which is always Idle after a restore.

use super::board::Board;
use crate::consts::DEMO_GRID_SIZE;
use crate::difficulty::Difficulty;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// No game running (start menu, demo board, freshly restored save)
    #[default]
    Idle,
    /// Taking moves, clock running
    Playing,
    /// Board solved, waiting for "next level"
    LevelComplete,
}

/// Stats shown on the level-complete overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub level: u32,
    pub moves: u32,
    pub seconds: u64,
}

/// The single live puzzle session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Completed puzzles + 1
    pub level: u32,
    /// Moves made on the current board
    pub moves: u32,
    /// Seconds spent on the current board
    pub seconds: u64,
    /// Tile arrangement; its size is the session's grid size
    pub board: Board,
    /// Whether feedback cues are played
    pub sounds_enabled: bool,
    /// True iff this session came from a successfully loaded save
    pub has_save: bool,
    /// Not persisted
    pub phase: GamePhase,
}

impl Default for Session {
    fn default() -> Self {
        Self::demo()
    }
}

impl Session {
    /// The solved demo board shown before any game starts
    pub fn demo() -> Self {
        Self::with_board(Board::solved(DEMO_GRID_SIZE))
    }

    /// A level-1 session over `board`, not yet playing
    pub fn with_board(board: Board) -> Self {
        Self {
            level: 1,
            moves: 0,
            seconds: 0,
            board,
            sounds_enabled: true,
            has_save: false,
            phase: GamePhase::Idle,
        }
    }

    /// Side length of the board
    pub fn grid_size(&self) -> usize {
        self.board.size()
    }

    /// Difficulty preset matching the board size
    pub fn difficulty(&self) -> Option<Difficulty> {
        Difficulty::from_grid_size(self.grid_size())
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            level: self.level,
            moves: self.moves,
            seconds: self.seconds,
        }
    }

    /// Whether this session represents play worth offering to continue
    ///
    /// Two independent checks, both kept as-is:
    /// - solved board at level 1 with no moves looks like a never-started game
    /// - no moves and no time at level 1 means nothing happened yet
    pub fn has_real_progress(&self) -> bool {
        if self.board.is_solved() && self.level == 1 && self.moves == 0 {
            return false;
        }
        if self.moves == 0 && self.seconds == 0 && self.level == 1 {
            return false;
        }
        true
    }
}
