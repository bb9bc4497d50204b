//! Difficulty presets
//!
//! Each preset is one of the supported grid sizes.

use crate::consts::SUPPORTED_GRID_SIZES;

/// Grid size chosen on the start menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    /// 3x3
    Easy,
    /// 4x4, the classic 15-puzzle
    #[default]
    Medium,
    /// 5x5
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parse a preset name or a selector value ("3", "4", "5")
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "3" | "3x3" => Some(Difficulty::Easy),
            "medium" | "med" | "4" | "4x4" => Some(Difficulty::Medium),
            "hard" | "5" | "5x5" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Side length of the board
    pub fn grid_size(&self) -> usize {
        match self {
            Difficulty::Easy => SUPPORTED_GRID_SIZES[0],
            Difficulty::Medium => SUPPORTED_GRID_SIZES[1],
            Difficulty::Hard => SUPPORTED_GRID_SIZES[2],
        }
    }

    pub fn from_grid_size(size: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.grid_size() == size)
    }
}
