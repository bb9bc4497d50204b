//! Solvable board generation
//!
//! Boards are scrambled by walking the blank randomly from the solved
//! position, so every generated board is reachable by legal moves.

use rand::Rng;

use super::board::{Board, adjacent_indices};
use crate::consts::{SHUFFLE_BASE_STEPS, SHUFFLE_MAX_STEPS};

/// Number of random-walk steps used for a level
pub fn shuffle_steps(level: u32) -> u32 {
    SHUFFLE_BASE_STEPS
        .saturating_add(level)
        .min(SHUFFLE_MAX_STEPS)
}

/// Generate a scrambled board for `level`
///
/// Short walks at low levels may backtrack and land close to (or on) the
/// solved arrangement. That is expected: difficulty grows with the level.
pub fn generate<R: Rng + ?Sized>(size: usize, level: u32, rng: &mut R) -> Board {
    let mut board = Board::solved(size);
    let mut blank = board.blank_index();

    for _ in 0..shuffle_steps(level) {
        let neighbors = adjacent_indices(blank, size);
        let pick = neighbors[rng.random_range(0..neighbors.len())];
        board.swap_with_blank(pick);
        blank = pick;
    }

    board
}
