//! Board model
//!
//! A board is the N² tiles in row-major order. Tile `0` is the blank.
//! Every constructor upholds the invariant that the tiles are exactly a
//! permutation of `0..N²`.

use crate::consts::SUPPORTED_GRID_SIZES;
use crate::{cell_to_index, index_to_cell};

/// Tile value (0 = blank)
pub type Tile = u16;

/// The blank tile
pub const BLANK: Tile = 0;

/// Why a tile sequence can't be a board
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("unsupported grid size {0}")]
    UnsupportedSize(usize),
    #[error("board has {found} tiles, expected {expected}")]
    WrongLength { expected: usize, found: usize },
    #[error("tiles are not a permutation of 0..{0}")]
    NotPermutation(usize),
}

/// NxN tile arrangement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// The goal arrangement `[1, 2, ..., n²-1, 0]`
    pub fn solved(size: usize) -> Self {
        let count = size * size;
        let mut tiles: Vec<Tile> = (1..count).map(|t| t as Tile).collect();
        tiles.push(BLANK);
        Self { size, tiles }
    }

    /// Build a board from untrusted tiles, checking size, length and permutation
    pub fn from_tiles(size: usize, tiles: Vec<Tile>) -> Result<Self, BoardError> {
        if !SUPPORTED_GRID_SIZES.contains(&size) {
            return Err(BoardError::UnsupportedSize(size));
        }
        let expected = size * size;
        if tiles.len() != expected {
            return Err(BoardError::WrongLength {
                expected,
                found: tiles.len(),
            });
        }

        let mut seen = vec![false; expected];
        for &tile in &tiles {
            let slot = seen
                .get_mut(tile as usize)
                .ok_or(BoardError::NotPermutation(expected))?;
            if *slot {
                return Err(BoardError::NotPermutation(expected));
            }
            *slot = true;
        }

        Ok(Self { size, tiles })
    }

    /// Side length N
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tiles in row-major order
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile at a linear index
    pub fn get(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    /// Linear index of the blank
    pub fn blank_index(&self) -> usize {
        // Every constructor guarantees exactly one blank
        self.tiles
            .iter()
            .position(|&t| t == BLANK)
            .unwrap_or(self.tiles.len() - 1)
    }

    /// True iff `tiles[i] == i + 1` everywhere and the blank is last
    pub fn is_solved(&self) -> bool {
        let Some((last, rest)) = self.tiles.split_last() else {
            return false;
        };
        *last == BLANK
            && rest
                .iter()
                .enumerate()
                .all(|(i, &tile)| tile as usize == i + 1)
    }

    /// True iff the tile at `index` is orthogonally next to the blank
    pub fn is_movable(&self, index: usize) -> bool {
        if index >= self.tiles.len() {
            return false;
        }
        adjacent_indices(self.blank_index(), self.size).contains(&index)
    }

    /// Every index whose tile could slide into the blank (for hint styling)
    pub fn movable_indices(&self) -> Vec<usize> {
        adjacent_indices(self.blank_index(), self.size)
    }

    /// Swap the blank with the tile at `index`. Caller checks adjacency.
    pub(crate) fn swap_with_blank(&mut self, index: usize) {
        let blank = self.blank_index();
        self.tiles.swap(blank, index);
    }

    /// Sum over numbered tiles of their grid distance from home
    pub fn manhattan_distance(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK)
            .map(|(i, &tile)| {
                let (row, col) = index_to_cell(i, self.size);
                let (home_row, home_col) = index_to_cell(tile as usize - 1, self.size);
                row.abs_diff(home_row) + col.abs_diff(home_col)
            })
            .sum()
    }

    /// Number of numbered tile pairs that appear out of order
    pub fn inversions(&self) -> usize {
        let numbered: Vec<Tile> = self.tiles.iter().copied().filter(|&t| t != BLANK).collect();
        numbered
            .iter()
            .enumerate()
            .map(|(i, &a)| numbered[i + 1..].iter().filter(|&&b| b < a).count())
            .sum()
    }

    /// Standard sliding-puzzle parity test for reachability from solved
    ///
    /// Odd widths: inversions must be even. Even widths: inversions plus the
    /// blank's row counted from the bottom (0-based) must be even.
    pub fn is_solvable(&self) -> bool {
        let inversions = self.inversions();
        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            let (blank_row, _) = index_to_cell(self.blank_index(), self.size);
            (inversions + (self.size - 1 - blank_row)) % 2 == 0
        }
    }
}

/// Indices orthogonally adjacent to `index` on an NxN grid (up, down, left, right)
pub fn adjacent_indices(index: usize, size: usize) -> Vec<usize> {
    let (row, col) = index_to_cell(index, size);
    let mut out = Vec::with_capacity(4);

    if row > 0 {
        out.push(cell_to_index(row - 1, col, size));
    }
    if row + 1 < size {
        out.push(cell_to_index(row + 1, col, size));
    }
    if col > 0 {
        out.push(cell_to_index(row, col - 1, size));
    }
    if col + 1 < size {
        out.push(cell_to_index(row, col + 1, size));
    }

    out
}
