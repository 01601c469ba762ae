//! Block-space ↔ grid-space conversions.
//!
//! Block space has one unit per block slot. Grid space interleaves margins:
//! blocks occupy even indices, margins odd indices, so a block at block-space
//! `(x, y)` sits at grid `(2x, 2y)` and the margins fall strictly between
//! block indices.

use serde::{Deserialize, Serialize};

/// A position in block space (one unit per block slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A cell position in grid space (blocks on even indices, margins on odd).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub col: i32,
    pub row: i32,
}

impl GridPos {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn is_block_col(self) -> bool {
        self.col.rem_euclid(2) == 0
    }

    pub fn is_block_row(self) -> bool {
        self.row.rem_euclid(2) == 0
    }

    /// Only block-cell positions (even column and row) can hold a block.
    pub fn is_block_cell(self) -> bool {
        self.is_block_col() && self.is_block_row()
    }

    /// A margin column within a block row: the gap wires cross between two
    /// horizontally adjacent block slots.
    pub fn is_margin_cell(self) -> bool {
        self.is_block_row() && !self.is_block_col()
    }
}

pub fn block_to_grid(pos: BlockPos) -> GridPos {
    GridPos::new(pos.x * 2, pos.y * 2)
}

/// Inverse of [`block_to_grid`] on block cells; margin coordinates map to the
/// nearest enclosing block slot (floor halving).
pub fn grid_to_block(pos: GridPos) -> BlockPos {
    BlockPos::new(pos.col.div_euclid(2), pos.row.div_euclid(2))
}
