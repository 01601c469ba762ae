//! The routing grid: cell metrics, pixel mapping, and obstacle queries.
//!
//! The grid is a fixed odd-sized checkerboard. Even columns/rows are block
//! cells, odd ones are margins; cell extents differ between the two, so every
//! pixel computation branches on parity. Lookups outside the grid return an
//! absent result rather than failing — callers check before use.

use serde::{Deserialize, Serialize};

use crate::block::{Block, BlockRegistry};
use crate::coords::{GridPos, grid_to_block};
use crate::error::{Error, Result};
use crate::geom::{Point, Size, point};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of rows and columns; must be odd so the grid starts and ends on
    /// a block column/row.
    pub size: usize,
    pub block_col_width: f64,
    pub block_row_height: f64,
    pub margin_col_width: f64,
    pub margin_row_height: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 7,
            block_col_width: 60.0,
            block_row_height: 60.0,
            margin_col_width: 20.0,
            margin_row_height: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    block_col_width: f64,
    block_row_height: f64,
    margin_col_width: f64,
    margin_row_height: f64,
}

impl Default for Grid {
    fn default() -> Self {
        let config = GridConfig::default();
        Self {
            size: config.size,
            block_col_width: config.block_col_width,
            block_row_height: config.block_row_height,
            margin_col_width: config.margin_col_width,
            margin_row_height: config.margin_row_height,
        }
    }
}

impl Grid {
    pub fn new(config: GridConfig) -> Result<Self> {
        if config.size == 0 || config.size % 2 == 0 {
            return Err(Error::InvalidGridSize { size: config.size });
        }
        Ok(Self {
            size: config.size,
            block_col_width: config.block_col_width,
            block_row_height: config.block_row_height,
            margin_col_width: config.margin_col_width,
            margin_row_height: config.margin_row_height,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn config(&self) -> GridConfig {
        GridConfig {
            size: self.size,
            block_col_width: self.block_col_width,
            block_row_height: self.block_row_height,
            margin_col_width: self.margin_col_width,
            margin_row_height: self.margin_row_height,
        }
    }

    pub fn last_col(&self) -> i32 {
        self.size as i32 - 1
    }

    pub fn last_row(&self) -> i32 {
        self.size as i32 - 1
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.col >= 0 && pos.row >= 0 && pos.col < self.size as i32 && pos.row < self.size as i32
    }

    /// Row-major index of `pos`, when in range.
    pub fn cell_index(&self, pos: GridPos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.row as usize * self.size + pos.col as usize)
    }

    pub fn cell_width(&self, col: i32) -> f64 {
        if col.rem_euclid(2) == 0 {
            self.block_col_width
        } else {
            self.margin_col_width
        }
    }

    pub fn cell_height(&self, row: i32) -> f64 {
        if row.rem_euclid(2) == 0 {
            self.block_row_height
        } else {
            self.margin_row_height
        }
    }

    pub fn column_center_x(&self, col: i32) -> f64 {
        if col.rem_euclid(2) == 0 {
            (col / 2) as f64 * (self.block_col_width + self.margin_col_width)
                + self.block_col_width / 2.0
        } else {
            ((col + 1) / 2) as f64 * self.block_col_width
                + (col / 2) as f64 * self.margin_col_width
                + self.margin_col_width / 2.0
        }
    }

    pub fn row_center_y(&self, row: i32) -> f64 {
        if row.rem_euclid(2) == 0 {
            (row / 2) as f64 * (self.block_row_height + self.margin_row_height)
                + self.block_row_height / 2.0
        } else {
            ((row + 1) / 2) as f64 * self.block_row_height
                + (row / 2) as f64 * self.margin_row_height
                + self.margin_row_height / 2.0
        }
    }

    pub fn cell_center(&self, pos: GridPos) -> Point {
        point(self.column_center_x(pos.col), self.row_center_y(pos.row))
    }

    /// Total pixel extent of the grid.
    pub fn pixel_dimensions(&self) -> Size {
        let blocks = self.size.div_ceil(2) as f64;
        let margins = (self.size / 2) as f64;
        Size::new(
            blocks * self.block_col_width + margins * self.margin_col_width,
            blocks * self.block_row_height + margins * self.margin_row_height,
        )
    }

    /// Classifies a pixel into its cell by comparing the fractional position
    /// within each block+margin period against the block fraction. Pixels on
    /// the boundary fall into the block band.
    pub fn cell_at_pixel(&self, x: f64, y: f64) -> Option<GridPos> {
        let col = band_index(x, self.block_col_width, self.margin_col_width);
        let row = band_index(y, self.block_row_height, self.margin_row_height);
        let pos = GridPos::new(col, row);
        self.contains(pos).then_some(pos)
    }

    /// Cells strictly between two positions on the same row or column, in
    /// ascending order. Empty when the positions are not aligned.
    pub fn cells_between(&self, a: GridPos, b: GridPos) -> Vec<GridPos> {
        if a.row == b.row {
            let (min, max) = (a.col.min(b.col), a.col.max(b.col));
            (min + 1..max)
                .map(|col| GridPos::new(col, a.row))
                .filter(|&pos| self.contains(pos))
                .collect()
        } else if a.col == b.col {
            let (min, max) = (a.row.min(b.row), a.row.max(b.row));
            (min + 1..max)
                .map(|row| GridPos::new(a.col, row))
                .filter(|&pos| self.contains(pos))
                .collect()
        } else {
            Vec::new()
        }
    }

    /// The block occupying a block cell, if any. Margin cells never hold
    /// blocks.
    pub fn block_at_cell<'a>(&self, blocks: &'a BlockRegistry, pos: GridPos) -> Option<&'a Block> {
        if !self.contains(pos) || !pos.is_block_cell() {
            return None;
        }
        blocks.block_at(grid_to_block(pos)).map(|(_, block)| block)
    }

    /// Whether any cell strictly between `a` and `b` holds a block.
    pub fn blocks_between(&self, blocks: &BlockRegistry, a: GridPos, b: GridPos) -> bool {
        self.cells_between(a, b)
            .iter()
            .any(|&pos| self.block_at_cell(blocks, pos).is_some())
    }

    /// Scans straight down from `pos` and returns the first block found in
    /// that column, if any.
    pub fn first_block_below<'a>(
        &self,
        blocks: &'a BlockRegistry,
        pos: GridPos,
    ) -> Option<&'a Block> {
        (pos.row + 1..self.size as i32)
            .find_map(|row| self.block_at_cell(blocks, GridPos::new(pos.col, row)))
    }

    /// For a margin cell inside a block row: the block covering both adjacent
    /// block cells, i.e. a multi-item block spanning this margin.
    pub fn block_spanning_margin<'a>(
        &self,
        blocks: &'a BlockRegistry,
        pos: GridPos,
    ) -> Option<&'a Block> {
        if !self.contains(pos) || !pos.is_margin_cell() {
            return None;
        }
        let before = blocks.block_at(grid_to_block(GridPos::new(pos.col - 1, pos.row)))?;
        let after = blocks.block_at(grid_to_block(GridPos::new(pos.col + 1, pos.row)))?;
        (before.0 == after.0).then_some(before.1)
    }

    /// The cells a block's item row covers, given the cell of the selected
    /// item, the block width in items, and the selected item index. With
    /// `include_margins` the in-between margin cells are returned too.
    pub fn cells_spanned_by_item(
        &self,
        item_cell: GridPos,
        block_size: u8,
        item: u8,
        include_margins: bool,
    ) -> Vec<GridPos> {
        let step = if include_margins { 1usize } else { 2usize };
        let end = item_cell.col + 2 * i32::from(block_size) - 1;
        (item_cell.col..end)
            .step_by(step)
            .map(|col| GridPos::new(col - i32::from(item) * 2, item_cell.row))
            .filter(|&pos| self.contains(pos))
            .collect()
    }
}

fn band_index(coord: f64, block_extent: f64, margin_extent: f64) -> i32 {
    let period = block_extent + margin_extent;
    let pair = coord / period;
    let fraction = pair - pair.floor();
    let base = pair.floor() as i32 * 2;
    if fraction <= block_extent / period {
        base
    } else {
        base + 1
    }
}
