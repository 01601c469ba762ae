//! Blocks and the block registry.
//!
//! A block is one row tall and 1–4 items wide; each item is an addressable
//! link endpoint. The registry owns the blocks, hands out opaque ids, and
//! answers width-aware coordinate lookups (a block of size `s` anchored at
//! `x0` covers block columns `[x0, x0 + s - 1]`).

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::coords::BlockPos;

/// The widest block the grid supports, in items.
pub const MAX_BLOCK_SIZE: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockId(u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    /// Number of consecutive item columns this block occupies (1–4).
    pub size: u8,
    pub name: String,
}

impl Block {
    pub fn new(x: i32, y: i32, size: u8, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            size,
            name: name.into(),
        }
    }

    pub fn anchor(&self) -> BlockPos {
        BlockPos::new(self.x, self.y)
    }

    pub fn occupies(&self, pos: BlockPos) -> bool {
        pos.y == self.y && pos.x >= self.x && pos.x < self.x + i32::from(self.size)
    }

    /// Item index of the block-space column `x`, if this block covers it.
    pub fn item_index(&self, x: i32) -> Option<u8> {
        if self.occupies(BlockPos::new(x, self.y)) {
            Some((x - self.x) as u8)
        } else {
            None
        }
    }

    pub fn is_first_item(&self, item: u8) -> bool {
        item == 0
    }

    pub fn is_last_item(&self, item: u8) -> bool {
        item + 1 == self.size
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: IndexMap<BlockId, Block>,
    anchors: FxHashMap<(i32, i32), BlockId>,
    next_id: u32,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a block and returns its id, or `None` when the block is malformed
    /// (size outside 1–4) or another block is already anchored on the same
    /// cell.
    pub fn add(&mut self, block: Block) -> Option<BlockId> {
        if block.size == 0 || block.size > MAX_BLOCK_SIZE {
            return None;
        }
        if self.anchors.contains_key(&(block.x, block.y)) {
            return None;
        }
        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.anchors.insert((block.x, block.y), id);
        self.blocks.insert(id, block);
        Some(id)
    }

    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let block = self.blocks.shift_remove(&id)?;
        self.anchors.remove(&(block.x, block.y));
        Some(block)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// The block covering block-space `pos`, honoring multi-item widths: a
    /// block anchored up to three columns to the left still covers `pos` if
    /// it is wide enough.
    pub fn block_at(&self, pos: BlockPos) -> Option<(BlockId, &Block)> {
        for back in 0..i32::from(MAX_BLOCK_SIZE) {
            if let Some(&id) = self.anchors.get(&(pos.x - back, pos.y)) {
                let block = &self.blocks[&id];
                if i32::from(block.size) > back {
                    return Some((id, block));
                }
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter().map(|(&id, block)| (id, block))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
