use crate::block::BlockId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Grid size must be odd and non-zero, got {size}")]
    InvalidGridSize { size: usize },

    #[error("Link endpoint references unknown block {block}")]
    UnknownBlock { block: BlockId },

    #[error("Route was assigned lane {lane} but only {max_overlap} overlapping segments were counted")]
    LaneOverflow { lane: usize, max_overlap: usize },
}
