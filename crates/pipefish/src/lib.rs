#![forbid(unsafe_code)]

//! Deterministic rectilinear wire routing for checkerboard block grids.
//!
//! Blocks sit on the even rows/columns of a fixed odd-sized grid; the odd
//! rows/columns are margins reserved for wires. Given registries of blocks
//! and links, a single synchronous pass plans an orthogonal route per link,
//! counts where routes share a row or column, and spreads overlapping lines
//! across evenly spaced lanes so they render as distinct parallel strokes.
//!
//! Design goals:
//! - deterministic outputs (stable registries in, identical pixel points out)
//! - headless: no rendering, interaction, or persistence in this crate
//! - batch semantics: every pass rebuilds all routes; nothing survives between passes

pub mod block;
pub mod coords;
pub mod error;
pub mod geom;
pub mod grid;
pub mod link;
pub mod overlap;
pub mod pipeline;
pub mod plan;
pub mod route;
pub mod trace;

pub use block::{Block, BlockId, BlockRegistry, MAX_BLOCK_SIZE};
pub use coords::{BlockPos, GridPos, block_to_grid, grid_to_block};
pub use error::{Error, Result};
pub use grid::{Grid, GridConfig};
pub use link::{Endpoint, Link, LinkId, LinkRef, LinkRegistry};
pub use pipeline::recalculate_all_routes;
pub use plan::plan_route;
pub use route::{
    OrderPreferences, PointData, Route, RouteTable, RouteTracker, SegmentDirections, Waypoint,
};
pub use trace::{TrackerGrid, trace_route};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
