//! Waypoint planning for a single link.
//!
//! No search is involved: obstacles are only ever blocks directly in a
//! column, so paths always take a canonical down/side/down/side (or
//! side/up/side) shape. Descending routes drop as far as they can, swing to
//! the approach side, and come back over the destination; ascending routes
//! leave through the margin below the source and climb beside the
//! destination column. The top row is approached from the side since there
//! is no margin row above it.

use crate::block::BlockRegistry;
use crate::coords::{BlockPos, GridPos, block_to_grid};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::link::Link;
use crate::route::Route;

/// Plans the ordered corner waypoints for `link`, from the source item's grid
/// cell to the destination item's. Fails only when an endpoint references a
/// block missing from the registry.
pub fn plan_route(grid: &Grid, blocks: &BlockRegistry, link: &Link) -> Result<Route> {
    let source = blocks.get(link.source.block).ok_or(Error::UnknownBlock {
        block: link.source.block,
    })?;
    let dest = blocks.get(link.dest.block).ok_or(Error::UnknownBlock {
        block: link.dest.block,
    })?;

    let start = block_to_grid(BlockPos::new(
        source.x + i32::from(link.source.item),
        source.y,
    ));
    let end = block_to_grid(BlockPos::new(dest.x + i32::from(link.dest.item), dest.y));

    let mut route = Route::from_start(start);

    // Lines loop around the right of blocks by default, except in the last
    // column or when the destination is left of the start.
    let side = if end.col < start.col || start.col == grid.last_col() {
        -1
    } else {
        1
    };

    if start.row < end.row {
        // Destination is below. A block directly below with a clear column
        // needs no intermediate corners at all.
        let blocked_in_start_col =
            grid.blocks_between(blocks, start, GridPos::new(start.col, end.row));
        if start.col != end.col || blocked_in_start_col {
            // Drop as far as possible without hitting another block.
            let mut row_to = end.row - 1;
            if let Some(below) = grid.first_block_below(blocks, start) {
                let below_row = block_to_grid(below.anchor()).row;
                row_to = row_to.min(below_row - 1);
            }
            route.push_waypoint(GridPos::new(start.col, row_to));
            if row_to < end.row - 1 {
                // Swing to the approach side and continue the descent there.
                route.push_waypoint(GridPos::new(start.col + side, row_to));
                route.push_waypoint(GridPos::new(start.col + side, end.row - 1));
            }
            // Come over until directly above the destination.
            route.push_waypoint(GridPos::new(end.col, end.row - 1));
        }
    } else {
        if start.row < grid.last_row() {
            route.push_waypoint(GridPos::new(start.col, start.row + 1));
            route.push_waypoint(GridPos::new(start.col + side, start.row + 1));
        } else {
            // Bottom row has no margin below; leave sideways instead.
            route.push_waypoint(GridPos::new(start.col + side, start.row));
        }

        if end.row > 0 {
            route.push_waypoint(GridPos::new(start.col + side, end.row - 1));
            route.push_waypoint(GridPos::new(end.col, end.row - 1));
        } else if !grid.blocks_between(blocks, GridPos::new(start.col, 0), end) {
            route.push_waypoint(GridPos::new(start.col + side, 0));
        } else {
            // Blocks sit between start and destination along the top row:
            // duck under row 0, cross over, and come up beside the target.
            route.push_waypoint(GridPos::new(start.col + side, 1));
            route.push_waypoint(GridPos::new(end.col - side, 1));
            route.push_waypoint(GridPos::new(end.col - side, 0));
        }
    }

    route.push_waypoint(end);
    Ok(route)
}
