//! Overlap counting and lane/offset assignment across all routes.
//!
//! Columns and rows are handled independently: a column cares about vertical
//! segments, a row about horizontal ones. Routes are processed in a fixed
//! order chosen to keep lines that diverge in different directions from
//! crossing each other, then each route is assigned a lane within every
//! column/row it crosses and displaced by an even partition of the cell
//! extent.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;

use crate::block::BlockRegistry;
use crate::coords::{GridPos, block_to_grid};
use crate::error::{Error, Result};
use crate::grid::Grid;
use crate::link::{LinkRef, LinkRegistry};
use crate::route::{OrderPreferences, RouteTable};
use crate::trace::TrackerGrid;

/// One route's maximum concurrent same-direction segment count within a
/// single column or row. The count includes the route's own segment, so a
/// lone vertical route through a column carries `max_overlap == 1` and lands
/// dead center; `max_overlap == 0` means the route has no segment of that
/// direction there at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOverlap {
    pub link: LinkRef,
    pub max_overlap: usize,
}

/// Per-column and per-row overlap entries, ordered the way the offset pass
/// must process them.
#[derive(Debug, Clone, Default)]
pub struct OverlapTable {
    pub columns: Vec<Vec<RouteOverlap>>,
    pub rows: Vec<Vec<RouteOverlap>>,
}

struct SortKey {
    link: LinkRef,
    prefs: OrderPreferences,
    /// Grid-column displacement between the destination and source block
    /// anchors (not items): zero means the link stays in its start column.
    d_col: i32,
}

/// Comparator for the column pass. Links heading the same way as their
/// column displacement are grouped into diagonal bands; links confined to
/// the start column order purely by vertical displacement; everything else
/// falls back to horizontal displacement. The left-of-start arm is only
/// reached when *both* links go left — the asymmetry is deliberate and must
/// not be "simplified" away.
fn compare(a: &SortKey, b: &SortKey) -> i32 {
    let horizontal_order = a.prefs.horizontal - b.prefs.horizontal;
    let vertical_order = a.prefs.vertical - b.prefs.vertical;

    if a.prefs.vertical >= 0 && b.prefs.vertical >= 0 {
        if a.d_col == 0 && b.d_col == 0 {
            // Both confined to their start column: bottom-most last.
            return vertical_order;
        }
        if a.d_col == 0 && b.d_col != 0 {
            // Links leaving to the right sort after the confined one, links
            // leaving to the left before it.
            return -b.d_col;
        }
        if a.d_col > 0 && b.d_col > 0 {
            // Right of the start column: top-right diagonal bands last.
            let diagonal_order = horizontal_order - vertical_order;
            return if diagonal_order == 0 {
                -vertical_order
            } else {
                diagonal_order
            };
        }
        if a.d_col < 0 && b.d_col < 0 {
            // Left of the start column: bottom-right diagonal bands last.
            let diagonal_order = horizontal_order + vertical_order;
            return if diagonal_order == 0 {
                vertical_order
            } else {
                diagonal_order
            };
        }
    }

    horizontal_order
}

/// The comparator is not a total order, so `slice::sort_by` (which may panic
/// on strict-weak-order violations) is out. A stable insertion sort applies
/// it pairwise; incomparable pairs keep their registry order.
fn stable_sort(keys: &mut [SortKey]) {
    for i in 1..keys.len() {
        let mut j = i;
        while j > 0 && compare(&keys[j - 1], &keys[j]) > 0 {
            keys.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Processing order for the column pass, sorted once per recompute.
pub fn column_order(
    blocks: &BlockRegistry,
    links: &LinkRegistry,
    routes: &RouteTable,
) -> Result<Vec<LinkRef>> {
    let mut keys = Vec::new();
    for (link_ref, link) in links.iter_all() {
        let Some(route) = routes.route(link_ref) else {
            continue;
        };
        let source = blocks.get(link.source.block).ok_or(Error::UnknownBlock {
            block: link.source.block,
        })?;
        let dest = blocks.get(link.dest.block).ok_or(Error::UnknownBlock {
            block: link.dest.block,
        })?;
        keys.push(SortKey {
            link: link_ref,
            prefs: route.order_preferences(),
            d_col: block_to_grid(dest.anchor()).col - block_to_grid(source.anchor()).col,
        });
    }
    stable_sort(&mut keys);
    Ok(keys.into_iter().map(|key| key.link).collect())
}

/// Processing order for the row pass: links whose column-pass position is
/// nearest the middle of that ordering are processed last, so lines starting
/// near a block's horizontal center stack below those starting near its
/// edges.
pub fn row_order(links: &LinkRegistry, column_order: &[LinkRef]) -> Vec<LinkRef> {
    let center = if column_order.is_empty() {
        0
    } else {
        (column_order.len() - 1).div_ceil(2)
    };
    let index: FxHashMap<LinkRef, usize> = column_order
        .iter()
        .enumerate()
        .map(|(i, &link)| (link, i))
        .collect();

    let mut order: Vec<LinkRef> = links.iter_all().map(|(link, _)| link).collect();
    order.sort_by_key(|link| Reverse(index.get(link).copied().unwrap_or(0).abs_diff(center)));
    order
}

/// Counts, for every route in every column and row it crosses, the maximum
/// concurrent same-direction segments in any single cell there. In columns,
/// other routes' start trackers are ignored at this route's terminal cell
/// and end trackers at its initial cell, so routes meeting at a block cell
/// do not displace each other.
pub fn determine_max_overlaps(
    grid: &Grid,
    trackers: &TrackerGrid,
    routes: &RouteTable,
    column_order: &[LinkRef],
    row_order: &[LinkRef],
) -> OverlapTable {
    let size = grid.size() as i32;

    let mut columns = Vec::with_capacity(grid.size());
    for col in 0..size {
        let mut entries = Vec::new();
        for &link in column_order {
            let Some(route) = routes.route(link) else {
                continue;
            };
            let cells: Vec<GridPos> = route
                .all_cells()
                .iter()
                .copied()
                .filter(|cell| cell.col == col)
                .collect();
            if cells.is_empty() {
                continue;
            }
            let first = route.first();
            let last = route.last();
            let mut max_overlap = 0;
            for &cell in &cells {
                let exclude_starts = last == Some(cell);
                let exclude_ends = first == Some(cell);
                max_overlap =
                    max_overlap.max(trackers.count_vertical(cell, exclude_starts, exclude_ends));
            }
            entries.push(RouteOverlap { link, max_overlap });
        }
        columns.push(entries);
    }

    let mut rows = Vec::with_capacity(grid.size());
    for row in 0..size {
        let mut entries = Vec::new();
        for &link in row_order {
            let Some(route) = routes.route(link) else {
                continue;
            };
            let cells: Vec<GridPos> = route
                .all_cells()
                .iter()
                .copied()
                .filter(|cell| cell.row == row)
                .collect();
            if cells.is_empty() {
                continue;
            }
            let mut max_overlap = 0;
            for &cell in &cells {
                max_overlap = max_overlap.max(trackers.count_horizontal(cell));
            }
            entries.push(RouteOverlap { link, max_overlap });
        }
        rows.push(entries);
    }

    OverlapTable { columns, rows }
}

/// Assigns every route a lane per column/row and writes the resulting pixel
/// offsets onto its waypoints. Lanes partition the cell extent into
/// `max_overlap + 1` even gaps; a route with `max_overlap == 0` is never
/// displaced.
pub fn assign_offsets(
    grid: &Grid,
    trackers: &TrackerGrid,
    routes: &mut RouteTable,
    overlaps: &OverlapTable,
) -> Result<()> {
    let size = grid.size();

    for (c, entries) in overlaps.columns.iter().enumerate() {
        let col = c as i32;
        let max_offset = 0.5 * grid.cell_width(col);
        let min_offset = -max_offset;

        // Per-row counts of already-processed routes. The excluding variants
        // skip a route's terminal cells so meeting endpoints inside a block
        // cell do not push each other into separate lanes.
        let mut processed = vec![0usize; size];
        let mut processed_excluding_start = vec![0usize; size];
        let mut processed_excluding_end = vec![0usize; size];

        for entry in entries {
            let Some(route) = routes.route(entry.link) else {
                continue;
            };
            let first = route.first();
            let last = route.last();
            let cells: Vec<GridPos> = route
                .all_cells()
                .iter()
                .copied()
                .filter(|cell| cell.col == col)
                .collect();

            let mut lane = 0usize;
            for &cell in &cells {
                let count = if first == Some(cell) {
                    processed_excluding_end[cell.row as usize]
                } else if last == Some(cell) {
                    processed_excluding_start[cell.row as usize]
                } else {
                    processed[cell.row as usize]
                };
                if trackers.contains_vertical_segment(cell, entry.link) {
                    lane = lane.max(count);
                }
            }
            lane += 1;
            if entry.max_overlap > 0 && lane > entry.max_overlap {
                return Err(Error::LaneOverflow {
                    lane,
                    max_overlap: entry.max_overlap,
                });
            }

            let spacing = (max_offset - min_offset) / (entry.max_overlap + 1) as f64;
            let offset_x = if entry.max_overlap == 0 {
                0.0
            } else {
                min_offset + lane as f64 * spacing
            };

            if let Some(route) = routes.route_mut(entry.link) {
                for waypoint in route.waypoints_mut() {
                    if waypoint.pos.col == col {
                        waypoint.offset_x = offset_x;
                    }
                }
            }

            for &cell in &cells {
                let row = cell.row as usize;
                if first != Some(cell) {
                    processed_excluding_start[row] += 1;
                }
                if last != Some(cell) {
                    processed_excluding_end[row] += 1;
                }
                if trackers.contains_vertical_segment(cell, entry.link) {
                    processed[row] += 1;
                }
            }
        }
    }

    for (r, entries) in overlaps.rows.iter().enumerate() {
        let row = r as i32;
        let max_offset = 0.5 * grid.cell_height(row);
        let min_offset = -max_offset;

        let mut processed = vec![0usize; size];

        for entry in entries {
            let Some(route) = routes.route(entry.link) else {
                continue;
            };
            let cells: Vec<GridPos> = route
                .all_cells()
                .iter()
                .copied()
                .filter(|cell| cell.row == row)
                .collect();

            let mut lane = 0usize;
            for &cell in &cells {
                if trackers.contains_horizontal_segment(cell, entry.link) {
                    lane = lane.max(processed[cell.col as usize]);
                }
            }
            lane += 1;
            if entry.max_overlap > 0 && lane > entry.max_overlap {
                return Err(Error::LaneOverflow {
                    lane,
                    max_overlap: entry.max_overlap,
                });
            }

            let spacing = (max_offset - min_offset) / (entry.max_overlap + 1) as f64;
            let offset_y = if entry.max_overlap == 0 {
                0.0
            } else {
                min_offset + lane as f64 * spacing
            };

            if let Some(route) = routes.route_mut(entry.link) {
                for waypoint in route.waypoints_mut() {
                    if waypoint.pos.row == row {
                        waypoint.offset_y = offset_y;
                    }
                }
            }

            for &cell in &cells {
                if trackers.contains_horizontal_segment(cell, entry.link) {
                    processed[cell.col as usize] += 1;
                }
            }
        }
    }

    Ok(())
}
