//! Per-pass routing context and waypoint → cell traversal.
//!
//! Cells themselves carry no routing state. Each recompute pass owns a
//! [`TrackerGrid`], a dense cell-indexed map of [`RouteTracker`] annotations
//! that is allocated fresh at the start of the pass and dropped with it, so
//! no stale data can leak between passes.

use crate::coords::GridPos;
use crate::grid::Grid;
use crate::link::LinkRef;
use crate::route::{Route, RouteTracker, SegmentDirections};

#[derive(Debug, Clone)]
pub struct TrackerGrid {
    size: usize,
    cells: Vec<Vec<RouteTracker>>,
}

impl TrackerGrid {
    pub fn new(grid: &Grid) -> Self {
        Self {
            size: grid.size(),
            cells: vec![Vec::new(); grid.size() * grid.size()],
        }
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        let in_range = pos.col >= 0
            && pos.row >= 0
            && (pos.col as usize) < self.size
            && (pos.row as usize) < self.size;
        in_range.then(|| pos.row as usize * self.size + pos.col as usize)
    }

    fn push(&mut self, pos: GridPos, tracker: RouteTracker) {
        if let Some(index) = self.index(pos) {
            self.cells[index].push(tracker);
        }
    }

    pub fn trackers(&self, pos: GridPos) -> &[RouteTracker] {
        self.index(pos)
            .map(|index| self.cells[index].as_slice())
            .unwrap_or(&[])
    }

    pub fn count_horizontal(&self, pos: GridPos) -> usize {
        self.trackers(pos)
            .iter()
            .filter(|tracker| tracker.directions.horizontal)
            .count()
    }

    /// Counts vertical segments in a cell. Start or end trackers can be
    /// excluded so a route terminating in a block cell does not count against
    /// routes originating there.
    pub fn count_vertical(&self, pos: GridPos, exclude_starts: bool, exclude_ends: bool) -> usize {
        self.trackers(pos)
            .iter()
            .filter(|tracker| {
                tracker.directions.vertical
                    && !((tracker.is_start && exclude_starts) || (tracker.is_end && exclude_ends))
            })
            .count()
    }

    pub fn contains_vertical_segment(&self, pos: GridPos, link: LinkRef) -> bool {
        self.trackers(pos)
            .iter()
            .any(|tracker| tracker.link == link && tracker.directions.vertical)
    }

    pub fn contains_horizontal_segment(&self, pos: GridPos, link: LinkRef) -> bool {
        self.trackers(pos)
            .iter()
            .any(|tracker| tracker.link == link && tracker.directions.horizontal)
    }
}

fn segment_directions(
    prev: Option<GridPos>,
    current: GridPos,
    next: Option<GridPos>,
) -> SegmentDirections {
    SegmentDirections {
        horizontal: prev.is_some_and(|pos| pos.row == current.row)
            || next.is_some_and(|pos| pos.row == current.row),
        vertical: prev.is_some_and(|pos| pos.col == current.col)
            || next.is_some_and(|pos| pos.col == current.col),
    }
}

/// Expands a planned route's waypoints into the full ordered cell list and
/// registers a tracker on every crossed cell. Waypoint cells get directions
/// derived from both neighbors (corners set both); cells strictly between
/// two waypoints get the single direction of that segment.
pub fn trace_route(grid: &Grid, trackers: &mut TrackerGrid, link: LinkRef, route: &mut Route) {
    let waypoints: Vec<GridPos> = route.waypoints().iter().map(|w| w.pos).collect();
    let mut all_cells = Vec::new();

    for (i, &current) in waypoints.iter().enumerate() {
        let prev = if i > 0 { Some(waypoints[i - 1]) } else { None };
        let next = waypoints.get(i + 1).copied();

        trackers.push(
            current,
            RouteTracker {
                link,
                directions: segment_directions(prev, current, next),
                is_start: prev.is_none(),
                is_end: next.is_none(),
            },
        );
        all_cells.push(current);

        if let Some(next) = next {
            let between = grid.cells_between(current, next);
            // Consecutive waypoints are axis-aligned, so the in-between
            // direction is one or the other, never both.
            let horizontal = current.row == next.row;
            for &cell in &between {
                trackers.push(
                    cell,
                    RouteTracker {
                        link,
                        directions: SegmentDirections {
                            horizontal,
                            vertical: !horizontal,
                        },
                        is_start: false,
                        is_end: false,
                    },
                );
            }
            all_cells.extend(between);
        }
    }

    route.set_all_cells(all_cells);
}
