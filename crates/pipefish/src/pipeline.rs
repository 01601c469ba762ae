//! The full route recomputation pass.
//!
//! Strict stage order: plan a path per link → trace cells and annotations →
//! order routes → count overlaps → assign offsets → build render points.
//! Overlap counts depend on every link's path being known, so no stage runs
//! before the prior one has finished for all links. The pass is a pure
//! function of `(grid, blocks, links)`.

use tracing::debug;

use crate::block::BlockRegistry;
use crate::error::Result;
use crate::geom::point;
use crate::grid::Grid;
use crate::link::LinkRegistry;
use crate::overlap;
use crate::plan::plan_route;
use crate::route::{PointData, RouteTable};
use crate::trace::{TrackerGrid, trace_route};

/// Recomputes every link's route from scratch and returns the resulting
/// table. Nothing is reused from earlier passes; callers keep the returned
/// table for rendering and hit-testing until the next structural change.
pub fn recalculate_all_routes(
    grid: &Grid,
    blocks: &BlockRegistry,
    links: &LinkRegistry,
) -> Result<RouteTable> {
    debug!(
        blocks = blocks.len(),
        links = links.len(),
        temp = links.temp_link().is_some(),
        "recalculating all routes"
    );

    // Cell annotations never survive a pass; the tracker grid is rebuilt
    // from scratch here.
    let mut trackers = TrackerGrid::new(grid);
    let mut routes = RouteTable::default();

    for (link_ref, link) in links.iter_all() {
        let mut route = plan_route(grid, blocks, link)?;
        trace_route(grid, &mut trackers, link_ref, &mut route);
        routes.insert(link_ref, route);
    }

    let column_order = overlap::column_order(blocks, links, &routes)?;
    let row_order = overlap::row_order(links, &column_order);
    let overlaps = overlap::determine_max_overlaps(grid, &trackers, &routes, &column_order, &row_order);
    overlap::assign_offsets(grid, &trackers, &mut routes, &overlaps)?;

    build_render_points(grid, &mut routes);

    debug!(routes = routes.len(), "recalculation finished");
    Ok(routes)
}

/// Converts each route's waypoints (offsets applied) into pixel points and
/// the cumulative-length percentage table.
fn build_render_points(grid: &Grid, routes: &mut RouteTable) {
    for (_, route) in routes.iter_mut() {
        let points: Vec<_> = route
            .waypoints()
            .iter()
            .map(|waypoint| {
                point(
                    grid.column_center_x(waypoint.pos.col) + waypoint.offset_x,
                    grid.row_center_y(waypoint.pos.row) + waypoint.offset_y,
                )
            })
            .collect();
        route.set_point_data(PointData::from_points(points));
    }
}
