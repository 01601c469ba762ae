//! Routes: waypoints, traversal annotations, and render point data.

use indexmap::IndexMap;
use serde::Serialize;

use crate::coords::GridPos;
use crate::geom::Point;
use crate::link::{LinkId, LinkRef};

/// Which directions a route occupies within one cell. Corners set both
/// flags; a terminus that only enters vertically sets just `vertical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SegmentDirections {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Transient per-cell annotation recording one route's presence there.
/// Rebuilt from scratch on every recompute pass; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTracker {
    pub link: LinkRef,
    pub directions: SegmentDirections,
    pub is_start: bool,
    pub is_end: bool,
}

/// A route corner. Identity is the grid position alone; the offsets are
/// rendering state assigned by the overlap resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waypoint {
    pub pos: GridPos,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Waypoint {
    fn new(pos: GridPos) -> Self {
        Self {
            pos,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Net displacement of a route from its first to its last waypoint, in grid
/// units. Drives the processing order that keeps routes from crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderPreferences {
    pub horizontal: i32,
    pub vertical: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Route {
    waypoints: Vec<Waypoint>,
    all_cells: Vec<GridPos>,
    #[serde(skip)]
    point_data: Option<PointData>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_start(pos: GridPos) -> Self {
        let mut route = Self::default();
        route.push_waypoint(pos);
        route
    }

    /// Appends a corner unless an equal position is already present
    /// (zero-length segments are suppressed on insertion).
    pub(crate) fn push_waypoint(&mut self, pos: GridPos) {
        if self.waypoints.iter().any(|waypoint| waypoint.pos == pos) {
            return;
        }
        self.waypoints.push(Waypoint::new(pos));
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub(crate) fn waypoints_mut(&mut self) -> &mut [Waypoint] {
        &mut self.waypoints
    }

    /// Every cell the route crosses, in traversal order, including non-corner
    /// cells between waypoints. Cells may repeat when a later segment
    /// revisits them.
    pub fn all_cells(&self) -> &[GridPos] {
        &self.all_cells
    }

    pub(crate) fn set_all_cells(&mut self, cells: Vec<GridPos>) {
        self.all_cells = cells;
    }

    pub fn first(&self) -> Option<GridPos> {
        self.waypoints.first().map(|waypoint| waypoint.pos)
    }

    pub fn last(&self) -> Option<GridPos> {
        self.waypoints.last().map(|waypoint| waypoint.pos)
    }

    pub fn order_preferences(&self) -> OrderPreferences {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => OrderPreferences {
                horizontal: last.col - first.col,
                vertical: last.row - first.row,
            },
            _ => OrderPreferences {
                horizontal: 0,
                vertical: 0,
            },
        }
    }

    pub fn point_data(&self) -> Option<&PointData> {
        self.point_data.as_ref()
    }

    pub(crate) fn set_point_data(&mut self, data: PointData) {
        self.point_data = Some(data);
    }

    /// Pixel polyline with offsets applied, once render points are built.
    pub fn points(&self) -> Option<&[Point]> {
        self.point_data.as_ref().map(|data| data.points.as_slice())
    }

    /// Interpolated pixel position at fraction `percent` along the route.
    /// `None` outside `[0, 1]` or before render points were built.
    pub fn position_at_percentage(&self, percent: f64) -> Option<Point> {
        if !(0.0..=1.0).contains(&percent) {
            return None;
        }
        let data = self.point_data.as_ref()?;
        let first = *data.points.first()?;
        if data.points.len() == 1 || data.total_length == 0.0 {
            return Some(first);
        }

        let pct = &data.percentages;
        let mut index = pct.len() - 2;
        for i in 0..pct.len() - 1 {
            if percent <= pct[i + 1] {
                index = i;
                break;
            }
        }
        let span = pct[index + 1] - pct[index];
        let alpha = if span == 0.0 {
            0.0
        } else {
            (percent - pct[index]) / span
        };
        Some(data.points[index].lerp(data.points[index + 1], alpha))
    }
}

/// Pixel polyline plus the cumulative-length table used for fractional
/// position lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct PointData {
    pub points: Vec<Point>,
    pub lengths: Vec<f64>,
    pub total_length: f64,
    pub percentages: Vec<f64>,
}

impl PointData {
    /// Builds the cumulative table. `percentages` is non-decreasing, starts
    /// at 0.0 and ends at exactly 1.0 for paths with positive length.
    pub fn from_points(points: Vec<Point>) -> Self {
        if points.is_empty() {
            return Self {
                points,
                lengths: Vec::new(),
                total_length: 0.0,
                percentages: Vec::new(),
            };
        }

        let lengths: Vec<f64> = points
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).length())
            .collect();
        let total_length: f64 = lengths.iter().sum();

        let mut percentages = Vec::with_capacity(points.len());
        percentages.push(0.0);
        let mut acc = 0.0;
        for length in &lengths {
            acc += if total_length == 0.0 {
                0.0
            } else {
                length / total_length
            };
            percentages.push(acc);
        }
        // Pin the endpoint so fractional lookups at 1.0 land on the last
        // point despite accumulated rounding.
        if total_length > 0.0 {
            if let Some(last) = percentages.last_mut() {
                *last = 1.0;
            }
        }

        Self {
            points,
            lengths,
            total_length,
            percentages,
        }
    }
}

/// All routes of one recompute pass, keyed by link, in processing order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: IndexMap<LinkRef, Route>,
}

impl RouteTable {
    /// Registers a planned route for `link`, replacing any previous one.
    pub fn insert(&mut self, link: LinkRef, route: Route) {
        self.routes.insert(link, route);
    }

    pub fn route(&self, link: LinkRef) -> Option<&Route> {
        self.routes.get(&link)
    }

    pub(crate) fn route_mut(&mut self, link: LinkRef) -> Option<&mut Route> {
        self.routes.get_mut(&link)
    }

    pub fn stored(&self, id: LinkId) -> Option<&Route> {
        self.route(LinkRef::Stored(id))
    }

    /// Pixel corner points for a link's route, offsets applied.
    pub fn points_for_link(&self, link: LinkRef) -> Option<&[Point]> {
        self.route(link)?.points()
    }

    pub fn position_at_percentage(&self, link: LinkRef, percent: f64) -> Option<Point> {
        self.route(link)?.position_at_percentage(percent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LinkRef, &Route)> {
        self.routes.iter().map(|(&link, route)| (link, route))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (LinkRef, &mut Route)> {
        self.routes.iter_mut().map(|(&link, route)| (link, route))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
