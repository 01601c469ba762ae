use pipefish::{
    Block, BlockRegistry, Endpoint, Grid, GridPos, Link, LinkRef, LinkRegistry, TrackerGrid,
    plan_route, trace_route,
};

fn pos(col: i32, row: i32) -> GridPos {
    GridPos::new(col, row)
}

/// Source at block (0,0), destination at (2,2): waypoints
/// (0,0) → (0,3) → (4,3) → (4,4).
fn traced_scene() -> (Grid, TrackerGrid, pipefish::Route, LinkRef) {
    let grid = Grid::default();
    let mut blocks = BlockRegistry::new();
    let a = blocks.add(Block::new(0, 0, 1, "a")).unwrap();
    let b = blocks.add(Block::new(2, 2, 1, "b")).unwrap();

    let mut links = LinkRegistry::new();
    let id = links
        .add(Link::new(Endpoint::new(a, 0), Endpoint::new(b, 0)))
        .unwrap();
    let link_ref = LinkRef::Stored(id);

    let link = *links.get(id).unwrap();
    let mut route = plan_route(&grid, &blocks, &link).unwrap();
    let mut trackers = TrackerGrid::new(&grid);
    trace_route(&grid, &mut trackers, link_ref, &mut route);
    (grid, trackers, route, link_ref)
}

#[test]
fn all_cells_lists_every_crossed_cell_in_traversal_order() {
    let (_, _, route, _) = traced_scene();
    assert_eq!(
        route.all_cells(),
        &[
            pos(0, 0),
            pos(0, 1),
            pos(0, 2),
            pos(0, 3),
            pos(1, 3),
            pos(2, 3),
            pos(3, 3),
            pos(4, 3),
            pos(4, 4),
        ]
    );
}

#[test]
fn waypoint_cells_derive_directions_from_both_neighbors() {
    let (_, trackers, _, _) = traced_scene();

    // Start: only a vertical exit.
    let [start] = trackers.trackers(pos(0, 0)) else {
        panic!("expected one tracker on the start cell");
    };
    assert!(start.is_start && !start.is_end);
    assert!(start.directions.vertical && !start.directions.horizontal);

    // First corner: vertical arrival, horizontal exit.
    let [corner] = trackers.trackers(pos(0, 3)) else {
        panic!("expected one tracker on the corner cell");
    };
    assert!(!corner.is_start && !corner.is_end);
    assert!(corner.directions.vertical && corner.directions.horizontal);

    // End: vertical arrival only.
    let [end] = trackers.trackers(pos(4, 4)) else {
        panic!("expected one tracker on the end cell");
    };
    assert!(end.is_end && !end.is_start);
    assert!(end.directions.vertical && !end.directions.horizontal);
}

#[test]
fn in_between_cells_get_the_segment_direction_only() {
    let (_, trackers, _, link) = traced_scene();

    let [tracker] = trackers.trackers(pos(0, 2)) else {
        panic!("expected one tracker");
    };
    assert!(tracker.directions.vertical && !tracker.directions.horizontal);
    assert!(!tracker.is_start && !tracker.is_end);

    let [tracker] = trackers.trackers(pos(2, 3)) else {
        panic!("expected one tracker");
    };
    assert!(tracker.directions.horizontal && !tracker.directions.vertical);
    assert_eq!(tracker.link, link);

    // Cells the route never touches stay empty.
    assert!(trackers.trackers(pos(6, 6)).is_empty());
}

#[test]
fn counts_and_segment_queries_respect_direction_and_terminus_flags() {
    let (_, trackers, _, link) = traced_scene();

    assert_eq!(trackers.count_horizontal(pos(2, 3)), 1);
    assert_eq!(trackers.count_horizontal(pos(0, 2)), 0);

    assert_eq!(trackers.count_vertical(pos(0, 2), false, false), 1);
    // Excluding start points silences the route's own start cell...
    assert_eq!(trackers.count_vertical(pos(0, 0), true, false), 0);
    // ...while excluding end points does not.
    assert_eq!(trackers.count_vertical(pos(0, 0), false, true), 1);
    assert_eq!(trackers.count_vertical(pos(4, 4), false, true), 0);

    assert!(trackers.contains_vertical_segment(pos(0, 1), link));
    assert!(!trackers.contains_vertical_segment(pos(2, 3), link));
    assert!(trackers.contains_horizontal_segment(pos(3, 3), link));
    assert!(!trackers.contains_horizontal_segment(pos(0, 1), link));
}
