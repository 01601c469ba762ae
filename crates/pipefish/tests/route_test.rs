use pipefish::geom::point;
use pipefish::{
    Block, BlockRegistry, Endpoint, Grid, Link, LinkRef, LinkRegistry, PointData,
    recalculate_all_routes,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn point_data_builds_a_monotonic_percentage_table() {
    let data = PointData::from_points(vec![
        point(0.0, 0.0),
        point(0.0, 30.0),
        point(40.0, 30.0),
        point(40.0, 60.0),
    ]);
    assert!(approx(data.total_length, 100.0));
    assert_eq!(data.lengths.len(), 3);
    assert_eq!(data.percentages.len(), 4);
    assert!(approx(data.percentages[0], 0.0));
    assert!(approx(data.percentages[1], 0.3));
    assert!(approx(data.percentages[2], 0.7));
    assert!(approx(data.percentages[3], 1.0));
    for pair in data.percentages.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn point_data_handles_degenerate_paths() {
    let empty = PointData::from_points(Vec::new());
    assert!(empty.percentages.is_empty());
    assert!(approx(empty.total_length, 0.0));

    let single = PointData::from_points(vec![point(5.0, 5.0)]);
    assert_eq!(single.percentages, vec![0.0]);
    assert!(approx(single.total_length, 0.0));

    // Coincident points: zero total length, no NaN percentages.
    let coincident = PointData::from_points(vec![point(5.0, 5.0), point(5.0, 5.0)]);
    assert!(approx(coincident.total_length, 0.0));
    assert!(coincident.percentages.iter().all(|p| p.is_finite()));
}

#[test]
fn order_preferences_measure_net_displacement() {
    let grid = Grid::default();
    let mut blocks = BlockRegistry::new();
    let a = blocks.add(Block::new(0, 0, 1, "a")).unwrap();
    let b = blocks.add(Block::new(2, 2, 1, "b")).unwrap();
    let mut links = LinkRegistry::new();
    let id = links
        .add(Link::new(Endpoint::new(a, 0), Endpoint::new(b, 0)))
        .unwrap();

    let routes = recalculate_all_routes(&grid, &blocks, &links).unwrap();
    let prefs = routes.stored(id).unwrap().order_preferences();
    assert_eq!(prefs.horizontal, 4);
    assert_eq!(prefs.vertical, 4);
}

#[test]
fn routes_serialize_with_waypoints_and_cells() {
    let grid = Grid::default();
    let mut blocks = BlockRegistry::new();
    let a = blocks.add(Block::new(0, 0, 1, "a")).unwrap();
    let b = blocks.add(Block::new(0, 1, 1, "b")).unwrap();
    let mut links = LinkRegistry::new();
    let id = links
        .add(Link::new(Endpoint::new(a, 0), Endpoint::new(b, 0)))
        .unwrap();

    let routes = recalculate_all_routes(&grid, &blocks, &links).unwrap();
    let value = serde_json::to_value(routes.route(LinkRef::Stored(id)).unwrap()).unwrap();
    assert_eq!(value["waypoints"][0]["pos"]["col"], 0);
    assert_eq!(value["waypoints"][0]["pos"]["row"], 0);
    assert_eq!(value["waypoints"][1]["pos"]["row"], 2);
    assert_eq!(value["all_cells"].as_array().unwrap().len(), 3);
}

#[test]
fn position_lookup_interpolates_and_rejects_out_of_range() {
    let grid = Grid::default();
    let mut blocks = BlockRegistry::new();
    let a = blocks.add(Block::new(0, 0, 1, "a")).unwrap();
    let b = blocks.add(Block::new(0, 2, 1, "b")).unwrap();
    let mut links = LinkRegistry::new();
    let id = links
        .add(Link::new(Endpoint::new(a, 0), Endpoint::new(b, 0)))
        .unwrap();

    // A straight vertical drop from (30, 30) to (30, 190).
    let routes = recalculate_all_routes(&grid, &blocks, &links).unwrap();
    let route = routes.stored(id).unwrap();

    let start = route.position_at_percentage(0.0).unwrap();
    assert!(approx(start.x, 30.0) && approx(start.y, 30.0));

    let end = route.position_at_percentage(1.0).unwrap();
    assert!(approx(end.x, 30.0) && approx(end.y, 190.0));

    let mid = route.position_at_percentage(0.25).unwrap();
    assert!(approx(mid.x, 30.0) && approx(mid.y, 70.0));

    assert!(route.position_at_percentage(-0.01).is_none());
    assert!(route.position_at_percentage(1.01).is_none());
}
