use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use pipefish::{Block, BlockRegistry, Endpoint, Grid, Link, LinkRegistry, recalculate_all_routes};

struct Scene {
    grid: Grid,
    blocks: BlockRegistry,
    links: LinkRegistry,
}

/// A dense editor scene: blocks in every corner of the board plus a wide one,
/// with links fanning in all directions and converging on shared columns.
fn dense_scene() -> Scene {
    let grid = Grid::default();
    let mut blocks = BlockRegistry::new();
    let ids = [
        blocks.add(Block::new(0, 0, 1, "in-a")).unwrap(),
        blocks.add(Block::new(2, 0, 1, "in-b")).unwrap(),
        blocks.add(Block::new(1, 1, 2, "filter")).unwrap(),
        blocks.add(Block::new(0, 2, 1, "scale")).unwrap(),
        blocks.add(Block::new(3, 2, 1, "invert")).unwrap(),
        blocks.add(Block::new(1, 3, 1, "out-a")).unwrap(),
        blocks.add(Block::new(3, 3, 1, "out-b")).unwrap(),
    ];

    let mut links = LinkRegistry::new();
    let endpoints = [
        (ids[0], 0, ids[2], 0),
        (ids[1], 0, ids[2], 1),
        (ids[2], 0, ids[3], 0),
        (ids[2], 1, ids[4], 0),
        (ids[3], 0, ids[5], 0),
        (ids[4], 0, ids[6], 0),
        (ids[0], 0, ids[3], 0),
        (ids[1], 0, ids[4], 0),
        (ids[5], 0, ids[0], 0),
        (ids[6], 0, ids[1], 0),
    ];
    for (source, source_item, dest, dest_item) in endpoints {
        links
            .add(Link::new(
                Endpoint::new(source, source_item),
                Endpoint::new(dest, dest_item),
            ))
            .unwrap();
    }

    Scene {
        grid,
        blocks,
        links,
    }
}

fn bench_recalculate(c: &mut Criterion) {
    let scene = dense_scene();
    c.bench_function("recalculate_all_routes/dense", |b| {
        b.iter(|| {
            recalculate_all_routes(
                black_box(&scene.grid),
                black_box(&scene.blocks),
                black_box(&scene.links),
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_recalculate);
criterion_main!(benches);
