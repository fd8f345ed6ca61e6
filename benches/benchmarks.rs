use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quadtree::{Quadtree, Rect};
use rand::prelude::*;

const WORLD: i32 = 10000;

fn random_rect(rng: &mut StdRng) -> Rect {
    let width = rng.gen_range(1..=10);
    let height = rng.gen_range(1..=10);
    Rect::new(
        rng.gen_range(0..WORLD - width),
        rng.gen_range(0..WORLD - height),
        width,
        height,
    )
}

fn filled_tree(rng: &mut StdRng, count: usize) -> (Quadtree<Rect>, Vec<Rect>) {
    let mut quadtree = Quadtree::new(6, Rect::new(0, 0, WORLD, WORLD)).unwrap();
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        let shape = random_rect(rng);
        quadtree.insert(shape).unwrap();
        items.push(shape);
    }
    (quadtree, items)
}

fn insert_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(1);
    let mut quadtree = Quadtree::new(6, Rect::new(0, 0, WORLD, WORLD)).unwrap();

    c.bench_function("quadtree_insert", |b| {
        b.iter(|| {
            let shape = random_rect(&mut rng);
            quadtree.insert(black_box(shape)).unwrap();
        })
    });
}

fn locate_remove_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(2);
    let (mut quadtree, items) = filled_tree(&mut rng, 10000);

    c.bench_function("quadtree_locate_remove_reinsert", |b| {
        b.iter(|| {
            let shape = items[rng.gen_range(0..items.len())];
            if let Some(locator) = quadtree.find_locator(black_box(&shape)) {
                quadtree.remove_at(&shape, locator);
            }
            quadtree.insert(shape).unwrap();
        })
    });
}

fn query_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let (quadtree, _) = filled_tree(&mut rng, 10000);
    let mut out = Vec::new();

    c.bench_function("quadtree_query_intersecting", |b| {
        b.iter(|| {
            let x = rng.gen_range(0..WORLD - 200);
            let y = rng.gen_range(0..WORLD - 200);
            out.clear();
            quadtree.query_intersecting_into(black_box(Rect::new(x, y, 200, 200)), &mut out);
            black_box(out.len());
        })
    });
}

fn iterate_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(4);
    let (quadtree, _) = filled_tree(&mut rng, 10000);

    c.bench_function("quadtree_iterate", |b| {
        b.iter(|| black_box(quadtree.iter().count()))
    });
}

criterion_group!(
    benches,
    insert_benchmark,
    locate_remove_benchmark,
    query_benchmark,
    iterate_benchmark
);
criterion_main!(benches);
