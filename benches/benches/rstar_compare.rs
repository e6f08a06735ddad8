// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use thicket_benches::{gen_grid_rects, gen_random_rects};
use thicket_bvh::{Aabb, Tree};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn to_rstar_rects(v: &[Aabb<f64>]) -> Vec<Rectangle<[f64; 2]>> {
    v.iter()
        .map(|r| Rectangle::from_corners([r.min.x, r.min.y], [r.max.x, r.max.y]))
        .collect()
}

fn bench_build_query_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_compare_build_query_f64");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let region = Aabb::from_xywh(100.0, 100.0, 400.0, 400.0);
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("thicket_build_query_n{}", n), |b| {
            b.iter_batched(
                Tree::<f64, u32>::new,
                |mut tree| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = tree.insert(r, i as u32);
                    }
                    black_box(tree.hits_region(region).len());
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_build_query_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let mut tree = RTree::new();
                    for r in rectangles {
                        tree.insert(r);
                    }
                    let aabb = AABB::from_corners(
                        [region.min.x, region.min.y],
                        [region.max.x, region.max.y],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("rstar_bulk_build_query_n{}", n), |b| {
            b.iter_batched(
                || to_rstar_rects(&rects),
                |rectangles| {
                    let tree = RTree::bulk_load(rectangles);
                    let aabb = AABB::from_corners(
                        [region.min.x, region.min.y],
                        [region.max.x, region.max.y],
                    );
                    let hits: usize = tree.locate_in_envelope_intersecting(&aabb).count();
                    black_box(hits);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_churn_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("rstar_compare_churn_f64");
    let rects = gen_random_rects(5_000, 2000.0, 2000.0, 10.0, 10.0);
    let moves = rects.len() / 5;
    group.throughput(Throughput::Elements(moves as u64));

    group.bench_function("thicket_move_20pct", |b| {
        b.iter_batched(
            || {
                let mut tree = Tree::<f64, u32>::with_capacity(rects.len());
                let handles: Vec<_> = rects
                    .iter()
                    .copied()
                    .enumerate()
                    .map(|(i, r)| tree.insert(r, i as u32))
                    .collect();
                (tree, handles)
            },
            |(mut tree, handles)| {
                for (k, h) in handles.into_iter().take(moves).enumerate() {
                    let r = rects[k];
                    let moved = Aabb::from_coords(r.min.x + 3.0, r.min.y, r.max.x + 3.0, r.max.y);
                    let _ = black_box(tree.update(h, moved));
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("rstar_move_20pct", |b| {
        b.iter_batched(
            || RTree::bulk_load(to_rstar_rects(&rects)),
            |mut tree| {
                for r in rects.iter().take(moves) {
                    let old = Rectangle::from_corners([r.min.x, r.min.y], [r.max.x, r.max.y]);
                    let _ = tree.remove(&old);
                    tree.insert(Rectangle::from_corners(
                        [r.min.x + 3.0, r.min.y],
                        [r.max.x + 3.0, r.max.y],
                    ));
                }
                black_box(tree.size());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_build_query_f64, bench_churn_f64);
criterion_main!(benches);
