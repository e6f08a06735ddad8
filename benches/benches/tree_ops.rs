// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use thicket_benches::{gen_clustered_rects, gen_grid_rects, gen_grid_rects_i64, gen_random_rects};
use thicket_bvh::{Aabb, Point2, Tree};

fn build<T: thicket_bvh::Scalar>(rects: &[Aabb<T>]) -> Tree<T, u32> {
    let mut tree = Tree::with_capacity(rects.len());
    for (i, r) in rects.iter().copied().enumerate() {
        let _ = tree.insert(r, i as u32);
    }
    tree
}

fn to_f32(r: Aabb<f64>) -> Aabb<f32> {
    let (min, max) = (r.min, r.max);
    Aabb::from_coords(min.x as f32, min.y as f32, max.x as f32, max.y as f32)
}

fn bench_insert_query_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_query_f64");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        let region = Aabb::from_xywh(100.0, 100.0, 200.0, 200.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter_batched(
                || rects.clone(),
                |rects| {
                    let tree = build(&rects);
                    black_box(tree.hits_region(region).len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_insert_query_f32(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_query_f32");
    for &n in &[64usize, 128] {
        let rects: Vec<Aabb<f32>> = gen_grid_rects(n, 10.0).into_iter().map(to_f32).collect();
        let region = Aabb::from_xywh(100.0_f32, 100.0, 200.0, 200.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("grid_n{}", n), |b| {
            b.iter_batched(
                || rects.clone(),
                |rects| {
                    let tree = build(&rects);
                    black_box(tree.hits_region(region).len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_update_heavy_i64(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_heavy_i64");
    for &n in &[64usize, 128] {
        let rects = gen_grid_rects_i64(n, 10);
        let moves = (n * n) / 10;
        group.throughput(Throughput::Elements(moves as u64));
        group.bench_function(format!("update_10pct_n{}", n), |b| {
            b.iter_batched(
                || {
                    let mut tree = Tree::with_capacity(rects.len());
                    let handles: Vec<_> = rects
                        .iter()
                        .copied()
                        .enumerate()
                        .map(|(i, r)| tree.insert(r, i as u32))
                        .collect();
                    (tree, handles)
                },
                |(mut tree, mut handles)| {
                    for (k, h) in handles.iter_mut().take(moves).enumerate() {
                        let dx = (k as i64 % 7) - 3;
                        let r = rects[k];
                        let moved = Aabb::from_coords(r.min.x + dx, r.min.y, r.max.x + dx, r.max.y);
                        if let Ok(new) = tree.update(*h, moved) {
                            *h = new;
                        }
                    }
                    black_box(tree.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_erase_all_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("erase_all_f64");
    for &count in &[1_000usize, 10_000] {
        let rects = gen_random_rects(count, 4000.0, 4000.0, 16.0, 16.0);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("random_{}", count), |b| {
            b.iter_batched(
                || {
                    let mut tree = Tree::with_capacity(rects.len());
                    let handles: Vec<_> = rects
                        .iter()
                        .copied()
                        .enumerate()
                        .map(|(i, r)| tree.insert(r, i as u32))
                        .collect();
                    (tree, handles)
                },
                |(mut tree, handles)| {
                    for h in handles {
                        let _ = black_box(tree.erase(h));
                    }
                    black_box(tree.is_empty());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_query_heavy_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_heavy_f64");
    let rects = gen_random_rects(10_000, 4000.0, 4000.0, 16.0, 16.0);
    let tree = build(&rects);
    let points: Vec<Point2<f64>> = rects.iter().step_by(10).map(|r| r.center()).collect();
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("point_queries_random_10k", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for &p in &points {
                let _ = tree.query_point(p, |_| {
                    hits += 1;
                    false
                });
            }
            black_box(hits)
        })
    });
    group.bench_function("first_hit_random_10k", |b| {
        b.iter(|| {
            let mut found = 0_usize;
            for &p in &points {
                if tree.query_point(p, |_| true) {
                    found += 1;
                }
            }
            black_box(found)
        })
    });
    group.finish();
}

fn bench_clustered_f64(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustered_f64");
    let rects = gen_clustered_rects(40, 250, 120.0);
    let region = Aabb::from_xywh(500.0, 500.0, 300.0, 300.0);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("build_query_clusters_10k", |b| {
        b.iter_batched(
            || rects.clone(),
            |rects| {
                let tree = build(&rects);
                black_box((tree.height(), tree.hits_region(region).len()));
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_query_f64,
    bench_insert_query_f32,
    bench_update_heavy_i64,
    bench_erase_all_f64,
    bench_query_heavy_f64,
    bench_clustered_f64
);
criterion_main!(benches);
