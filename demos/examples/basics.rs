// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insert, query, move and erase a handful of boxes.
//!
//! Run:
//! - `cargo run -p thicket_demos --example basics`
//! - `RUST_LOG=thicket_bvh=trace cargo run -p thicket_demos --example basics`

use thicket_bvh::{Aabb, Point2, Tree};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree: Tree<f64, char> = Tree::new();
    let a = tree.insert(Aabb::from_coords(0.0, 0.0, 1.0, 1.0), 'A');
    let b = tree.insert(Aabb::from_coords(2.0, 2.0, 3.0, 3.0), 'B');
    let c = tree.insert(Aabb::from_coords(0.5, 0.5, 1.5, 1.5), 'C');
    println!(
        "3 entries, height {}, bounds {:?}",
        tree.height(),
        tree.bounds()
    );

    let hits: Vec<char> = tree
        .hits_point(Point2::new(0.75, 0.75))
        .into_iter()
        .filter_map(|h| tree.get(h).copied())
        .collect();
    println!("under (0.75, 0.75): {hits:?}");

    let region = Aabb::from_coords(1.0, 1.0, 2.0, 2.0);
    let hits: Vec<char> = tree
        .hits_region(region)
        .into_iter()
        .filter_map(|h| tree.get(h).copied())
        .collect();
    println!("touching {region:?}: {hits:?}");

    let c = match tree.update(c, Aabb::from_coords(10.0, 10.0, 11.0, 11.0)) {
        Ok(h) => h,
        Err(err) => {
            eprintln!("update failed: {err}");
            return;
        }
    };
    println!("moved C -> {c:?}, bounds {:?}", tree.bounds());

    println!("erase A: {:?}", tree.erase(a));
    // A second erase through the same handle is rejected.
    println!("erase A again: {:?}", tree.erase(a));

    for leaf in &tree {
        println!("  {:?} {} {:?}", leaf.handle, leaf.payload, leaf.aabb);
    }

    tree.clear();
    println!(
        "after clear: len {}, B live {}",
        tree.len(),
        tree.contains(b)
    );
}
