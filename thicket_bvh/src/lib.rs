// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=thicket_bvh --heading-base-level=0

//! Thicket BVH: a dynamic 2D AABB tree.
//!
//! Thicket BVH is a spatial index for editors and canvases that keep many boxes
//! which move, appear, and disappear one at a time.
//!
//! - Insert axis-aligned bounding boxes (AABBs) with user payloads and get back a
//!   stable, generational [`Handle`].
//! - Move or remove entries through their handle in expected O(log n).
//! - Query by point or overlapping region with visitors that can stop early.
//! - Walk the whole hierarchy (for debug drawing) or iterate the entries.
//!
//! It is generic over the scalar type `T` (`f32`, `f64`, `i64`) and does not depend
//! on any geometry crate; enable the `kurbo` feature for conversions to and from
//! Kurbo's `Rect` and `Point`.
//!
//! # Example
//!
//! ```rust
//! use thicket_bvh::{Aabb, Point2, Tree};
//!
//! let mut tree: Tree<f64, char> = Tree::new();
//! let a = tree.insert(Aabb::from_coords(0.0, 0.0, 1.0, 1.0), 'A');
//! let _b = tree.insert(Aabb::from_coords(2.0, 2.0, 3.0, 3.0), 'B');
//! let c = tree.insert(Aabb::from_coords(0.5, 0.5, 1.5, 1.5), 'C');
//!
//! // Everything under the cursor.
//! let mut under = Vec::new();
//! tree.query_point(Point2::new(0.75, 0.75), |leaf| {
//!     under.push(*leaf.payload);
//!     false
//! });
//! under.sort();
//! assert_eq!(under, ['A', 'C']);
//!
//! // Moving an entry hands out a new handle; the old one is now stale.
//! let c = tree.update(c, Aabb::from_coords(10.0, 10.0, 11.0, 11.0)).unwrap();
//! assert_eq!(tree.hits_point(Point2::new(10.5, 10.5)), [c]);
//!
//! assert_eq!(tree.erase(a), Ok('A'));
//! assert!(tree.erase(a).is_err());
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! ## How entries are placed
//!
//! Every entry is a leaf and every branch has exactly two children whose boxes it
//! bounds exactly. A new leaf is paired with the node that minimizes the area it
//! adds along the path to the root; a branch-and-bound search skips subtrees that
//! cannot beat the best candidate found so far. Removing a leaf collapses its
//! parent and refits the boxes above.
//!
//! The tree is never rebalanced. Adversarial insertion orders (for example,
//! boxes that each contain all previous ones) degrade it towards a list; queries
//! stay correct but slow down.
//!
//! ## Handles
//!
//! [`Tree::update`] is an erase followed by an insert, so it returns a new
//! [`Handle`]. Handles carry a generation: using a stale one makes
//! [`Tree::erase`]/[`Tree::update`] return [`Error::StaleHandle`] and the accessors
//! return `None`.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates. Area costs use
//! widened accumulators (`f32`→`f64`, `i64`→`i128`).
//!
//! This crate is `no_std` and uses `alloc`. Logging goes through `tracing`; no
//! subscriber is installed.

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod error;
pub mod iter;
#[cfg(feature = "kurbo")]
pub mod kurbo_interop;
pub mod query;
pub mod tree;
pub mod types;

pub use error::Error;
pub use iter::Iter;
pub use tree::{Handle, LeafRef, Tree};
pub use types::{Aabb, Point2, Scalar};
