// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point and region queries, and whole-tree traversal.
//!
//! Visitors return `true` to stop early. Each call owns its traversal stack, so a
//! visitor may run further queries against the same tree.

use alloc::vec;
use alloc::vec::Vec;

use crate::tree::{Handle, Kind, LeafRef, Tree};
use crate::types::{Aabb, Point2, Scalar};

impl<T: Scalar, P> Tree<T, P> {
    /// Visit every entry whose box contains `point` (edges included).
    ///
    /// Returns `true` if the visitor asked to stop, `false` once all matching
    /// entries were visited. Visit order is unspecified.
    ///
    /// ```
    /// use thicket_bvh::{Aabb, Point2, Tree};
    ///
    /// let mut tree: Tree<f64, &str> = Tree::new();
    /// tree.insert(Aabb::from_coords(0.0, 0.0, 2.0, 2.0), "wire");
    /// tree.insert(Aabb::from_coords(1.0, 1.0, 3.0, 3.0), "gate");
    ///
    /// // Stop at the first gate under the cursor.
    /// let found = tree.query_point(Point2::new(1.5, 1.5), |leaf| *leaf.payload == "gate");
    /// assert!(found);
    /// ```
    pub fn query_point<'a, F>(&'a self, point: Point2<T>, visitor: F) -> bool
    where
        F: FnMut(LeafRef<'a, T, P>) -> bool,
    {
        self.query_by(|aabb| aabb.contains_point(point), visitor)
    }

    /// Visit every entry whose box overlaps `region` (touching counts).
    ///
    /// Returns `true` if the visitor asked to stop, `false` once all matching
    /// entries were visited. Visit order is unspecified.
    pub fn query_region<'a, F>(&'a self, region: Aabb<T>, visitor: F) -> bool
    where
        F: FnMut(LeafRef<'a, T, P>) -> bool,
    {
        self.query_by(|aabb| aabb.overlaps(&region), visitor)
    }

    /// Handles of all entries containing `point`.
    pub fn hits_point(&self, point: Point2<T>) -> Vec<Handle> {
        let mut out = Vec::new();
        let _ = self.query_point(point, |leaf| {
            out.push(leaf.handle);
            false
        });
        out
    }

    /// Handles of all entries overlapping `region`.
    pub fn hits_region(&self, region: Aabb<T>) -> Vec<Handle> {
        let mut out = Vec::new();
        let _ = self.query_region(region, |leaf| {
            out.push(leaf.handle);
            false
        });
        out
    }

    /// Walk all nodes top-down, branches included.
    ///
    /// The visitor receives each node's box and depth (the root is level 0). When it
    /// returns `true` for a branch, both children are visited next; returning
    /// `false` prunes that subtree. Children are visited left before right.
    ///
    /// Useful for drawing the hierarchy while debugging:
    ///
    /// ```
    /// use thicket_bvh::{Aabb, Tree};
    ///
    /// let tree: Tree<i64, ()> = [
    ///     (Aabb::from_coords(0, 0, 1, 1), ()),
    ///     (Aabb::from_coords(4, 4, 5, 5), ()),
    /// ]
    /// .into_iter()
    /// .collect();
    /// let mut levels = Vec::new();
    /// tree.traverse(|_aabb, level| {
    ///     levels.push(level);
    ///     true
    /// });
    /// assert_eq!(levels, [0, 1, 1]);
    /// ```
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&Aabb<T>, usize) -> bool,
    {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![(root, 0_usize)];
        while let Some((idx, level)) = stack.pop() {
            let node = self.node(idx);
            if visitor(&node.aabb, level)
                && let Kind::Branch { left, right } = node.kind
            {
                stack.push((right, level + 1));
                stack.push((left, level + 1));
            }
        }
    }

    fn query_by<'a, H, F>(&'a self, hit: H, mut visitor: F) -> bool
    where
        H: Fn(&Aabb<T>) -> bool,
        F: FnMut(LeafRef<'a, T, P>) -> bool,
    {
        let Some(root) = self.root else {
            return false;
        };
        if !hit(&self.node(root).aabb) {
            return false;
        }
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            match self.node(idx).kind {
                Kind::Leaf(_) => {
                    if visitor(self.leaf_ref(idx)) {
                        return true;
                    }
                }
                Kind::Branch { left, right } => {
                    for child in [right, left] {
                        if hit(&self.node(child).aabb) {
                            stack.push(child);
                        }
                    }
                }
            }
        }
        false
    }
}
