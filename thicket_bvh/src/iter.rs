// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-order iteration over the entries of a [`Tree`].

use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::tree::{Kind, LeafRef, NodeIdx, Tree};
use crate::types::Scalar;

/// Iterator over all entries of a [`Tree`], leftmost leaf first.
///
/// The order follows the tree's shape, not space: it is stable between mutations
/// but entries that are close together may be far apart in the sequence.
///
/// Created by [`Tree::iter`].
pub struct Iter<'a, T: Scalar, P> {
    tree: &'a Tree<T, P>,
    next: Option<NodeIdx>,
    remaining: usize,
}

impl<T: Scalar, P> Debug for Iter<'_, T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

impl<'a, T: Scalar, P> Iterator for Iter<'a, T, P> {
    type Item = LeafRef<'a, T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.successor(current);
        self.remaining -= 1;
        Some(self.tree.leaf_ref(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Scalar, P> ExactSizeIterator for Iter<'_, T, P> {}

impl<T: Scalar, P> FusedIterator for Iter<'_, T, P> {}

impl<'a, T: Scalar, P> IntoIterator for &'a Tree<T, P> {
    type Item = LeafRef<'a, T, P>;
    type IntoIter = Iter<'a, T, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Scalar, P> Tree<T, P> {
    /// Iterate over all entries, leftmost leaf first.
    ///
    /// ```
    /// use thicket_bvh::{Aabb, Tree};
    ///
    /// let mut tree: Tree<i64, u32> = Tree::new();
    /// for i in 0..4 {
    ///     tree.insert(Aabb::from_xywh(i * 10, 0, 5, 5), i as u32);
    /// }
    /// let mut seen: Vec<u32> = tree.iter().map(|leaf| *leaf.payload).collect();
    /// seen.sort();
    /// assert_eq!(seen, [0, 1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T, P> {
        Iter {
            tree: self,
            next: self.root.map(|root| self.leftmost_leaf(root)),
            remaining: self.len(),
        }
    }

    fn leftmost_leaf(&self, mut idx: NodeIdx) -> NodeIdx {
        while let Kind::Branch { left, .. } = self.node(idx).kind {
            idx = left;
        }
        idx
    }

    /// The leaf after `idx`: climb until arriving from a left child, then take the
    /// leftmost leaf of that parent's right subtree.
    fn successor(&self, mut idx: NodeIdx) -> Option<NodeIdx> {
        loop {
            let parent = self.node(idx).parent?;
            let (left, right) = self.children(parent);
            if left == idx {
                return Some(self.leftmost_leaf(right));
            }
            idx = parent;
        }
    }
}
