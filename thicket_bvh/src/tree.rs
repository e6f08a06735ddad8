// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: node arena, handles, insertion and removal.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use tracing::{debug, trace};

use crate::error::Error;
use crate::types::{Aabb, Scalar, ScalarAcc};

/// Handle to one entry (leaf) of a [`Tree`].
///
/// This is a small, copyable handle returned by [`Tree::insert`] and consumed by
/// [`Tree::erase`], [`Tree::update`] and the accessors. It consists of a slot
/// index and a generation counter.
///
/// ## Semantics
///
/// - A handle stays valid while its entry is alive, regardless of what happens to
///   other entries.
/// - [`Tree::erase`], [`Tree::update`] and [`Tree::clear`] make the handle stale.
///   `update` returns a fresh handle for the relocated entry.
/// - Every reuse of a slot increments its generation, so a stale handle never
///   aliases a different live entry of the same tree.
///
/// Handles are not tagged with their tree; passing a handle to a different tree is
/// a logic error that may resolve to an unrelated entry.
///
/// ## Limits
///
/// - Slot indices are 32 bits wide. Storing an entry in a slot beyond `u32::MAX`
///   panics instead of truncating its index.
/// - A slot whose generation reaches `u32::MAX` is retired instead of reused, so
///   generations never wrap. Retired slots stay allocated until the tree is dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Handle(u32, u32);

impl Handle {
    fn new(idx: usize, generation: u32) -> Self {
        let idx = u32::try_from(idx).expect("node arena exceeds u32::MAX slots");
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

/// Arena index of a node (leaf or branch).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

pub(crate) enum Kind<P> {
    Leaf(P),
    Branch { left: NodeIdx, right: NodeIdx },
}

pub(crate) struct Node<T, P> {
    pub(crate) aabb: Aabb<T>,
    /// Back-link used for refitting and removal; `None` only at the root.
    pub(crate) parent: Option<NodeIdx>,
    pub(crate) kind: Kind<P>,
}

/// Borrowed view of one entry, handed to query visitors and yielded by [`Tree::iter`].
#[derive(Debug)]
pub struct LeafRef<'a, T, P> {
    /// Handle of the entry.
    pub handle: Handle,
    /// The entry's bounding box.
    pub aabb: &'a Aabb<T>,
    /// The entry's payload.
    pub payload: &'a P,
}

impl<T, P> Clone for LeafRef<'_, T, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, P> Copy for LeafRef<'_, T, P> {}

/// A dynamic bounding volume hierarchy over 2D AABBs.
///
/// Every entry is a leaf; every branch has exactly two children and a box equal to
/// the union of theirs. New leaves are paired with the sibling that minimizes the
/// total growth of ancestor areas, found by a pruned branch-and-bound search.
///
/// The tree is single-threaded: mutation takes `&mut self` and there is no internal
/// synchronization. Queries take `&self`, allocate their own traversal stacks and
/// may be nested inside each other's visitors.
pub struct Tree<T: Scalar, P> {
    /// Node slots; `None` when free.
    pub(crate) nodes: Vec<Option<Node<T, P>>>,
    /// Last generation per slot. Persists across frees.
    generations: Vec<u32>,
    free_list: Vec<usize>,
    /// Slots whose generation is exhausted; never handed out again.
    retired: usize,
    pub(crate) root: Option<NodeIdx>,
    count: usize,
}

impl<T: Scalar, P> Default for Tree<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P> Debug for Tree<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.count)
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.node_count())
            .field("free_list", &self.free_list.len())
            .field("retired", &self.retired)
            .field("bounds", &self.bounds())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P> Tree<T, P> {
    /// Create an empty tree.
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            retired: 0,
            root: None,
            count: 0,
        }
    }

    /// Create an empty tree with room for `n` entries before reallocating.
    pub fn with_capacity(n: usize) -> Self {
        let mut tree = Self::new();
        tree.reserve(n);
        tree
    }

    /// Reserve space for at least `n` more entries.
    ///
    /// Each entry beyond the first also needs one branch node, so this reserves
    /// `2 * n` node slots.
    pub fn reserve(&mut self, n: usize) {
        let slots = n.saturating_mul(2);
        self.nodes.reserve(slots);
        self.generations.reserve(slots);
    }

    /// Number of entries (leaves) in the tree.
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Whether the tree has no entries.
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of live nodes, leaves and branches together.
    ///
    /// This is `2 * len() - 1` for a non-empty tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len() - self.retired
    }

    /// Union of all entry boxes, or `None` when the tree is empty.
    pub fn bounds(&self) -> Option<Aabb<T>> {
        self.root.map(|root| self.node(root).aabb)
    }

    /// Number of levels: 0 for an empty tree, 1 for a single entry.
    pub fn height(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut height = 0;
        let mut stack = vec![(root, 1_usize)];
        while let Some((idx, level)) = stack.pop() {
            height = height.max(level);
            if let Kind::Branch { left, right } = self.node(idx).kind {
                stack.push((left, level + 1));
                stack.push((right, level + 1));
            }
        }
        height
    }

    /// Returns true if `handle` refers to a live entry.
    pub fn contains(&self, handle: Handle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Payload of a live entry.
    pub fn get(&self, handle: Handle) -> Option<&P> {
        let idx = self.resolve(handle)?;
        match &self.node(idx).kind {
            Kind::Leaf(payload) => Some(payload),
            Kind::Branch { .. } => None,
        }
    }

    /// Mutable payload of a live entry. The entry's box cannot be changed this way;
    /// use [`Tree::update`].
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut P> {
        let idx = self.resolve(handle)?;
        match &mut self.node_mut(idx).kind {
            Kind::Leaf(payload) => Some(payload),
            Kind::Branch { .. } => None,
        }
    }

    /// Bounding box of a live entry.
    pub fn aabb(&self, handle: Handle) -> Option<Aabb<T>> {
        self.resolve(handle).map(|idx| self.node(idx).aabb)
    }

    /// Insert an entry and return its handle.
    ///
    /// The new leaf is paired with the existing node whose union with `aabb` adds
    /// the least total area along its ancestor chain. A new branch takes the
    /// sibling's place, and the ancestors above it are refit.
    ///
    /// ```
    /// use thicket_bvh::{Aabb, Point2, Tree};
    ///
    /// let mut tree: Tree<f64, &str> = Tree::new();
    /// let h = tree.insert(Aabb::from_coords(0.0, 0.0, 1.0, 1.0), "a");
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.get(h), Some(&"a"));
    /// assert_eq!(tree.hits_point(Point2::new(0.5, 0.5)), vec![h]);
    /// ```
    pub fn insert(&mut self, aabb: Aabb<T>, payload: P) -> Handle {
        let leaf = self.alloc(Node {
            aabb,
            parent: None,
            kind: Kind::Leaf(payload),
        });
        self.count += 1;

        let Some(root) = self.root else {
            self.root = Some(leaf);
            return self.handle_of(leaf);
        };

        let sibling = self.find_best_sibling(root, &aabb);
        let old_parent = self.node(sibling).parent;
        let branch_aabb = self.node(sibling).aabb.union(&aabb);
        let branch = self.alloc(Node {
            aabb: branch_aabb,
            parent: old_parent,
            kind: Kind::Branch {
                left: sibling,
                right: leaf,
            },
        });
        self.node_mut(sibling).parent = Some(branch);
        self.node_mut(leaf).parent = Some(branch);

        match old_parent {
            None => self.root = Some(branch),
            Some(parent) => {
                self.replace_child(parent, sibling, branch);
                self.refit(parent);
            }
        }
        self.handle_of(leaf)
    }

    /// Remove an entry and return its payload.
    ///
    /// The leaf's parent branch is collapsed: the sibling takes the parent's place
    /// and the ancestors above it are refit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleHandle`] if `handle` does not refer to a live entry.
    pub fn erase(&mut self, handle: Handle) -> Result<P, Error> {
        let leaf = self.resolve_or_stale(handle, "erase")?;
        Ok(self.remove_leaf(leaf))
    }

    /// Move an entry to a new box, returning the entry's new handle.
    ///
    /// This erases the leaf and re-inserts its payload, so the old handle becomes
    /// stale and the best sibling is searched afresh. Callers must keep the
    /// returned handle.
    ///
    /// ```
    /// use thicket_bvh::{Aabb, Point2, Tree};
    ///
    /// let mut tree: Tree<i64, u32> = Tree::new();
    /// let old = tree.insert(Aabb::from_coords(0, 0, 10, 10), 7);
    /// let new = tree.update(old, Aabb::from_coords(100, 100, 110, 110)).unwrap();
    /// assert!(!tree.contains(old));
    /// assert_eq!(tree.get(new), Some(&7));
    /// assert!(tree.hits_point(Point2::new(5, 5)).is_empty());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleHandle`] if `handle` does not refer to a live entry;
    /// the tree is left unchanged.
    pub fn update(&mut self, handle: Handle, aabb: Aabb<T>) -> Result<Handle, Error> {
        let leaf = self.resolve_or_stale(handle, "update")?;
        let payload = self.remove_leaf(leaf);
        Ok(self.insert(aabb, payload))
    }

    /// Remove every entry. All outstanding handles become stale.
    ///
    /// Nodes are released through an explicit stack, so clearing a deep tree does
    /// not recurse.
    pub fn clear(&mut self) {
        trace!(entries = self.count, "clearing tree");
        let mut stack: Vec<NodeIdx> = self.root.take().into_iter().collect();
        while let Some(idx) = stack.pop() {
            let node = self.release(idx);
            if let Kind::Branch { left, right } = node.kind {
                stack.push(left);
                stack.push(right);
            }
        }
        self.count = 0;
    }

    // --- internals ---

    pub(crate) fn node(&self, idx: NodeIdx) -> &Node<T, P> {
        self.nodes[idx.get()].as_ref().expect("dangling node index")
    }

    fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<T, P> {
        self.nodes[idx.get()].as_mut().expect("dangling node index")
    }

    pub(crate) fn children(&self, idx: NodeIdx) -> (NodeIdx, NodeIdx) {
        match self.node(idx).kind {
            Kind::Branch { left, right } => (left, right),
            Kind::Leaf(_) => unreachable!("parent link points at a leaf"),
        }
    }

    pub(crate) fn handle_of(&self, idx: NodeIdx) -> Handle {
        Handle::new(idx.get(), self.generations[idx.get()])
    }

    pub(crate) fn leaf_ref(&self, idx: NodeIdx) -> LeafRef<'_, T, P> {
        let node = self.node(idx);
        match &node.kind {
            Kind::Leaf(payload) => LeafRef {
                handle: self.handle_of(idx),
                aabb: &node.aabb,
                payload,
            },
            Kind::Branch { .. } => unreachable!("leaf view of a branch"),
        }
    }

    /// Map a handle to its leaf, if the slot is occupied by the same generation.
    fn resolve(&self, handle: Handle) -> Option<NodeIdx> {
        let idx = handle.idx();
        let node = self.nodes.get(idx)?.as_ref()?;
        if self.generations[idx] != handle.generation() || !matches!(node.kind, Kind::Leaf(_)) {
            return None;
        }
        Some(NodeIdx::new(idx))
    }

    fn resolve_or_stale(&self, handle: Handle, op: &'static str) -> Result<NodeIdx, Error> {
        self.resolve(handle).ok_or_else(|| {
            debug!(?handle, op, "rejected stale handle");
            Error::StaleHandle(handle)
        })
    }

    fn alloc(&mut self, node: Node<T, P>) -> NodeIdx {
        if let Some(idx) = self.free_list.pop() {
            self.generations[idx] += 1;
            self.nodes[idx] = Some(node);
            NodeIdx::new(idx)
        } else {
            self.nodes.push(Some(node));
            self.generations.push(1);
            NodeIdx::new(self.nodes.len() - 1)
        }
    }

    fn release(&mut self, idx: NodeIdx) -> Node<T, P> {
        let node = self.nodes[idx.get()]
            .take()
            .expect("released a vacant node slot");
        if self.generations[idx.get()] == u32::MAX {
            trace!(slot = idx.get(), "retiring slot with exhausted generation");
            self.retired += 1;
        } else {
            self.free_list.push(idx.get());
        }
        node
    }

    /// Branch-and-bound search for the node to pair a new leaf with.
    ///
    /// The cost of choosing a node is the area of its union with the new box plus
    /// the growth this causes in every ancestor. A subtree is skipped once even a
    /// zero-growth descendant could not beat the best cost found so far.
    fn find_best_sibling(&self, root: NodeIdx, aabb: &Aabb<T>) -> NodeIdx {
        let leaf_area = aabb.area();
        let mut best = root;
        let mut best_cost = self.node(root).aabb.union(aabb).area();
        let mut stack: Vec<(NodeIdx, ScalarAcc<T>)> = vec![(root, T::widen(T::zero()))];
        while let Some((idx, inherited)) = stack.pop() {
            let node = self.node(idx);
            let direct = node.aabb.union(aabb).area();
            let total = direct + inherited;
            if total < best_cost {
                best_cost = total;
                best = idx;
            }
            let inherited = inherited + (direct - node.aabb.area());
            let lower_bound = leaf_area + inherited;
            if lower_bound < best_cost
                && let Kind::Branch { left, right } = node.kind
            {
                stack.push((left, inherited));
                stack.push((right, inherited));
            }
        }
        best
    }

    fn replace_child(&mut self, parent: NodeIdx, old: NodeIdx, new: NodeIdx) {
        let Kind::Branch { left, right } = &mut self.node_mut(parent).kind else {
            unreachable!("parent link points at a leaf");
        };
        if *left == old {
            *left = new;
        } else {
            debug_assert_eq!(*right, old, "child is not linked under its parent");
            *right = new;
        }
    }

    /// Recompute branch boxes from `start` up to the root.
    fn refit(&mut self, start: NodeIdx) {
        let mut cursor = Some(start);
        while let Some(idx) = cursor {
            let (left, right) = self.children(idx);
            let aabb = self.node(left).aabb.union(&self.node(right).aabb);
            let node = self.node_mut(idx);
            node.aabb = aabb;
            cursor = node.parent;
        }
    }

    fn remove_leaf(&mut self, leaf: NodeIdx) -> P {
        let parent = self.node(leaf).parent;
        match parent {
            None => self.root = None,
            Some(parent) => {
                let (left, right) = self.children(parent);
                let sibling = if left == leaf { right } else { left };
                let grandparent = self.release(parent).parent;
                self.node_mut(sibling).parent = grandparent;
                match grandparent {
                    None => {
                        trace!("sibling promoted to root");
                        self.root = Some(sibling);
                    }
                    Some(grandparent) => {
                        self.replace_child(grandparent, parent, sibling);
                        self.refit(grandparent);
                    }
                }
            }
        }
        self.count -= 1;
        match self.release(leaf).kind {
            Kind::Leaf(payload) => payload,
            Kind::Branch { .. } => unreachable!("handle resolved to a branch"),
        }
    }

    /// Check every structural invariant, panicking with a description on failure.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let Some(root) = self.root else {
            assert_eq!(self.count, 0, "empty tree must have no entries");
            assert_eq!(self.node_count(), 0, "empty tree must have no nodes");
            return;
        };
        assert_eq!(self.node(root).parent, None, "root must not have a parent");
        let mut leaves = 0;
        let mut nodes = 0;
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            nodes += 1;
            let node = self.node(idx);
            match node.kind {
                Kind::Leaf(_) => leaves += 1,
                Kind::Branch { left, right } => {
                    for child in [left, right] {
                        assert_eq!(self.node(child).parent, Some(idx), "broken parent link");
                        stack.push(child);
                    }
                    let union = self.node(left).aabb.union(&self.node(right).aabb);
                    assert_eq!(node.aabb, union, "branch box must equal union of children");
                }
            }
        }
        assert_eq!(leaves, self.count, "len() must equal number of leaves");
        assert_eq!(nodes, 2 * leaves - 1, "a full binary tree has 2n - 1 nodes");
        assert_eq!(
            nodes,
            self.node_count(),
            "unreachable live nodes in the arena"
        );
    }
}

impl<T: Scalar, P> Extend<(Aabb<T>, P)> for Tree<T, P> {
    /// Insert every pair. Handles are discarded; entries remain reachable through
    /// queries and iteration.
    fn extend<I: IntoIterator<Item = (Aabb<T>, P)>>(&mut self, iter: I) {
        for (aabb, payload) in iter {
            let _ = self.insert(aabb, payload);
        }
    }
}

impl<T: Scalar, P> FromIterator<(Aabb<T>, P)> for Tree<T, P> {
    fn from_iter<I: IntoIterator<Item = (Aabb<T>, P)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
