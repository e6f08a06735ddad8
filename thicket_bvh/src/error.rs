// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by handle-taking tree operations.

use crate::tree::Handle;

/// Errors returned by [`Tree::erase`](crate::Tree::erase) and [`Tree::update`](crate::Tree::update).
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The handle no longer refers to a live leaf: it was erased, replaced by an
    /// update, or dropped by a clear.
    #[error("stale handle {0:?}")]
    StaleHandle(Handle),
}
