//! The edge store (spec §4.B): down-edges as a dense, append-only CSR matrix, up-edges as a
//! singly-linked list through the shared pool.
//!
//! Down-edge rows are built once and never mutated in place: auxiliary rows are written whole
//! at init from the auxiliary mapping, and check rows are written whole at ingest already
//! containing only the unsolved neighbours (spec §4.G step 4 folds the "compact to `U`" step
//! into construction instead of mutating an array after the fact). Node ids are assigned in
//! the same strictly-increasing order the rows are pushed in, so a [`oc_utils_indexing::CsrMatrix`]
//! keyed by [`NodeId`] is a precise fit.
//!
//! Up-edges go the other way: a node accumulates dependents one at a time as check blocks
//! arrive, and a single dependent is removed in isolation when its propagating edge is spent.
//! That access pattern wants a linked list, not a dense array, so up-edges are a singly-linked
//! list of cells drawn from the shared [`PoolHandle`].

use alloc::vec::Vec;

use oc_utils_indexing::{CsrMatrix, IndexVec};

use crate::{
    error::{invariant, AllocError},
    ids::NodeId,
    pool::{CellId, PoolHandle},
};

/// Down-edges: for each non-message node, the (frozen) set of lower-id neighbours.
pub(crate) struct DownEdges {
    rows: CsrMatrix<NodeId, NodeId>,
}

impl DownEdges {
    pub(crate) fn with_capacity(rows: usize, data: usize) -> Self {
        Self { rows: CsrMatrix::with_capacity(rows, data) }
    }

    /// Appends the next row. Caller must push rows in strict node-id order starting at 0; this
    /// mirrors the fact that node ids themselves are assigned in that same order (message,
    /// then auxiliary, then check as each arrives). Fails with [`AllocError`] (spec §7) once the
    /// backing row array has reached its `u32::MAX` row limit.
    pub(crate) fn push_row(
        &mut self,
        neighbours: impl IntoIterator<Item = NodeId>,
    ) -> Result<NodeId, AllocError> {
        self.rows.push_row(neighbours).map_err(|_| AllocError)
    }

    pub(crate) fn row(&self, node: NodeId) -> &[NodeId] {
        self.rows.row(node).unwrap_or_else(|| panic!("down-edges queried before row was pushed"))
    }

    pub(crate) fn num_rows(&self) -> usize {
        self.rows.num_rows()
    }
}

/// Up-edges: for each node, a singly-linked list (through the shared pool) of higher-id
/// neighbours that still depend on it.
pub(crate) struct UpEdges {
    heads: IndexVec<NodeId, Option<CellId>>,
}

impl UpEdges {
    pub(crate) fn with_capacity(n: usize) -> Self {
        let mut heads = IndexVec::with_capacity(n);
        for _ in 0..n {
            heads.push(None).expect("node space fits in u32");
        }
        Self { heads }
    }

    fn ensure_len(&mut self, upto: NodeId) {
        while self.heads.len() <= u32::from(upto) as usize {
            self.heads.push(None).expect("node space fits in u32");
        }
    }

    /// Adds an up-edge for the pair `(high, low)`: records that `high` depends on `low`. Fails
    /// with [`AllocError`] (spec §7) if the shared cell pool cannot produce a cell.
    pub(crate) fn add(
        &mut self,
        pool: &PoolHandle,
        low: NodeId,
        high: NodeId,
    ) -> Result<(), AllocError> {
        self.ensure_len(low);
        let head = self.heads[low];
        let cell = pool.new_cell(high, head)?;
        self.heads[low] = Some(cell);
        Ok(())
    }

    /// Removes the up-edge for `(high, low)`. Panics (an `InvariantViolation`, spec §7) if the
    /// edge is not present — deleting a non-existent edge indicates a bug in the caller.
    pub(crate) fn remove(&mut self, pool: &PoolHandle, low: NodeId, high: NodeId) {
        let mut prev: Option<CellId> = None;
        let mut cur = self.heads.get(low).copied().flatten();
        while let Some(cid) = cur {
            let (value, next) = pool.cell(cid);
            if value == high {
                match prev {
                    Some(pid) => pool.set_next(pid, next),
                    None => self.heads[low] = next,
                }
                pool.free_cell(cid);
                return;
            }
            prev = Some(cid);
            cur = next;
        }
        invariant(false, "remove_up_edge: edge not present");
    }

    /// Returns a snapshot of `low`'s current up-neighbours. Snapshotting (rather than holding a
    /// live borrow) matches spec §4.H's cascade rule: cascade only ever reads this list, never
    /// mutates it — removal happens lazily, later, from each dependent's own dispatch.
    pub(crate) fn snapshot(&self, pool: &PoolHandle, low: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.heads.get(low).copied().flatten();
        while let Some(cid) = cur {
            let (value, next) = pool.cell(cid);
            out.push(value);
            cur = next;
        }
        out
    }
}
