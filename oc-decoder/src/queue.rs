//! The pending queue (spec §4.D): a strict FIFO of node ids that may now satisfy a solving
//! rule, backed by the same pooled cells as the up-edge lists (spec §4.A).

use crate::{
    error::AllocError,
    ids::NodeId,
    pool::{CellId, PoolHandle},
};

pub(crate) struct PendingQueue {
    head: Option<CellId>,
    tail: Option<CellId>,
}

impl PendingQueue {
    pub(crate) fn new() -> Self {
        Self { head: None, tail: None }
    }

    /// Enqueues `node`. Duplicates are permitted (spec §4.D) — the resolver tolerates being
    /// re-woken on an already-processed node. Fails with [`AllocError`] (spec §7) if the shared
    /// cell pool cannot produce a cell.
    pub(crate) fn enqueue(&mut self, pool: &PoolHandle, node: NodeId) -> Result<(), AllocError> {
        let cell = pool.new_cell(node, None)?;
        match self.tail {
            Some(t) => pool.set_next(t, Some(cell)),
            None => self.head = Some(cell),
        }
        self.tail = Some(cell);
        Ok(())
    }

    pub(crate) fn dequeue(&mut self, pool: &PoolHandle) -> Option<NodeId> {
        let head = self.head?;
        let (value, next) = pool.cell(head);
        self.head = next;
        if self.head.is_none() {
            self.tail = None;
        }
        pool.free_cell(head);
        Some(value)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}
