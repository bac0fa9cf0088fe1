//! The process-wide cell allocator backing up-edge lists and the pending queue (spec §4.A, §5).
//!
//! Every live [`crate::Decoder`] draws cells from one shared, lazily-initialized slab; freed
//! cells go back on an intrusive free-list instead of being returned to the system allocator,
//! which amortises the steady-state burst of check-block arrivals. The slab is reset (not
//! deallocated) once the last decoder instance releases it, so the next decoder to start up
//! reuses the backing storage instead of paying for it again.
//!
//! A cell's `value` only ever means something to the decoder instance that allocated it — the
//! pool does not attribute cells to instances, it just recycles the backing memory. This is
//! safe as long as every decoder only ever follows `CellId`s it itself produced, which holds
//! because `CellId`s are never exposed outside this crate.

use alloc::vec::Vec;

use oc_utils_sync::RefCountedSingleton;

use crate::{error::AllocError, ids::NodeId};

pub(crate) type CellId = u32;

#[derive(Clone, Copy)]
struct Cell {
    value: NodeId,
    next: Option<CellId>,
}

#[derive(Default)]
struct Slab {
    cells: Vec<Cell>,
    free_head: Option<CellId>,
}

impl Slab {
    fn acquire(&mut self, value: NodeId, next: Option<CellId>) -> Result<CellId, ()> {
        if let Some(id) = self.free_head {
            let idx = id as usize;
            self.free_head = self.cells[idx].next;
            self.cells[idx] = Cell { value, next };
            return Ok(id);
        }
        if self.cells.len() >= u32::MAX as usize {
            return Err(());
        }
        let id = self.cells.len() as CellId;
        self.cells.push(Cell { value, next });
        Ok(id)
    }

    fn release(&mut self, id: CellId) {
        self.cells[id as usize].next = self.free_head;
        self.free_head = Some(id);
    }

    fn get(&self, id: CellId) -> Cell {
        self.cells[id as usize]
    }

    fn set_next(&mut self, id: CellId, next: Option<CellId>) {
        self.cells[id as usize].next = next;
    }

    fn reset(&mut self) {
        self.cells.clear();
        self.free_head = None;
    }
}

static GLOBAL_POOL: RefCountedSingleton<Slab> = RefCountedSingleton::new(Slab::default_impl);

impl Slab {
    // `RefCountedSingleton::new` takes a plain `fn() -> T`; `Default::default` as a trait method
    // can't be named that way, so this gives it a concrete path.
    fn default_impl() -> Self {
        Self::default()
    }
}

/// A handle a single decoder instance uses to draw cells from the shared pool.
///
/// Registers itself as a holder on construction and releases that registration on drop,
/// implementing the "released only when the last decoder finishes" lifecycle from spec §4.A.
pub(crate) struct PoolHandle {
    _private: (),
}

impl PoolHandle {
    pub(crate) fn acquire() -> Self {
        GLOBAL_POOL.acquire(|_| {});
        Self { _private: () }
    }

    /// Allocates a new cell holding `value`, linked to `next`. Fails with [`AllocError`] (spec
    /// §7) once the shared slab has handed out `u32::MAX` live cells; the caller is responsible
    /// for propagating that failure instead of panicking (spec §7: `AllocError` is distinct from
    /// `InvariantViolation` and must leave the decoder usable).
    pub(crate) fn new_cell(&self, value: NodeId, next: Option<CellId>) -> Result<CellId, AllocError> {
        GLOBAL_POOL.with(|slab| slab.acquire(value, next)).map_err(|()| AllocError)
    }

    pub(crate) fn free_cell(&self, id: CellId) {
        GLOBAL_POOL.with(|slab| slab.release(id));
    }

    pub(crate) fn cell(&self, id: CellId) -> (NodeId, Option<CellId>) {
        GLOBAL_POOL.with(|slab| {
            let c = slab.get(id);
            (c.value, c.next)
        })
    }

    pub(crate) fn set_next(&self, id: CellId, next: Option<CellId>) {
        GLOBAL_POOL.with(|slab| slab.set_next(id, next));
    }
}

impl Drop for PoolHandle {
    fn drop(&mut self) {
        GLOBAL_POOL.release(|slab| slab.reset());
    }
}
