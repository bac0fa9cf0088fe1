//! Check-block ingestion (spec §4.G): admits a new check node, partitions its neighbours into
//! already-solved and still-unsolved, and enqueues it for the resolver.

use alloc::vec::Vec;

use itertools::{Either, Itertools};
use smallvec::smallvec;

use crate::{
    decoder::Decoder,
    error::{CapacityError, DecoderError},
    ids::NodeId,
    xor_list::RawXorList,
};

impl Decoder {
    /// Admits a check node defined as the XOR of `neighbours`, returning its assigned id.
    ///
    /// Always admits the block, even when every neighbour is already solved (spec §4.G design
    /// note): the resolver decommissions such redundant arrivals on its next pass.
    #[tracing::instrument(name = "ingest_check_block", skip(self, neighbours))]
    pub fn ingest_check_block(&mut self, neighbours: &[NodeId]) -> Result<NodeId, DecoderError> {
        let node = NodeId::from(self.state.nodes);
        let idx = u32::from(node) as usize;
        if idx >= self.state.capacity {
            return Err(CapacityError { capacity: self.state.capacity, in_use: idx }.into());
        }

        self.state.ensure_len(node);

        // Step 2: partition into S (solved, folded into xor_list directly) and U (unsolved,
        // kept as down-edges).
        let (solved, unsolved): (Vec<NodeId>, Vec<NodeId>) =
            neighbours.iter().copied().partition_map(|n| {
                if self.state.is_solved(n) { Either::Left(n) } else { Either::Right(n) }
            });
        let mut xor_list: RawXorList = smallvec![node];
        xor_list.extend(solved);

        // Step 2 (U branch): up-edge (node, u) for each unsolved neighbour. Performed before any
        // state commit below so a pool exhaustion (AllocError, spec §7) leaves `node`'s id
        // un-committed rather than half-initialized.
        for &u in &unsolved {
            self.up.add(&self.pool, u, node)?;
        }

        // Step 4: down[node] is built directly from U, folding the "compact to U" step into
        // construction (see edges.rs module doc).
        let pushed = self.down.push_row(unsolved.iter().copied())?;
        crate::error::invariant(pushed == node, "ingest: down-edge row id drifted from node id");

        // Step 5, ahead of the Step 1/3 commit below for the same reason: an allocation failure
        // here must not leave a solved, uncommitted node floating in the pending queue's past.
        self.queue.enqueue(&self.pool, node)?;

        // Step 1/3: only committed once every allocating step above has succeeded.
        self.state.nodes += 1;
        self.state.set_u(node, unsolved.len() as u32);
        self.state.mark_solved(node);
        self.xor_lists.set(node, xor_list);

        Ok(node)
    }
}
