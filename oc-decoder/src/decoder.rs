//! The public [`Decoder`] handle tying together the node pool, edge store, xor-list store,
//! pending queue and graph state into the four operations from spec §6.

use alloc::vec::Vec;

use crate::{
    config::DecoderConfig,
    edges::{DownEdges, UpEdges},
    ids::{Geometry, NodeId},
    pool::PoolHandle,
    queue::PendingQueue,
    state::GraphState,
    xor_list::XorListStore,
};

/// A single, single-threaded instance of the bipartite-graph decoder described in spec §2–4.
///
/// `Decoder` owns no payload bytes: it only tracks *which* check blocks XOR together to
/// reconstruct each message/auxiliary block (spec §1, out-of-scope list).
pub struct Decoder {
    pub(crate) config: DecoderConfig,
    pub(crate) geometry: Geometry,
    pub(crate) state: GraphState,
    pub(crate) down: DownEdges,
    pub(crate) up: UpEdges,
    pub(crate) xor_lists: XorListStore,
    pub(crate) queue: PendingQueue,
    pub(crate) pool: PoolHandle,
}

/// The result of a [`Decoder::resolve`] call (spec §6 operation 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// `true` once every message block is recoverable (spec §3 invariant 6).
    pub done: bool,
    /// Composite node ids that became solved during this call, in solve order.
    pub newly_solved: Vec<NodeId>,
}

impl Decoder {
    /// Read-only counts for observability (spec "Supplemented features"): not part of the core
    /// contract, purely a cheap in-memory snapshot.
    pub fn stats(&self) -> DecoderStats {
        DecoderStats {
            mblocks: self.geometry.mblocks(),
            ablocks: self.geometry.ablocks(),
            check_nodes_received: self.state.nodes - self.geometry.coblocks(),
            unsolved_message_count: self.state.unsolved_message_count,
            done: self.state.done,
        }
    }

    /// Returns the raw (possibly-indirect) xor-list for `node`, or the fully check-node-only
    /// expansion when `expand_aux` is set (spec §6 operation 4).
    pub fn xor_list(&self, node: NodeId, expand_aux: bool) -> Option<Vec<NodeId>> {
        if !self.state.is_solved(node) {
            return None;
        }
        if expand_aux {
            Some(self.xor_lists.expand(&self.geometry, node))
        } else {
            self.xor_lists.raw(node).map(|s| s.to_vec())
        }
    }

    /// Convenience wrapper over `xor_list(node, true)` returning an owned vector directly.
    pub fn xor_list_expanded(&self, node: NodeId) -> Option<Vec<NodeId>> {
        self.xor_list(node, true)
    }

    /// `true` once every message block is recoverable.
    pub fn done(&self) -> bool {
        self.state.done
    }

    /// Walks the full internal state and checks the universal invariants P1-P4 (spec §8).
    /// Exists only for property tests: re-deriving `u[·]` and edge symmetry from scratch on
    /// every call is too expensive to run on the hot path.
    #[cfg(any(test, feature = "testing"))]
    pub fn check_invariants(&self) -> Result<(), alloc::string::String> {
        use alloc::format;

        let mblocks = self.geometry.mblocks();

        let actual_unsolved =
            (0..mblocks).filter(|&m| !self.state.is_solved(NodeId::from(m))).count();
        if actual_unsolved != self.state.unsolved_message_count {
            return Err(format!(
                "P3 violated: unsolved_message_count = {}, actual = {actual_unsolved}",
                self.state.unsolved_message_count
            ));
        }

        if self.state.done != (self.state.unsolved_message_count == 0) {
            return Err(format!(
                "P4 violated: done = {}, unsolved_message_count = {}",
                self.state.done, self.state.unsolved_message_count
            ));
        }

        for idx in mblocks..self.state.nodes {
            let n = NodeId::from(idx);
            if self.state.is_decommissioned(n) {
                continue;
            }
            let mut unsolved = 0u32;
            for &low in self.down.row(n) {
                if !self.state.is_solved(low) {
                    unsolved += 1;
                    if !self.up.snapshot(&self.pool, low).contains(&n) {
                        return Err(format!(
                            "P2 violated: {n:?} has a down-edge to {low:?} with no matching up-edge"
                        ));
                    }
                }
            }
            if unsolved != self.state.u(n) {
                return Err(format!(
                    "P1 violated: u[{n:?}] = {}, actual unsolved degree = {unsolved}",
                    self.state.u(n)
                ));
            }
        }

        Ok(())
    }
}

/// A cheap, read-only snapshot of decoder progress (spec "Supplemented features").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderStats {
    pub mblocks: u32,
    pub ablocks: u32,
    pub check_nodes_received: u32,
    pub unsolved_message_count: usize,
    pub done: bool,
}
