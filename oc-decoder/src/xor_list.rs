//! The XOR-list store (spec §4.C): a frozen, append-only sequence per solved node recording
//! which check blocks XOR together to produce its payload.
//!
//! Entries are not always check-node ids: when a solving step eliminates an edge, the
//! already-solved down-neighbours it folds in may themselves be message or auxiliary nodes
//! (indirection, spec §4.C). [`XorListStore::expand`] walks that indirection down to check-node
//! leaves. Expansion never eagerly deduplicates — involution (pairwise cancellation) is left to
//! whichever caller actually XORs payload bytes together, per spec §4.C.

use alloc::{vec, vec::Vec};

use oc_utils_indexing::IndexVec;
use smallvec::SmallVec;

use crate::ids::{Geometry, NodeId};

pub(crate) type RawXorList = SmallVec<[NodeId; 4]>;

pub(crate) struct XorListStore {
    lists: IndexVec<NodeId, Option<RawXorList>>,
}

impl XorListStore {
    pub(crate) fn with_capacity(n: usize) -> Self {
        let mut lists = IndexVec::with_capacity(n);
        for _ in 0..n {
            lists.push(None).expect("node space fits in u32");
        }
        Self { lists }
    }

    fn ensure_len(&mut self, upto: NodeId) {
        while self.lists.len() <= u32::from(upto) as usize {
            self.lists.push(None).expect("node space fits in u32");
        }
    }

    /// Freezes `node`'s xor-list. Panics (spec §7 `InvariantViolation`) if `node` already has
    /// one recorded — per spec §3 invariant 4, a set xor-list is never rewritten.
    pub(crate) fn set(&mut self, node: NodeId, list: RawXorList) {
        self.ensure_len(node);
        let slot = &mut self.lists[node];
        crate::error::invariant(slot.is_none(), "xor_list written twice for the same node");
        *slot = Some(list);
    }

    /// Returns the raw (possibly-indirect) sequence recorded for `node`, or `None` if `node`
    /// isn't solved yet.
    pub(crate) fn raw(&self, node: NodeId) -> Option<&[NodeId]> {
        self.lists.get(node).and_then(|l| l.as_deref())
    }

    /// Returns the sequence of check-node ids whose XOR equals `node`'s payload, recursively
    /// expanding every message/auxiliary reference. Well-founded because every reference in a
    /// frozen list points to a node that was already solved (and thus already had its own list
    /// frozen) at the moment it was recorded — solve order forms a DAG even though numeric id
    /// order does not (spec §9).
    pub(crate) fn expand(&self, geometry: &Geometry, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if geometry.is_check(n) {
                out.push(n);
                continue;
            }
            let list = self
                .raw(n)
                .unwrap_or_else(|| panic!("expand: composite node {n:?} has no xor_list yet"));
            for &entry in list.iter().rev() {
                stack.push(entry);
            }
        }
        out
    }
}
