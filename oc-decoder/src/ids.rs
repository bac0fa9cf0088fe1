//! Node IDs and the three disjoint ID ranges described in spec §3 (message / auxiliary / check).

use oc_utils_indexing::newtype_id;

newtype_id! {
    /// A node in the bipartite decode graph: a message block, an auxiliary block, or a check
    /// block. Ranges are fixed and ordered: `message < auxiliary < check`.
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    NodeId
}

/// `NodeId` wraps a plain `u32` rather than a type `proptest_derive::Arbitrary` can see through,
/// so it gets a manual `Arbitrary` impl instead of a derive, the same way the reference
/// workspace hand-implements `Arbitrary` for its own `u64`-backed id newtype.
#[cfg(feature = "arbitrary")]
impl proptest::prelude::Arbitrary for NodeId {
    type Parameters = ();
    type Strategy = proptest::prelude::BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;
        any::<u32>().prop_map(NodeId::from).boxed()
    }
}

/// Which of the three disjoint ranges a [`NodeId`] falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `0 <= id < mblocks`.
    Message,
    /// `mblocks <= id < coblocks`.
    Auxiliary,
    /// `coblocks <= id`.
    Check,
}

/// The three boundary counts that classify every [`NodeId`] in a decoder instance.
///
/// `message < auxiliary < check` is invariant and load-bearing: "down" means strictly lower id,
/// "up" means strictly higher id (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub(crate) mblocks: u32,
    pub(crate) ablocks: u32,
    pub(crate) coblocks: u32,
}

impl Geometry {
    pub(crate) fn new(mblocks: u32, ablocks: u32) -> Self {
        Self { mblocks, ablocks, coblocks: mblocks + ablocks }
    }

    /// Classifies `id` into one of the three node ranges.
    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        let raw = u32::from(id);
        if raw < self.mblocks {
            NodeKind::Message
        } else if raw < self.coblocks {
            NodeKind::Auxiliary
        } else {
            NodeKind::Check
        }
    }

    #[inline]
    pub fn is_message(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Message)
    }

    #[inline]
    pub fn is_auxiliary(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Auxiliary)
    }

    #[inline]
    pub fn is_check(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::Check)
    }

    /// Number of message blocks.
    #[inline]
    pub fn mblocks(&self) -> u32 {
        self.mblocks
    }

    /// Number of auxiliary blocks.
    #[inline]
    pub fn ablocks(&self) -> u32 {
        self.ablocks
    }

    /// `mblocks + ablocks`: the first check-node id.
    #[inline]
    pub fn coblocks(&self) -> u32 {
        self.coblocks
    }
}
