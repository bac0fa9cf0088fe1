//! The resolver (spec §4.H): drains the pending queue, applies the propagation and aux rules,
//! cascades `u[·]` decrements along up-edges, and reports newly-solved composite nodes.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::{
    decoder::Decoder,
    decoder::ResolveOutcome,
    error::{invariant, DecoderError},
    ids::NodeId,
};

impl Decoder {
    /// Drains the pending queue, applying solving rules until it empties or the configured step
    /// bound on newly-solved emissions is reached (spec §4.H, §9 "Cooperative stepping"). May be
    /// called repeatedly; the queue persists across calls.
    ///
    /// `done` becoming true mid-drain does not itself stop the drain: "the queue is flushed"
    /// (spec §4.H "Termination") means every already-enqueued, input-independent cascade step
    /// still runs — e.g. an auxiliary whose last unsolved message neighbour was just solved
    /// fires in the same call, not a later one (spec §8 scenario 1). Only the queue emptying, or
    /// the step bound, ends the call.
    #[tracing::instrument(name = "resolve", skip_all)]
    pub fn resolve(&mut self) -> Result<ResolveOutcome, DecoderError> {
        let mut newly_solved = Vec::new();

        loop {
            if let Some(bound) = self.config.step_bound() {
                if newly_solved.len() >= bound {
                    break;
                }
            }
            let Some(from) = self.queue.dequeue(&self.pool) else {
                break;
            };
            self.dispatch(from, &mut newly_solved)?;
        }

        Ok(ResolveOutcome { done: self.state.done, newly_solved })
    }

    fn dispatch(
        &mut self,
        from: NodeId,
        newly_solved: &mut Vec<NodeId>,
    ) -> Result<(), DecoderError> {
        invariant(!self.geometry.is_message(from), "resolve: dispatched from a message node");

        if self.state.is_decommissioned(from) {
            return Ok(());
        }

        match self.state.u(from) {
            0 if !self.state.is_solved(from) => self.fire_aux_rule(from, newly_solved)?,
            0 => self.state.decommission(from), // check, or already-solved aux: redundant
            1 if self.state.is_solved(from) => self.fire_propagation_rule(from, newly_solved)?,
            1 => {}, // unsolved aux, u == 1: needs one more solve before the aux rule fires
            _ => {}, // u >= 2: nothing to do yet
        }
        Ok(())
    }

    /// Propagation rule: `from` is solved with exactly one unsolved down-neighbour `to`, which
    /// therefore becomes solved too.
    fn fire_propagation_rule(
        &mut self,
        from: NodeId,
        newly_solved: &mut Vec<NodeId>,
    ) -> Result<(), DecoderError> {
        let row = self.down.row(from).to_vec();
        let mut to = None;
        let mut s_from: SmallVec<[NodeId; 4]> = SmallVec::new();
        for n in row {
            if self.state.is_solved(n) {
                s_from.push(n);
            } else {
                invariant(to.is_none(), "propagation rule: more than one unsolved down-neighbour");
                to = Some(n);
            }
        }
        invariant(to.is_some(), "propagation rule: no unsolved down-neighbour found");
        let to = to.unwrap();

        let mut new_list: SmallVec<[NodeId; 4]> = self
            .xor_lists
            .raw(from)
            .expect("propagation rule: dispatched node has no frozen xor_list")
            .into();
        new_list.extend(s_from);

        // Decommission `from`: drop its logical down array (it is never read again once
        // decommissioned) and remove the one up-edge this solve just spent.
        self.up.remove(&self.pool, to, from);
        self.state.decommission(from);

        self.state.mark_solved(to);
        self.xor_lists.set(to, new_list);
        newly_solved.push(to);

        // Re-enqueue a newly-solved auxiliary to probe further cascades (spec §9 open question:
        // both source variants did this, so it is preserved here).
        if self.geometry.is_auxiliary(to) {
            self.queue.enqueue(&self.pool, to)?;
        }

        self.cascade(to)
    }

    /// Aux rule: an unsolved auxiliary with zero unsolved down-neighbours is solved by XOR of
    /// them (all already solved, since `u[from] == 0`).
    fn fire_aux_rule(
        &mut self,
        from: NodeId,
        newly_solved: &mut Vec<NodeId>,
    ) -> Result<(), DecoderError> {
        let list: SmallVec<[NodeId; 4]> = self.down.row(from).into();

        self.state.mark_solved(from);
        self.xor_lists.set(from, list);
        // `from`'s own up-edges are *not* eagerly removed here: each dependent check node
        // removes its single edge lazily, during its own later dispatch (spec §4.H Cascade).
        // The decommissioned flag only guards against a duplicate dispatch of `from` itself.
        self.state.decommission(from);
        newly_solved.push(from);

        self.cascade(from)
    }

    /// Decrements `u[h]` for every up-neighbour `h` of the newly-solved `to`, enqueuing any whose
    /// count just dropped below 2.
    fn cascade(&mut self, to: NodeId) -> Result<(), DecoderError> {
        let ups = self.up.snapshot(&self.pool, to);
        for h in ups {
            self.state.decrement_u(h);
            if self.state.u(h) < 2 {
                self.queue.enqueue(&self.pool, h)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{config::DecoderConfig, init::AuxMapping};

    use super::*;

    #[test]
    fn scenario_one_single_aux_solves_via_both_rules() {
        // mblocks=2, ablocks=1, a0 -> {m0, m1}.
        let mut d = Decoder::create(
            2,
            1,
            AuxMapping::AuxKeyed(vec![vec![0, 1]]),
            DecoderConfig::default(),
        )
        .unwrap();

        d.ingest_check_block(&[NodeId::from(0u32)]).unwrap();
        let out = d.resolve().unwrap();
        assert_eq!(out.newly_solved, vec![NodeId::from(0u32)]);
        assert!(!out.done);

        d.ingest_check_block(&[NodeId::from(1u32)]).unwrap();
        let out = d.resolve().unwrap();
        // m1 solves by propagation, then a0 solves by the aux rule in the same cascade.
        assert_eq!(out.newly_solved, vec![NodeId::from(1u32), NodeId::from(2u32)]);
        assert!(out.done);

        assert_eq!(
            d.xor_list(NodeId::from(2u32), false).unwrap(),
            vec![NodeId::from(0u32), NodeId::from(1u32)]
        );
    }

    #[test]
    fn redundant_check_block_after_done_is_a_noop() {
        let mut d = Decoder::create(
            2,
            1,
            AuxMapping::AuxKeyed(vec![vec![0, 1]]),
            DecoderConfig::default(),
        )
        .unwrap();
        d.ingest_check_block(&[NodeId::from(0u32)]).unwrap();
        d.resolve().unwrap();
        d.ingest_check_block(&[NodeId::from(1u32)]).unwrap();
        d.resolve().unwrap();
        assert!(d.done());

        d.ingest_check_block(&[NodeId::from(0u32), NodeId::from(1u32)]).unwrap();
        let out = d.resolve().unwrap();
        assert!(out.newly_solved.is_empty());
        assert!(out.done);
    }

    #[test]
    fn stepping_mode_emits_one_newly_solved_node_per_call() {
        // mblocks=4, ablocks=1, a0 -> {m0, m1, m2, m3}.
        let mut d = Decoder::create(
            4,
            1,
            AuxMapping::AuxKeyed(vec![vec![0, 1, 2, 3]]),
            DecoderConfig::default().with_step_bound(Some(1)),
        )
        .unwrap();

        d.ingest_check_block(&[NodeId::from(0u32)]).unwrap();
        d.ingest_check_block(&[NodeId::from(1u32)]).unwrap();
        d.ingest_check_block(&[NodeId::from(2u32)]).unwrap();
        d.ingest_check_block(&[NodeId::from(3u32)]).unwrap();

        // `done` flips true on the fourth call (m3 solves) but a0 only becomes solvable as a
        // *result* of that call's cascade, so it is reported on a fifth call — done does not by
        // itself mean every input-independent solve has been reported yet.
        let mut order = Vec::new();
        for _ in 0..5 {
            let out = d.resolve().unwrap();
            order.extend(out.newly_solved);
        }

        assert_eq!(
            order,
            vec![
                NodeId::from(0u32),
                NodeId::from(1u32),
                NodeId::from(2u32),
                NodeId::from(3u32),
                NodeId::from(4u32),
            ]
        );
    }
}
