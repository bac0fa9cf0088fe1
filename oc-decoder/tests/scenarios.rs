//! Black-box scenario tests, literal inputs taken from spec §8 "Concrete scenarios" 1-6.

use oc_decoder::{AuxMapping, Decoder, DecoderConfig, NodeId};

fn n(id: u32) -> NodeId {
    NodeId::from(id)
}

/// Scenario 1: `mblocks=2, ablocks=1, a0 -> {m0, m1}`.
#[test]
fn scenario_1_single_aux_both_rules() {
    let mut d =
        Decoder::create(2, 1, AuxMapping::AuxKeyed(vec![vec![0, 1]]), DecoderConfig::default())
            .unwrap();

    d.ingest_check_block(&[n(0)]).unwrap();
    let out = d.resolve().unwrap();
    assert_eq!(out.newly_solved, vec![n(0)]);
    assert!(!out.done);
    assert_eq!(d.xor_list(n(0), false).unwrap(), vec![n(3)]); // coblocks = 3, c0 = node 3

    d.ingest_check_block(&[n(1)]).unwrap();
    let out = d.resolve().unwrap();
    // m1 solves by propagation, then a0 solves by the aux rule in the same cascade.
    assert_eq!(out.newly_solved, vec![n(1), n(2)]);
    assert!(out.done);
    assert_eq!(d.xor_list(n(2), false).unwrap(), vec![n(0), n(1)]);
}

/// Scenario 2: `mblocks=3, ablocks=1, a0 -> {m0, m1, m2}`, with a redundant first check block.
#[test]
fn scenario_2_redundant_arrival_then_propagation_cascade() {
    let mut d = Decoder::create(
        3,
        1,
        AuxMapping::AuxKeyed(vec![vec![0, 1, 2]]),
        DecoderConfig::default(),
    )
    .unwrap();

    // c0 = node 4 (coblocks = 4), redundantly equal to a0; u[c0] = 3 at ingest.
    let c0 = d.ingest_check_block(&[n(0), n(1), n(2)]).unwrap();
    assert_eq!(c0, n(4));
    d.resolve().unwrap();

    d.ingest_check_block(&[n(0)]).unwrap(); // c1 = node 5
    let out = d.resolve().unwrap();
    assert_eq!(out.newly_solved, vec![n(0)]);

    d.ingest_check_block(&[n(1)]).unwrap(); // c2 = node 6
    let out = d.resolve().unwrap();
    // m1 solves directly; cascade drops u[c0] to 1, propagation on c0 solves m2; m2 solving in
    // turn drops u[a0] to 0, so the aux rule fires on a0 in the same call.
    assert_eq!(out.newly_solved, vec![n(1), n(2), n(3)]);
    assert!(out.done);

    // m2's raw xor_list is [c0, m0, m1]; expanded, every entry becomes a check id.
    assert_eq!(d.xor_list(n(2), false).unwrap(), vec![n(4), n(0), n(1)]);
    assert_eq!(d.xor_list(n(2), true).unwrap(), vec![n(4), n(5), n(6)]);
}

/// Scenario 3: `mblocks=2, ablocks=1, a0 -> {m0, m1}`, ingesting a check equal to the auxiliary
/// itself before any message block arrives.
#[test]
fn scenario_3_check_equal_to_auxiliary_then_cascades_both_messages() {
    let mut d =
        Decoder::create(2, 1, AuxMapping::AuxKeyed(vec![vec![0, 1]]), DecoderConfig::default())
            .unwrap();

    // c0 = node 3 (coblocks = 3), c0 == a0 (node 2).
    d.ingest_check_block(&[n(2)]).unwrap();
    let out = d.resolve().unwrap();
    // u[c0] = 1, propagation solves a0 with xor_list = [c0]. a0 is re-enqueued (u[a0] becomes 2
    // once both of its message down-neighbours are still unsolved) and makes no further progress.
    assert_eq!(out.newly_solved, vec![n(2)]);
    assert!(!out.done);
    assert_eq!(d.xor_list(n(2), false).unwrap(), vec![n(3)]);

    // c1 = node 4: {m0, a0}. S = {a0}, U = {m0}; propagation solves m0 with [c1, a0].
    d.ingest_check_block(&[n(0), n(2)]).unwrap();
    let out = d.resolve().unwrap();
    // Cascade on m0 drops u[a0] to 1; propagation on a0 solves m1 with [c0, m0].
    assert_eq!(out.newly_solved, vec![n(0), n(1)]);
    assert!(out.done);

    assert_eq!(d.xor_list(n(0), false).unwrap(), vec![n(4), n(2)]);
    assert_eq!(d.xor_list(n(1), false).unwrap(), vec![n(3), n(0)]);
}

/// Scenario 4: ingesting a fully-redundant check block after `done` is a no-op.
#[test]
fn scenario_4_redundant_ingest_after_done_is_noop() {
    let mut d =
        Decoder::create(2, 1, AuxMapping::AuxKeyed(vec![vec![0, 1]]), DecoderConfig::default())
            .unwrap();
    d.ingest_check_block(&[n(0)]).unwrap();
    d.resolve().unwrap();
    d.ingest_check_block(&[n(1)]).unwrap();
    d.resolve().unwrap();
    assert!(d.done());

    d.ingest_check_block(&[n(0), n(1)]).unwrap();
    let out = d.resolve().unwrap();
    assert!(out.newly_solved.is_empty());
    assert!(out.done);
}

/// Scenario 5: stepping mode, `mblocks=4, ablocks=1, a0 -> {m0..m3}`, all four check blocks
/// ingested back-to-back before any resolve call.
#[test]
fn scenario_5_stepping_mode_emits_in_order_across_five_calls() {
    let mut d = Decoder::create(
        4,
        1,
        AuxMapping::AuxKeyed(vec![vec![0, 1, 2, 3]]),
        DecoderConfig::default().with_step_bound(Some(1)),
    )
    .unwrap();

    for m in 0..4 {
        d.ingest_check_block(&[n(m)]).unwrap();
    }

    let mut order = Vec::new();
    for _ in 0..5 {
        let out = d.resolve().unwrap();
        order.extend(out.newly_solved);
    }
    assert_eq!(order, vec![n(0), n(1), n(2), n(3), n(4)]);
    assert!(d.done());
}

/// Scenario 6: determinism. Re-running scenarios 1-3 on two fresh instances with identical
/// inputs compares equal element-for-element.
#[test]
fn scenario_6_determinism_across_fresh_instances() {
    fn run() -> Vec<(NodeId, Vec<NodeId>)> {
        let mut d = Decoder::create(
            3,
            1,
            AuxMapping::AuxKeyed(vec![vec![0, 1, 2]]),
            DecoderConfig::default(),
        )
        .unwrap();
        let mut solved = Vec::new();
        d.ingest_check_block(&[n(0), n(1), n(2)]).unwrap();
        solved.extend(d.resolve().unwrap().newly_solved);
        d.ingest_check_block(&[n(0)]).unwrap();
        solved.extend(d.resolve().unwrap().newly_solved);
        d.ingest_check_block(&[n(1)]).unwrap();
        solved.extend(d.resolve().unwrap().newly_solved);

        solved.into_iter().map(|id| (id, d.xor_list(id, true).unwrap())).collect()
    }

    let a = run();
    let b = run();
    assert_eq!(a, b);
}
