//! A minimal reference encoder and byte-level XOR store for exercising `oc-decoder`'s round-trip
//! property (spec §8, Laws/Round-trip; property P5).
//!
//! `oc-decoder` deliberately never touches payload bytes or PRNG-driven block selection (spec
//! §1's out-of-scope list) — it only tracks *which* check blocks XOR together. Something has to
//! play the part of "the codec" and "the payload store" to check that those tracked XORs
//! actually reproduce real bytes, and this crate is that something. It exists purely as a test
//! fixture, the same way the reference workspace keeps a `test-utils` crate around purely to
//! support other crates' test suites; it is never published or depended on outside `dev-dependencies`.

use oc_decoder::{AuxMapping, Decoder, NodeId};
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;

/// A toy encoder: picks a random auxiliary mapping and message payloads up front, then hands out
/// check blocks (neighbour list + XOR-folded payload) one at a time from a seeded PRNG.
///
/// Deterministic given `seed`: the same seed produces the same aux mapping, the same message
/// payloads, and the same sequence of check blocks, so tests can compare two decoder instances
/// fed from two `ReferenceEncoder`s built from the same seed (spec §8, Determinism law).
pub struct ReferenceEncoder {
    mblocks: usize,
    ablocks: usize,
    coblocks: usize,
    block_size: usize,
    aux_mapping: Vec<Vec<u32>>,
    /// Payload for every composite node (message ids first, then auxiliary ids).
    composite_payloads: Vec<Vec<u8>>,
    /// Payload for every check block emitted so far, indexed from 0 (i.e. check node id minus
    /// `coblocks`).
    check_payloads: Vec<Vec<u8>>,
    rng: ChaCha8Rng,
}

impl ReferenceEncoder {
    /// Builds a reference encoder for `mblocks` message blocks and `ablocks` auxiliary blocks,
    /// each `block_size` bytes, with a random aux mapping in which every auxiliary block draws a
    /// random subset of up to `q` message blocks (at least one, so no auxiliary is ever empty).
    pub fn new(seed: u64, mblocks: usize, ablocks: usize, block_size: usize, q: usize) -> Self {
        assert!(mblocks > 0 && ablocks > 0 && block_size > 0 && q > 0);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut composite_payloads: Vec<Vec<u8>> = (0..mblocks)
            .map(|_| {
                let mut buf = vec![0u8; block_size];
                rng.fill(buf.as_mut_slice());
                buf
            })
            .collect();

        let mut aux_mapping = Vec::with_capacity(ablocks);
        for _ in 0..ablocks {
            let degree = rng.random_range(1..=q.min(mblocks));
            let mut ids: Vec<u32> = (0..mblocks as u32).collect();
            ids.shuffle(&mut rng);
            ids.truncate(degree);
            ids.sort_unstable();

            let mut payload = vec![0u8; block_size];
            for &m in &ids {
                xor_into(&mut payload, &composite_payloads[m as usize]);
            }
            composite_payloads.push(payload);
            aux_mapping.push(ids);
        }

        Self {
            mblocks,
            ablocks,
            coblocks: mblocks + ablocks,
            block_size,
            aux_mapping,
            composite_payloads,
            check_payloads: Vec::new(),
            rng,
        }
    }

    /// The auxiliary mapping this encoder built, in the canonical aux-keyed form expected by
    /// [`oc_decoder::Decoder::create`].
    pub fn aux_mapping(&self) -> AuxMapping {
        AuxMapping::AuxKeyed(self.aux_mapping.clone())
    }

    pub fn mblocks(&self) -> usize {
        self.mblocks
    }

    pub fn ablocks(&self) -> usize {
        self.ablocks
    }

    /// The source payload for message block `m`.
    pub fn message_payload(&self, m: usize) -> &[u8] {
        assert!(m < self.mblocks);
        &self.composite_payloads[m]
    }

    /// Emits the next check block: a random, non-empty subset of `degree` composite nodes
    /// (drawn without replacement from `[0, coblocks)`), returning its neighbour list (for
    /// [`oc_decoder::Decoder::ingest_check_block`]) and its XOR-folded payload bytes.
    pub fn next_check_block(&mut self, degree: usize) -> (Vec<NodeId>, Vec<u8>) {
        let degree = degree.clamp(1, self.coblocks);
        let mut ids: Vec<u32> = (0..self.coblocks as u32).collect();
        ids.shuffle(&mut self.rng);
        ids.truncate(degree);

        let mut payload = vec![0u8; self.block_size];
        for &id in &ids {
            xor_into(&mut payload, &self.composite_payloads[id as usize]);
        }

        self.check_payloads.push(payload.clone());
        let neighbours = ids.into_iter().map(NodeId::from).collect();
        (neighbours, payload)
    }

    /// The payload recorded for check node `node` (must be a check id this encoder emitted).
    pub fn check_payload(&self, node: NodeId) -> &[u8] {
        let idx = u32::from(node) as usize - self.coblocks;
        &self.check_payloads[idx]
    }

    /// Re-derives message block `m`'s payload by XOR-folding the check payloads named in the
    /// decoder's expanded xor-list, and compares it against the original payload (spec §8
    /// property P5 / the round-trip law).
    pub fn verify_message(&self, decoder: &Decoder, m: usize) -> bool {
        let node = NodeId::from(m as u32);
        let Some(expanded) = decoder.xor_list_expanded(node) else {
            return false;
        };
        let mut folded = vec![0u8; self.block_size];
        for check_id in expanded {
            xor_into(&mut folded, self.check_payload(check_id));
        }
        folded == self.composite_payloads[m]
    }
}

/// XORs `src` into `dst` byte-wise. Panics if the lengths differ.
pub fn xor_into(dst: &mut [u8], src: &[u8]) {
    assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}
