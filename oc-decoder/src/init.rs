//! Initialization (spec §4.F): builds the auxiliary-node down-edges from the aux mapping and
//! pre-sizes every array.

use alloc::{vec, vec::Vec};

use crate::{
    config::DecoderConfig,
    decoder::Decoder,
    edges::{DownEdges, UpEdges},
    error::{ConfigError, DecoderError},
    ids::{Geometry, NodeId},
    pool::PoolHandle,
    queue::PendingQueue,
    state::GraphState,
    xor_list::XorListStore,
};

/// The auxiliary mapping passed to [`Decoder::create`] (spec §4.F, §6 operation 1).
///
/// The core accepts either direction and canonicalises internally to the auxiliary-keyed form.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "arbitrary", derive(proptest_derive::Arbitrary))]
pub enum AuxMapping {
    /// `aux_mapping[a]` is the list of message ids that make up auxiliary block `a`. Canonical.
    AuxKeyed(Vec<Vec<u32>>),
    /// `aux_mapping[m]` is the list of auxiliary ids that message block `m` contributes to.
    MessageKeyed(Vec<Vec<u32>>),
}

impl AuxMapping {
    fn canonicalize(self, mblocks: usize, ablocks: usize) -> Result<Vec<Vec<u32>>, ConfigError> {
        match self {
            AuxMapping::AuxKeyed(rows) => {
                if rows.len() != ablocks {
                    return Err(ConfigError::MappingOutOfRange {
                        id: rows.len() as u32,
                        mblocks,
                        ablocks,
                    });
                }
                for row in &rows {
                    for &m in row {
                        if m as usize >= mblocks {
                            return Err(ConfigError::MappingOutOfRange { id: m, mblocks, ablocks });
                        }
                    }
                }
                Ok(rows)
            },
            AuxMapping::MessageKeyed(rows) => {
                if rows.len() != mblocks {
                    return Err(ConfigError::MappingOutOfRange {
                        id: rows.len() as u32,
                        mblocks,
                        ablocks,
                    });
                }
                let mut by_aux = vec![Vec::new(); ablocks];
                for (m, auxes) in rows.into_iter().enumerate() {
                    for a in auxes {
                        if a as usize >= ablocks {
                            return Err(ConfigError::MappingOutOfRange { id: a, mblocks, ablocks });
                        }
                        by_aux[a as usize].push(m as u32);
                    }
                }
                Ok(by_aux)
            },
        }
    }
}

impl Decoder {
    /// Builds a decoder from `mblocks` message blocks, `ablocks` auxiliary blocks, the
    /// auxiliary mapping, and construction parameters (spec §6 operation 1).
    #[tracing::instrument(name = "create", skip(aux_mapping))]
    pub fn create(
        mblocks: usize,
        ablocks: usize,
        aux_mapping: AuxMapping,
        config: DecoderConfig,
    ) -> Result<Decoder, DecoderError> {
        if mblocks == 0 {
            return Err(ConfigError::InvalidMblocks(mblocks).into());
        }
        if ablocks == 0 {
            return Err(ConfigError::InvalidAblocks(ablocks).into());
        }
        if !(config.fudge() > 1.0) {
            return Err(ConfigError::InvalidFudge(config.fudge()).into());
        }

        let by_aux = aux_mapping.canonicalize(mblocks, ablocks)?;

        let geometry = Geometry::new(mblocks as u32, ablocks as u32);
        let coblocks = geometry.coblocks() as usize;
        let expected_checks = config.expected_check_space(mblocks);
        let capacity = coblocks + expected_checks;

        let mut state = GraphState::new(geometry, capacity);
        let mut down = DownEdges::with_capacity(coblocks, coblocks * 4);
        let mut up = UpEdges::with_capacity(capacity);
        let xor_lists = XorListStore::with_capacity(capacity);
        let queue = PendingQueue::new();
        let pool = PoolHandle::acquire();

        // Step 2+4: message rows are always empty; auxiliary rows come from the mapping.
        for _ in 0..mblocks {
            down.push_row(core::iter::empty())?;
        }
        for (a, msgs) in by_aux.iter().enumerate() {
            let aux_id = NodeId::from((mblocks + a) as u32);
            down.push_row(msgs.iter().map(|&m| NodeId::from(m)))?;
            // Step 3: for each (msg, aux), create up-edge (aux, msg) and bump u[aux].
            for &m in msgs {
                up.add(&pool, NodeId::from(m), aux_id)?;
            }
            state.set_u(aux_id, msgs.len() as u32);
        }

        debug_assert_eq!(down.num_rows(), coblocks);

        Ok(Decoder { config, geometry, state, down, up, xor_lists, queue, pool })
    }
}
