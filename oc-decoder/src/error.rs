//! Error taxonomy (spec §7). `InvariantViolation` is deliberately **not** one of these types:
//! it signals a programming error and aborts via [`invariant`], never flows through a `Result`.

use thiserror::Error;

/// Invalid constructor arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `mblocks` must be at least 1.
    #[error("mblocks must be at least 1, got {0}")]
    InvalidMblocks(usize),

    /// `ablocks` must be at least 1.
    #[error("ablocks must be at least 1, got {0}")]
    InvalidAblocks(usize),

    /// The auxiliary mapping referenced a message or auxiliary id outside its valid range.
    #[error("aux mapping references out-of-range id {id} (mblocks={mblocks}, ablocks={ablocks})")]
    MappingOutOfRange { id: u32, mblocks: usize, ablocks: usize },

    /// `fudge` must be strictly greater than 1.0.
    #[error("fudge must be > 1.0, got {0}")]
    InvalidFudge(f64),
}

/// The pre-sized check-node space (spec §4.F step 1) has been exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("check-node space exhausted: capacity {capacity} already holds {in_use} nodes")]
pub struct CapacityError {
    pub capacity: usize,
    pub in_use: usize,
}

/// The shared node-pool allocator could not produce a cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("node-pool allocator exhausted (more than u32::MAX live cells)")]
pub struct AllocError;

/// The umbrella error returned by every fallible public operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Capacity(#[from] CapacityError),
    #[error(transparent)]
    Alloc(#[from] AllocError),
}

/// Panics with a uniform message when a decoder-internal invariant is violated.
///
/// This is the `InvariantViolation` kind from spec §7: it is never returned as a `Result`
/// because it indicates a bug, not a recoverable condition, and the decoder's state is
/// undefined afterward.
#[track_caller]
#[inline]
pub(crate) fn invariant(condition: bool, message: &str) {
    if !condition {
        panic!("oc-decoder invariant violation: {message}");
    }
}
