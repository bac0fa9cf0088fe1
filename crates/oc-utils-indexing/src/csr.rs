//! Compressed Sparse Row storage for variable-length, append-only row data.
//!
//! A generic [`CsrMatrix`] maps row indices to variable-length data. Used for storing
//! auxiliary-node down-neighbour sets and similar dense, never-shrinking sparse mappings.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Idx, IndexVec, IndexedVecError};

/// Errors that can occur while validating a [`CsrMatrix`]'s structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsrValidationError {
    /// The `indptr` array must start at 0.
    #[error("indptr must start at 0, got {0}")]
    IndptrStartNotZero(usize),

    /// The `indptr` array must be monotonically increasing.
    #[error("indptr not monotonic at index {index}: {prev} > {curr}")]
    IndptrNotMonotonic { index: usize, prev: usize, curr: usize },

    /// The last `indptr` value must equal `data.len()`.
    #[error("indptr ends at {indptr_end}, but data.len() is {data_len}")]
    IndptrDataMismatch { indptr_end: usize, data_len: usize },
}

/// Compressed Sparse Row matrix mapping row indices to variable-length data.
///
/// For row `i`, its data lives at `data[indptr[i]..indptr[i+1]]`. Rows are appended in order
/// and never mutated afterward — this is the right shape for the auxiliary-node down-edge
/// sets, which are fixed once built at init time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CsrMatrix<I: Idx, D> {
    data: Vec<D>,
    indptr: IndexVec<I, usize>,
}

impl<I: Idx, D> Default for CsrMatrix<I, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Idx, D> CsrMatrix<I, D> {
    /// Creates a new, empty [`CsrMatrix`].
    pub fn new() -> Self {
        Self { data: Vec::new(), indptr: IndexVec::new() }
    }

    /// Creates a [`CsrMatrix`] with pre-allocated capacity for `rows` rows and `data` total
    /// elements.
    pub fn with_capacity(rows: usize, data: usize) -> Self {
        Self {
            data: Vec::with_capacity(data),
            indptr: IndexVec::with_capacity(rows + 1),
        }
    }

    /// Appends a new row with the given values, returning the row's ID.
    pub fn push_row(&mut self, values: impl IntoIterator<Item = D>) -> Result<I, IndexedVecError> {
        if self.indptr.is_empty() {
            self.indptr.push(0)?;
        }
        let row_idx = self.num_rows();
        self.data.extend(values);
        self.indptr.push(self.data.len())?;
        Ok(I::from(row_idx as u32))
    }

    /// Returns the number of rows.
    pub fn num_rows(&self) -> usize {
        if self.indptr.is_empty() { 0 } else { self.indptr.len() - 1 }
    }

    /// Returns the data slice for `row`, or `None` if out of bounds.
    pub fn row(&self, row: I) -> Option<&[D]> {
        let row_idx = row.to_usize();
        if row_idx >= self.num_rows() {
            return None;
        }
        let start = self.indptr[row];
        let end = self.indptr[I::from((row_idx + 1) as u32)];
        Some(&self.data[start..end])
    }

    /// Validates the CSR structural invariants (monotonic `indptr`, consistent end marker).
    pub fn validate(&self) -> Result<(), CsrValidationError> {
        let indptr = self.indptr.as_slice();
        if indptr.is_empty() {
            return Ok(());
        }
        if indptr[0] != 0 {
            return Err(CsrValidationError::IndptrStartNotZero(indptr[0]));
        }
        for i in 1..indptr.len() {
            if indptr[i - 1] > indptr[i] {
                return Err(CsrValidationError::IndptrNotMonotonic {
                    index: i,
                    prev: indptr[i - 1],
                    curr: indptr[i],
                });
            }
        }
        let last = *indptr.last().expect("indptr is non-empty");
        if last != self.data.len() {
            return Err(CsrValidationError::IndptrDataMismatch {
                indptr_end: last,
                data_len: self.data.len(),
            });
        }
        Ok(())
    }
}
