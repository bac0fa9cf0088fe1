use alloc::vec::Vec;
use core::{marker::PhantomData, ops};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Idx;

/// Error returned when too many items are added to an [`IndexVec`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexedVecError {
    /// The number of items exceeds the maximum supported by the ID type.
    #[error("IndexVec contains the maximum number of items")]
    TooManyItems,
}

/// A dense vector indexed by an [`Idx`] type.
///
/// Provides O(1) access and O(1) amortised append, keyed by a typed ID rather than a bare
/// `usize`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexVec<I: Idx, T> {
    raw: Vec<T>,
    #[cfg_attr(feature = "serde", serde(skip))]
    _marker: PhantomData<I>,
}

impl<I: Idx, T> Default for IndexVec<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Idx, T> IndexVec<I, T> {
    /// Creates a new, empty [`IndexVec`].
    #[inline]
    pub fn new() -> Self {
        Self { raw: Vec::new(), _marker: PhantomData }
    }

    /// Creates a new [`IndexVec`] with pre-allocated capacity.
    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            raw: Vec::with_capacity(n),
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the vector holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Appends an element, returning the ID it was assigned.
    ///
    /// # Errors
    ///
    /// Returns [`IndexedVecError::TooManyItems`] if the new length would exceed `u32::MAX`.
    #[inline]
    pub fn push(&mut self, v: T) -> Result<I, IndexedVecError> {
        if self.raw.len() >= u32::MAX as usize {
            return Err(IndexedVecError::TooManyItems);
        }
        let id = I::from(self.raw.len() as u32);
        self.raw.push(v);
        Ok(id)
    }

    /// Returns a reference to the element at `idx`, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, idx: I) -> Option<&T> {
        self.raw.get(idx.to_usize())
    }

    /// Returns a mutable reference to the element at `idx`, or `None` if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, idx: I) -> Option<&mut T> {
        self.raw.get_mut(idx.to_usize())
    }

    /// Returns a slice over all elements, in ID order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.raw
    }

    /// Returns an iterator over `(id, &value)` pairs.
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (I, &T)> {
        self.raw.iter().enumerate().map(|(i, v)| (I::from(i as u32), v))
    }

    /// Returns an iterator over all elements.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.raw.iter()
    }
}

impl<I: Idx, T> ops::Index<I> for IndexVec<I, T> {
    type Output = T;
    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        &self.raw[index.to_usize()]
    }
}

impl<I: Idx, T> ops::IndexMut<I> for IndexVec<I, T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        &mut self.raw[index.to_usize()]
    }
}

/// A dense mapping from one ID space to another.
///
/// Equivalent to `IndexVec<From, Option<To>>`, growing on insert rather than requiring the
/// final size up front.
#[derive(Clone, Debug)]
pub struct DenseIdMap<From: Idx, To: Idx> {
    inner: Vec<Option<To>>,
    _marker: PhantomData<From>,
}

impl<From: Idx, To: Idx> DenseIdMap<From, To> {
    /// Creates a new mapping with room for `capacity` source IDs.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: alloc::vec![None; capacity],
            _marker: PhantomData,
        }
    }

    /// Inserts a mapping from `k` to `v`, growing the backing storage if needed.
    #[inline]
    pub fn insert(&mut self, k: From, v: To) {
        let idx = k.to_usize();
        if idx >= self.inner.len() {
            self.inner.resize(idx + 1, None);
        }
        self.inner[idx] = Some(v);
    }

    /// Returns the target ID mapped from `k`, if any.
    #[inline]
    pub fn get(&self, k: From) -> Option<To> {
        self.inner.get(k.to_usize()).copied().flatten()
    }

    /// Returns the number of source slots in this mapping.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the mapping has no source slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
