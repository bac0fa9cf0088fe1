#![cfg_attr(not(feature = "std"), no_std)]

//! `u32`-backed newtype IDs and the dense, ID-indexed containers built on top of them.
//!
//! This crate generalizes a pattern used throughout graph-shaped decoders: every node, edge,
//! or row in a sparse structure gets a small `Copy` ID type instead of a raw `usize`, so the
//! compiler catches mismatches between, say, a message-node ID and a check-node ID even though
//! both are plain integers underneath.

extern crate alloc;

mod csr;
mod index_vec;

pub use csr::{CsrMatrix, CsrValidationError};
pub use index_vec::{DenseIdMap, IndexVec, IndexedVecError};

use core::fmt::Debug;

/// A trait for `u32`-backed, 0-based IDs.
pub trait Idx: Copy + Eq + Ord + Debug + From<u32> + Into<u32> {
    /// Convert from this ID type to `usize`.
    #[inline]
    fn to_usize(self) -> usize {
        self.into() as usize
    }
}

/// Declares a newtype wrapping a `u32` that implements [`Idx`].
#[macro_export]
macro_rules! newtype_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(v: u32) -> Self {
                Self(v)
            }
        }

        impl From<$name> for u32 {
            #[inline]
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(v: usize) -> Self {
                Self(v as u32)
            }
        }

        impl $crate::Idx for $name {}
    };
}
