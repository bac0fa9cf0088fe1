#![cfg_attr(not(feature = "std"), no_std)]

//! A process-wide, reference-counted singleton behind a lock.
//!
//! This is the synchronization primitive the decoder's node-pool allocator is built on: many
//! decoder instances share one pool, the pool is lazily created on first use, and it is torn
//! down only once every instance that referenced it has dropped. `RefCountedSingleton` factors
//! that lifecycle out of the allocator so the allocator itself only has to know about cells.

extern crate alloc;

#[cfg(feature = "std")]
use parking_lot::Mutex;

#[cfg(not(feature = "std"))]
use lock_api::Mutex as LockApiMutex;
#[cfg(not(feature = "std"))]
type Mutex<T> = LockApiMutex<spin_fallback::RawSpin, T>;

// `once_cell::sync::OnceCell` is gated behind once_cell's own `std` feature, which this crate
// only turns on along with its own `std` feature (see Cargo.toml). Under `no_std` the crate
// only carries once_cell's `race` feature, so the lazily-initialized cell has to be built on
// `once_cell::race::OnceBox` (alloc-only, CAS-based) instead; `LazyCell` below hides that
// difference behind one shared interface.
#[cfg(feature = "std")]
use once_cell::sync::OnceCell as LazyCell;
#[cfg(not(feature = "std"))]
use no_std_cell::LazyCell;

#[cfg(not(feature = "std"))]
mod no_std_cell {
    use alloc::boxed::Box;
    use once_cell::race::OnceBox;

    /// A `once_cell::sync::OnceCell`-shaped lazy cell built on `OnceBox` for `no_std`.
    pub struct LazyCell<T>(OnceBox<T>);

    impl<T> LazyCell<T> {
        pub const fn new() -> Self {
            Self(OnceBox::new())
        }

        pub fn get_or_init(&self, f: impl FnOnce() -> T) -> &T {
            self.0.get_or_init(|| Box::new(f()))
        }

        pub fn get(&self) -> Option<&T> {
            self.0.get()
        }
    }
}

#[cfg(not(feature = "std"))]
mod spin_fallback {
    //! Minimal spinlock used only when the `std` feature is disabled.
    use core::sync::atomic::{AtomicBool, Ordering};

    pub struct RawSpin(AtomicBool);

    // SAFETY: `lock`/`unlock` only ever touch the single atomic flag.
    unsafe impl lock_api::RawMutex for RawSpin {
        const INIT: RawSpin = RawSpin(AtomicBool::new(false));
        type GuardMarker = lock_api::GuardSend;

        fn lock(&self) {
            while self
                .0
                .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
                .is_err()
            {
                core::hint::spin_loop();
            }
        }

        fn try_lock(&self) -> bool {
            self.0.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed).is_ok()
        }

        unsafe fn unlock(&self) {
            self.0.store(false, Ordering::Release);
        }
    }
}

/// A lazily-initialized, reference-counted value shared by every live holder.
///
/// `T::default()` builds the value the first time a holder asks for it; the value is dropped
/// and replaced the next time it's asked for after the last holder has released it (tracked via
/// [`RefCountedSingleton::acquire`]/[`RefCountedSingleton::release`]).
pub struct RefCountedSingleton<T> {
    cell: LazyCell<Mutex<Shared<T>>>,
    init: fn() -> T,
}

struct Shared<T> {
    value: T,
    holders: usize,
}

impl<T> RefCountedSingleton<T> {
    /// Creates a new singleton that lazily builds its value with `init` on first acquisition.
    pub const fn new(init: fn() -> T) -> Self {
        Self { cell: LazyCell::new(), init }
    }

    /// Registers a new holder and runs `f` against the shared value, initializing it if this is
    /// the first live holder.
    pub fn acquire<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mutex = self.cell.get_or_init(|| {
            Mutex::new(Shared { value: (self.init)(), holders: 0 })
        });
        let mut guard = mutex.lock();
        guard.holders += 1;
        f(&mut guard.value)
    }

    /// Runs `f` against the shared value without registering a new holder. Panics if no holder
    /// has ever called [`acquire`](Self::acquire).
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mutex = self.cell.get().expect("RefCountedSingleton::with called before acquire");
        let mut guard = mutex.lock();
        f(&mut guard.value)
    }

    /// Releases one holder's reference. When the last holder releases, `reset` is run against
    /// the value and it is left in place for the next `acquire` to reuse (avoiding a
    /// reallocation if a new decoder instance shows up immediately after).
    pub fn release(&self, reset: impl FnOnce(&mut T)) {
        if let Some(mutex) = self.cell.get() {
            let mut guard = mutex.lock();
            guard.holders = guard.holders.saturating_sub(1);
            if guard.holders == 0 {
                reset(&mut guard.value);
            }
        }
    }

    /// Returns the number of currently registered holders (for diagnostics/tests only).
    pub fn holder_count(&self) -> usize {
        self.cell.get().map(|m| m.lock().holders).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static COUNTER: RefCountedSingleton<u32> = RefCountedSingleton::new(|| 0);

    #[test]
    fn acquire_initializes_once_and_counts_holders() {
        COUNTER.acquire(|v| *v += 1);
        COUNTER.acquire(|v| *v += 1);
        assert_eq!(COUNTER.holder_count(), 2);
        assert!(COUNTER.with(|v| *v) >= 2);
    }

    #[test]
    fn release_resets_value_when_last_holder_leaves() {
        static SOLO: RefCountedSingleton<alloc::vec::Vec<u8>> = RefCountedSingleton::new(alloc::vec::Vec::new);
        SOLO.acquire(|v| v.push(1));
        assert_eq!(SOLO.holder_count(), 1);
        SOLO.release(|v| v.clear());
        assert_eq!(SOLO.holder_count(), 0);
        assert_eq!(SOLO.with(|v| v.len()), 0);
    }
}
