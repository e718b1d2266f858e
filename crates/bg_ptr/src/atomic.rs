use core::fmt;
use core::sync::atomic::{AtomicPtr, Ordering};

use crate::ErasedPtr;

// -----------------------------------------------------------------------------
// AtomicErasedPtr

/// An [`ErasedPtr`] slot shared between threads.
///
/// The slot only ever moves from "set" to "null". [`take`](Self::take) is a
/// single atomic swap, so when several threads race to clear the slot exactly
/// one of them observes the pointer.
///
/// # Examples
///
/// ```
/// # use bg_ptr::{AtomicErasedPtr, ErasedPtr};
/// let mut x = 1u8;
/// let slot = AtomicErasedPtr::new(ErasedPtr::from_ptr(&raw mut x));
///
/// assert!(!slot.take().is_null());
/// assert!(slot.take().is_null());
/// assert!(slot.is_null());
/// ```
#[repr(transparent)]
pub struct AtomicErasedPtr(AtomicPtr<()>);

impl AtomicErasedPtr {
    /// Creates a slot holding `ptr`.
    #[inline]
    pub const fn new(ptr: ErasedPtr) -> Self {
        Self(AtomicPtr::new(ptr.as_ptr()))
    }

    /// Creates an empty slot.
    #[inline]
    pub const fn null() -> Self {
        Self::new(ErasedPtr::NULL)
    }

    /// Reads the current pointer.
    #[inline]
    pub fn load(&self) -> ErasedPtr {
        ErasedPtr::from_ptr(self.0.load(Ordering::Acquire))
    }

    /// Returns `true` if the slot has been cleared (or was never set).
    #[inline]
    pub fn is_null(&self) -> bool {
        self.load().is_null()
    }

    /// Clears the slot and returns what it held.
    ///
    /// Returns null if the slot was already empty.
    #[inline]
    pub fn take(&self) -> ErasedPtr {
        ErasedPtr::from_ptr(self.0.swap(core::ptr::null_mut(), Ordering::AcqRel))
    }
}

impl Default for AtomicErasedPtr {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for AtomicErasedPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtomicErasedPtr({:p})", self.load())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    extern crate std;

    use super::AtomicErasedPtr;
    use crate::ErasedPtr;

    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn empty_slot() {
        let slot = AtomicErasedPtr::default();
        assert!(slot.is_null());
        assert!(slot.take().is_null());
    }

    #[test]
    fn take_once_across_threads() {
        static WINNERS: AtomicUsize = AtomicUsize::new(0);

        let mut value = 7u32;
        let slot = AtomicErasedPtr::new(ErasedPtr::from_ptr(&raw mut value));

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    if !slot.take().is_null() {
                        WINNERS.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }
        });

        assert_eq!(WINNERS.load(Ordering::Relaxed), 1);
        assert!(slot.is_null());
    }
}
