//! The collected cell that owns one native pointer.
//!
//! A [`GcWrapper`] is created either by owning construction
//! ([`GcWrapper::construct`]) or by adopting a pointer received from native
//! code ([`GcWrapper::adopt`]). Either way it is allocated in a
//! [`Collector`](crate::Collector) and released exactly once, when it is
//! finalized, dropped, or released explicitly.
//!
//! Releasing clears the stored pointer first. The object is then destroyed
//! only if the native graph reports no parent for it; otherwise the parent
//! keeps owning it.

use alloc::boxed::Box;
use core::any::type_name;
use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicBool, Ordering};

use bg_ptr::{AtomicErasedPtr, ErasedPtr};

use crate::fatal::{FatalError, fatal};
use crate::gc::{Finalize, Gc};
use crate::native::{IsA, NativeType};
use crate::registry::{Storage, Tracker, WrapPolicy};

// -----------------------------------------------------------------------------
// FromPtr

/// Marks [`GcWrapper::adopt`]: the pointer comes from native code instead of
/// an owning construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromPtr;

// -----------------------------------------------------------------------------
// Slot

enum Slot {
    Plain(AtomicErasedPtr),
    Tracked {
        tracker: Box<dyn Tracker>,
        released: AtomicBool,
    },
}

impl Slot {
    /// # Safety
    ///
    /// `ptr` points to a live object of the type `storage` was built for.
    unsafe fn new(ptr: ErasedPtr, storage: Storage) -> Self {
        match storage {
            Storage::Plain => Self::Plain(AtomicErasedPtr::new(ptr)),
            Storage::Tracked(track) => Self::Tracked {
                tracker: unsafe { track(ptr) },
                released: AtomicBool::new(false),
            },
        }
    }

    fn load(&self) -> ErasedPtr {
        match self {
            Self::Plain(ptr) => ptr.load(),
            Self::Tracked { tracker, released } => {
                if released.load(Ordering::Acquire) {
                    ErasedPtr::NULL
                } else {
                    tracker.get()
                }
            }
        }
    }

    /// Clears the slot. Only the first caller gets the pointer.
    fn take(&self) -> ErasedPtr {
        match self {
            Self::Plain(ptr) => ptr.take(),
            Self::Tracked { tracker, released } => {
                if released.swap(true, Ordering::AcqRel) {
                    ErasedPtr::NULL
                } else {
                    tracker.get()
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// RawWrapper

/// The part of a wrapper that does not depend on the pointee type.
struct RawWrapper {
    slot: Slot,
    policy: WrapPolicy,
    destroy: unsafe fn(ErasedPtr),
    type_name: &'static str,
}

unsafe fn destroy_erased<T: NativeType>(ptr: ErasedPtr) {
    unsafe { T::destroy(ptr.cast::<T>()) }
}

impl RawWrapper {
    fn release(&self) {
        let ptr = self.slot.take();
        if ptr.is_null() {
            return;
        }

        if let WrapPolicy::Wrapped(wrapped) = &self.policy {
            // SAFETY: the slot held `ptr` until the swap above.
            if unsafe { wrapped.has_parent(ptr) } {
                log::debug!(
                    "releasing `{}` at {ptr:p}, owned by its parent",
                    self.type_name
                );
                return;
            }
        }

        log::debug!("releasing `{}` at {ptr:p}, destroying it", self.type_name);
        // SAFETY: the pointer was live, parentless and is no longer reachable
        // through this wrapper.
        unsafe { (self.destroy)(ptr) }
    }
}

impl Drop for RawWrapper {
    fn drop(&mut self) {
        self.release();
    }
}

// -----------------------------------------------------------------------------
// GcWrapper

/// A collected cell owning one native pointer of type `T`.
///
/// The layout does not depend on `T`, which is what allows
/// [`Gc::narrow`] to reuse a wrapper as a wrapper
/// of a base type.
#[repr(transparent)]
pub struct GcWrapper<T: NativeType> {
    raw: RawWrapper,
    _marker: PhantomData<fn() -> T>,
}

impl<T: NativeType> GcWrapper<T> {
    /// Owning construction: calls `ctor` and takes ownership of the result.
    ///
    /// Takes the fatal path if `ctor` returns null.
    ///
    /// # Safety
    ///
    /// `ctor` returns a freshly created object that no other wrapper owns.
    #[track_caller]
    pub unsafe fn construct(policy: WrapPolicy, ctor: impl FnOnce() -> *mut T) -> Self {
        let Some(ptr) = NonNull::new(ctor()) else {
            fatal(FatalError::NullConstruct(type_name::<T>()))
        };
        // SAFETY: forwarded from the caller.
        unsafe { Self::from_non_null(ptr, policy) }
    }

    /// Adopts a pointer received from native code.
    ///
    /// # Safety
    ///
    /// `ptr` points to a live `T`, and no other wrapper owns it.
    #[inline]
    pub unsafe fn adopt(ptr: NonNull<T>, _: FromPtr, policy: WrapPolicy) -> Self {
        // SAFETY: forwarded from the caller.
        unsafe { Self::from_non_null(ptr, policy) }
    }

    unsafe fn from_non_null(ptr: NonNull<T>, policy: WrapPolicy) -> Self {
        let erased = ErasedPtr::from_non_null(ptr);
        crate::cfg::debug! { erased.debug_assert_aligned::<T>(); }
        log::trace!("wrapping `{}` at {erased:p} ({policy:?})", type_name::<T>());

        Self {
            raw: RawWrapper {
                slot: unsafe { Slot::new(erased, policy.storage()) },
                policy,
                destroy: destroy_erased::<T>,
                type_name: type_name::<T>(),
            },
            _marker: PhantomData,
        }
    }

    /// The native pointer.
    ///
    /// Takes the fatal path if the wrapper has been released or, for tracked
    /// storage, the native graph has destroyed the object.
    #[inline]
    #[track_caller]
    pub fn ptr(&self) -> NonNull<T> {
        match self.try_ptr() {
            Some(ptr) => ptr,
            None => fatal(FatalError::Released(self.raw.type_name)),
        }
    }

    /// The native pointer, or `None` once it is gone.
    #[inline]
    pub fn try_ptr(&self) -> Option<NonNull<T>> {
        self.raw.slot.load().to_non_null()
    }

    /// Returns `true` once the pointer is gone.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.raw.slot.load().is_null()
    }

    /// The policy this wrapper was created with.
    #[inline]
    pub fn policy(&self) -> WrapPolicy {
        self.raw.policy
    }

    /// Releases the pointer now instead of at finalization.
    ///
    /// Later calls, including the one made by finalization, do nothing.
    #[inline]
    pub fn release(&self) {
        self.raw.release();
    }
}

impl<T: NativeType> Finalize for GcWrapper<T> {
    fn finalize(&self) {
        self.release();
    }
}

impl<T: NativeType> fmt::Debug for GcWrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcWrapper")
            .field("type", &self.raw.type_name)
            .field("ptr", &self.raw.slot.load())
            .field("policy", &self.raw.policy)
            .finish()
    }
}

impl<S: NativeType> Gc<GcWrapper<S>> {
    /// Views the wrapper as a wrapper of base type `T`.
    ///
    /// The cell is shared: releasing either view releases both, and the
    /// object is still destroyed through `S`'s destructor.
    #[inline]
    pub fn narrow<T: NativeType>(self) -> Gc<GcWrapper<T>>
    where
        S: IsA<T>,
    {
        // SAFETY: `GcWrapper<_>` is a transparent `RawWrapper` for every
        // type, and `S: IsA<T>` makes the stored pointer valid as a `T`.
        unsafe { Gc::cast_unchecked(self) }
    }
}

// -----------------------------------------------------------------------------
// Tests
