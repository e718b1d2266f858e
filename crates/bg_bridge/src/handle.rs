//! The caller-facing reference to a native object.

use core::any::type_name;
use core::fmt;
use core::ops::Deref;
use core::ptr::{self, NonNull};

use crate::bridge::Bridge;
use crate::fatal::{FatalError, fatal};
use crate::gc::Gc;
use crate::native::{IsA, NativeType};
use crate::registry::WrapPolicy;
use crate::wrapper::{FromPtr, GcWrapper};

enum Repr<T: NativeType> {
    Null,
    Plain(NonNull<T>),
    Managed(Gc<GcWrapper<T>>),
}

/// A nullable reference to a native `T`.
///
/// Wrapped types go through a shared [`GcWrapper`]; unwrapped types carry
/// the raw pointer. Dereferencing a null handle, or a handle whose wrapper
/// has released its object, takes the fatal path.
pub struct SafeHandle<T: NativeType> {
    repr: Repr<T>,
}

impl<T: NativeType> SafeHandle<T> {
    /// The null handle.
    #[inline]
    pub const fn null() -> Self {
        Self { repr: Repr::Null }
    }

    /// Takes a pointer received from native code, using the process-wide
    /// [`Bridge`].
    ///
    /// # Safety
    ///
    /// See [`from_raw_in`](Self::from_raw_in).
    #[inline]
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        unsafe { Self::from_raw_in(Bridge::global(), ptr) }
    }

    /// Takes a pointer received from native code.
    ///
    /// Null gives the null handle without allocating. For a wrapped `T` a new
    /// wrapper is allocated in `bridge`'s collector.
    ///
    /// # Safety
    ///
    /// `ptr` is null or points to a live `T`. If `T` is wrapped, no other
    /// wrapper owns the object.
    pub unsafe fn from_raw_in(bridge: &Bridge, ptr: *mut T) -> Self {
        let Some(ptr) = NonNull::new(ptr) else {
            return Self::null();
        };

        match bridge.policy::<T>() {
            WrapPolicy::Unwrapped => Self {
                repr: Repr::Plain(ptr),
            },
            policy => {
                // SAFETY: forwarded from the caller.
                let wrapper = unsafe { GcWrapper::adopt(ptr, FromPtr, policy) };
                Self::from_wrapper(bridge.collector().alloc(wrapper))
            }
        }
    }

    /// A handle sharing an existing wrapper.
    #[inline]
    pub fn from_wrapper(wrapper: Gc<GcWrapper<T>>) -> Self {
        Self {
            repr: Repr::Managed(wrapper),
        }
    }

    /// Views the handle as a handle to base type `U`, sharing the wrapper.
    pub fn narrow<U: NativeType>(self) -> SafeHandle<U>
    where
        T: IsA<U>,
    {
        let repr = match self.repr {
            Repr::Null => Repr::Null,
            Repr::Plain(ptr) => Repr::Plain(ptr.cast::<U>()),
            Repr::Managed(wrapper) => Repr::Managed(wrapper.narrow::<U>()),
        };
        SafeHandle { repr }
    }

    /// Returns `true` for the null handle.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self.repr, Repr::Null)
    }

    /// Returns `true` if the handle goes through a wrapper.
    #[inline]
    pub fn is_managed(&self) -> bool {
        matches!(self.repr, Repr::Managed(_))
    }

    /// The wrapper behind the handle, if any.
    #[inline]
    pub fn wrapper(&self) -> Option<&Gc<GcWrapper<T>>> {
        match &self.repr {
            Repr::Managed(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    /// The native pointer.
    ///
    /// Takes the fatal path for the null handle and for a released wrapper.
    #[track_caller]
    pub fn as_ptr(&self) -> NonNull<T> {
        match &self.repr {
            Repr::Null => fatal(FatalError::NullHandle(type_name::<T>())),
            Repr::Plain(ptr) => *ptr,
            Repr::Managed(wrapper) => wrapper.ptr(),
        }
    }

    /// The pointer to pass back to native code; null for the null handle.
    ///
    /// Takes the fatal path for a released wrapper.
    #[track_caller]
    pub fn to_raw(&self) -> *mut T {
        match &self.repr {
            Repr::Null => ptr::null_mut(),
            Repr::Plain(ptr) => ptr.as_ptr(),
            Repr::Managed(wrapper) => wrapper.ptr().as_ptr(),
        }
    }
}

impl<T: NativeType> Deref for SafeHandle<T> {
    type Target = T;

    #[track_caller]
    fn deref(&self) -> &T {
        // SAFETY: `as_ptr` only returns pointers the handle still refers to;
        // the native graph keeps them alive until it destroys them itself.
        unsafe { self.as_ptr().as_ref() }
    }
}

impl<T: NativeType> Clone for SafeHandle<T> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Null => Repr::Null,
            Repr::Plain(ptr) => Repr::Plain(*ptr),
            Repr::Managed(wrapper) => Repr::Managed(wrapper.clone()),
        };
        Self { repr }
    }
}

impl<T: NativeType> Default for SafeHandle<T> {
    #[inline]
    fn default() -> Self {
        Self::null()
    }
}

impl<T: NativeType> fmt::Debug for SafeHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Null => write!(f, "SafeHandle<{}>(null)", type_name::<T>()),
            Repr::Plain(ptr) => write!(f, "SafeHandle<{}>({:p})", type_name::<T>(), ptr.as_ptr()),
            Repr::Managed(wrapper) => f.debug_tuple("SafeHandle").field(&**wrapper).finish(),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
