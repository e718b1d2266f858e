use core::fmt;
use core::ptr::{self, NonNull};

// -----------------------------------------------------------------------------
// ErasedPtr

/// A nullable pointer to a native object whose type has been erased.
///
/// # Examples
///
/// ```
/// # use bg_ptr::ErasedPtr;
/// let mut x = 8i32;
/// let ptr = ErasedPtr::from_ptr(&raw mut x);
///
/// assert!(!ptr.is_null());
/// ptr.debug_assert_aligned::<i32>();
/// assert_eq!(ptr.cast::<i32>(), &raw mut x);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ErasedPtr(*mut ());

impl ErasedPtr {
    /// The null pointer.
    pub const NULL: Self = Self(ptr::null_mut());

    /// Erases the type of a mutable pointer.
    #[inline(always)]
    pub const fn from_ptr<T>(ptr: *mut T) -> Self {
        Self(ptr.cast())
    }

    /// Erases the type of a const pointer.
    ///
    /// The result carries no information about the original mutability.
    #[inline(always)]
    pub const fn from_const<T>(ptr: *const T) -> Self {
        Self(ptr.cast_mut().cast())
    }

    /// Erases the type of a non-null pointer.
    #[inline(always)]
    pub const fn from_non_null<T>(ptr: NonNull<T>) -> Self {
        Self(ptr.as_ptr().cast())
    }

    /// Returns `true` if the pointer is null.
    #[inline(always)]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }

    /// Returns the pointer as `NonNull`, or `None` if it is null.
    #[inline]
    pub fn to_non_null<T>(self) -> Option<NonNull<T>> {
        NonNull::new(self.cast::<T>())
    }

    /// Restores a typed pointer.
    ///
    /// This does not dereference anything and is therefore safe; using the
    /// result is where the type has to be right.
    #[inline(always)]
    pub const fn cast<T>(self) -> *mut T {
        self.0.cast()
    }

    /// Gets the untyped pointer.
    #[inline(always)]
    pub const fn as_ptr(self) -> *mut () {
        self.0
    }

    /// The address part of the pointer, for diagnostics and identity checks.
    #[inline(always)]
    pub fn addr(self) -> usize {
        self.0.addr()
    }

    /// Check if the pointer is aligned to type `T`.
    #[inline]
    pub fn is_aligned<T>(self) -> bool {
        self.0.cast::<T>().is_aligned()
    }

    /// A function that only checks alignment in debug mode.
    ///
    /// Null pointers pass, there is nothing to misalign.
    #[cfg_attr(debug_assertions, track_caller)]
    #[cfg_attr(not(debug_assertions), inline(always))]
    pub fn debug_assert_aligned<T>(self) {
        debug_assert!(
            self.is_null() || self.is_aligned::<T>(),
            "pointer is not aligned. Address {:p} does not have alignment {} for type {}",
            self.0,
            align_of::<T>(),
            core::any::type_name::<T>(),
        );
    }
}

impl Default for ErasedPtr {
    #[inline(always)]
    fn default() -> Self {
        Self::NULL
    }
}

impl<T> From<NonNull<T>> for ErasedPtr {
    #[inline(always)]
    fn from(ptr: NonNull<T>) -> Self {
        Self::from_non_null(ptr)
    }
}

impl fmt::Pointer for ErasedPtr {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.0, f)
    }
}

impl fmt::Debug for ErasedPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErasedPtr({:p})", self.0)
    }
}

// -----------------------------------------------------------------------------
// Tests
