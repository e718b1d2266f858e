use crate::fatal::{FatalError, fatal};

// -----------------------------------------------------------------------------
// NativeType

/// A type that lives in a native, parent-owned object graph.
///
/// The bridge never moves or copies these values; it only holds pointers to
/// them and, when it owns one, destroys it through [`destroy`](Self::destroy).
pub trait NativeType: Sized + 'static {
    /// Destroys an object the bridge owns.
    ///
    /// Types that keep the default have no destructor the bridge may call.
    /// Destroying one takes the fatal path, so such types should be excluded
    /// with [`bg_no_wrap!`](crate::bg_no_wrap) or never be owned by a wrapper.
    ///
    /// # Safety
    ///
    /// `ptr` is non-null, points to a live object of this type (or of a type
    /// that [`IsA`] this one), and nothing else will destroy it afterwards.
    unsafe fn destroy(ptr: *mut Self) {
        let _ = ptr;
        fatal(FatalError::NoDestructor(core::any::type_name::<Self>()))
    }
}

// -----------------------------------------------------------------------------
// IsA

/// `Self` is-a `T` in the native type lineage.
///
/// # Safety
///
/// A pointer to a `Self` must be usable, unchanged, as a pointer to a `T`.
/// In practice `T` is the first field of a `#[repr(C)]` `Self`, or `Self` is
/// an opaque handle whose native side guarantees the same address.
pub unsafe trait IsA<T: NativeType>: NativeType {}

// Every type is-a itself.
unsafe impl<T: NativeType> IsA<T> for T {}
