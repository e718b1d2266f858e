use alloc::boxed::Box;
use core::fmt;

use bg_ptr::ErasedPtr;

use crate::native::NativeType;
use crate::registry::TypeKey;

// -----------------------------------------------------------------------------
// Parent lookup

/// Asks the native graph whether an object currently has a parent.
///
/// Implemented once per wrapped base type, usually through
/// [`bg_wrap!`](crate::bg_wrap).
pub trait ParentLookup: NativeType {
    /// Returns `true` if the object at `ptr` currently has a parent.
    ///
    /// # Safety
    ///
    /// `ptr` points to a live object of this type (or of a type that
    /// [`IsA`](crate::IsA) this one).
    unsafe fn has_parent(ptr: *const Self) -> bool;
}

/// Type-erased [`ParentLookup::has_parent`].
pub type HasParentFn = unsafe fn(ErasedPtr) -> bool;

unsafe fn erased_has_parent<T: ParentLookup>(ptr: ErasedPtr) -> bool {
    unsafe { T::has_parent(ptr.cast::<T>()) }
}

// -----------------------------------------------------------------------------
// Tracking

/// A weak reference into the native graph that clears itself when the native
/// side destroys the object.
pub trait Tracker: Send + Sync {
    /// The tracked object, or null once it has been destroyed.
    fn get(&self) -> ErasedPtr;
}

/// Native types that can hand out a self-clearing [`Tracker`].
pub trait Track: NativeType {
    /// Starts tracking the object at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` points to a live object of this type (or of a type that
    /// [`IsA`](crate::IsA) this one).
    unsafe fn track(ptr: *mut Self) -> Box<dyn Tracker>;
}

/// Type-erased [`Track::track`].
pub type TrackFn = unsafe fn(ErasedPtr) -> Box<dyn Tracker>;

unsafe fn erased_track<T: Track>(ptr: ErasedPtr) -> Box<dyn Tracker> {
    unsafe { T::track(ptr.cast::<T>()) }
}

// -----------------------------------------------------------------------------
// Storage

/// How a wrapper holds its native pointer.
#[derive(Clone, Copy)]
pub enum Storage {
    /// A plain pointer, cleared only by the wrapper itself.
    Plain,
    /// A [`Tracker`] that also observes destruction by the native graph.
    Tracked(TrackFn),
}

impl Storage {
    /// Tracked storage through `T`'s [`Track`] implementation.
    #[inline]
    pub const fn tracked<T: Track>() -> Self {
        Self::Tracked(erased_track::<T>)
    }

    /// Returns `true` for [`Storage::Tracked`].
    #[inline]
    pub const fn is_tracked(&self) -> bool {
        matches!(self, Self::Tracked(_))
    }
}

impl PartialEq for Storage {
    fn eq(&self, other: &Self) -> bool {
        self.is_tracked() == other.is_tracked()
    }
}

impl Eq for Storage {}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_tracked() { "Tracked" } else { "Plain" })
    }
}

// -----------------------------------------------------------------------------
// Wrapped

/// The wrapping rule of one wrapped base type, shared by all its descendants.
#[derive(Clone, Copy)]
pub struct Wrapped {
    base: TypeKey,
    storage: Storage,
    has_parent: HasParentFn,
}

impl Wrapped {
    /// The rule for base type `T`.
    pub fn of<T: ParentLookup>(storage: Storage) -> Self {
        Self {
            base: TypeKey::of::<T>(),
            storage,
            has_parent: erased_has_parent::<T>,
        }
    }

    /// The registered base type that carries this rule.
    #[inline]
    pub const fn base(&self) -> TypeKey {
        self.base
    }

    /// How wrappers hold the pointer.
    #[inline]
    pub const fn storage(&self) -> Storage {
        self.storage
    }

    /// Asks the native graph whether `ptr` currently has a parent.
    ///
    /// # Safety
    ///
    /// `ptr` points to a live object whose type is-a [`base`](Self::base).
    #[inline]
    pub unsafe fn has_parent(&self, ptr: ErasedPtr) -> bool {
        unsafe { (self.has_parent)(ptr) }
    }
}

impl PartialEq for Wrapped {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.storage == other.storage
    }
}

impl Eq for Wrapped {}

impl fmt::Debug for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("base", &self.base)
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// WrapPolicy

/// Whether handles of a type go through a collected wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WrapPolicy {
    /// Handles carry the raw pointer; the bridge never destroys the object.
    #[default]
    Unwrapped,
    /// Handles go through a [`GcWrapper`](crate::GcWrapper) using this rule.
    Wrapped(Wrapped),
}

impl WrapPolicy {
    /// Returns `true` for [`WrapPolicy::Wrapped`].
    #[inline]
    pub const fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped(_))
    }

    /// The wrapping rule, if any.
    #[inline]
    pub const fn wrapped(&self) -> Option<&Wrapped> {
        match self {
            Self::Wrapped(wrapped) => Some(wrapped),
            Self::Unwrapped => None,
        }
    }

    /// The wrapped base type, if any.
    #[inline]
    pub fn base(&self) -> Option<TypeKey> {
        self.wrapped().map(Wrapped::base)
    }

    /// The storage wrappers use. Unwrapped types fall back to [`Storage::Plain`].
    #[inline]
    pub fn storage(&self) -> Storage {
        self.wrapped().map_or(Storage::Plain, Wrapped::storage)
    }
}
