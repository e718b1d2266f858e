use crate::registry::{TypeKey, Wrapped};

// -----------------------------------------------------------------------------
// Registration

/// One declaration about the native type lineage.
///
/// Produced by [`bg_native!`](crate::bg_native), [`bg_wrap!`](crate::bg_wrap)
/// and [`bg_no_wrap!`](crate::bg_no_wrap), or built by hand and passed to
/// [`RegistryBuilder::add`](crate::registry::RegistryBuilder::add).
///
/// Fields are functions because a [`TypeKey`] cannot be built in a `static`.
#[derive(Clone, Copy, Debug)]
pub enum Registration {
    /// `ty` directly inherits from each of `bases`.
    Native {
        ty: fn() -> TypeKey,
        bases: &'static [fn() -> TypeKey],
    },
    /// `wrapped().base()` is a wrapped base type.
    Wrap { wrapped: fn() -> Wrapped },
    /// `ty` itself is never wrapped, whatever its ancestors are.
    NoWrap { ty: fn() -> TypeKey },
}

crate::cfg::auto_register! {
    inventory::collect!(Registration);
}

// -----------------------------------------------------------------------------
// Macros

/// Declares a native type and its direct bases.
///
/// Implements [`IsA`](crate::IsA) for each base and, with the `auto_register`
/// feature, submits a [`Registration::Native`] for
/// [`RegistryBuilder::auto_register`](crate::registry::RegistryBuilder::auto_register).
///
/// The registry follows lineage transitively, but [`IsA`](crate::IsA) is only
/// implemented for the listed bases: list every ancestor a handle should
/// [`narrow`](crate::SafeHandle::narrow) to in one step.
///
/// # Safety
///
/// The macro asserts the [`IsA`](crate::IsA) contract: a pointer to the type
/// must be usable unchanged as a pointer to every listed base.
///
/// # Examples
///
/// ```ignore
/// bg_native!(Widget);
/// bg_native!(Button: Widget);
/// bg_native!(Toggle: Button, Widget);
/// ```
#[macro_export]
macro_rules! bg_native {
    ($ty:ty $(: $($base:ty),+)? $(,)?) => {
        $($(
            unsafe impl $crate::IsA<$base> for $ty {}
        )+)?

        $crate::cfg::auto_register! {
            $crate::__macro_exports::inventory::submit! {
                $crate::registry::Registration::Native {
                    ty: $crate::registry::TypeKey::of::<$ty>,
                    bases: &[$($($crate::registry::TypeKey::of::<$base>),+)?],
                }
            }
        }
    };
}

/// Declares a wrapped base type.
///
/// The second argument selects the [`Storage`](crate::registry::Storage):
/// `Plain`, or `Tracked` for types implementing
/// [`Track`](crate::registry::Track). The third is a function returning the
/// object's parent pointer, which implements
/// [`ParentLookup`](crate::registry::ParentLookup) for the type.
///
/// # Examples
///
/// ```ignore
/// unsafe fn widget_parent(widget: *const Widget) -> *mut Widget { /* .. */ }
///
/// bg_wrap!(Widget, Tracked, widget_parent);
/// ```
#[macro_export]
macro_rules! bg_wrap {
    (@storage $ty:ty, Plain) => {
        $crate::registry::Storage::Plain
    };
    (@storage $ty:ty, Tracked) => {
        $crate::registry::Storage::tracked::<$ty>()
    };
    ($ty:ty, $storage:ident, $parent:path $(,)?) => {
        impl $crate::registry::ParentLookup for $ty {
            unsafe fn has_parent(ptr: *const Self) -> bool {
                !unsafe { $parent(ptr) }.is_null()
            }
        }

        $crate::cfg::auto_register! {
            $crate::__macro_exports::inventory::submit! {
                $crate::registry::Registration::Wrap {
                    wrapped: || {
                        $crate::registry::Wrapped::of::<$ty>($crate::bg_wrap!(@storage $ty, $storage))
                    },
                }
            }
        }
    };
}

/// Excludes types from wrapping, even when an ancestor is wrapped.
///
/// Typically used for types whose destructor is not accessible. The
/// exclusion applies to the named types only, not to their descendants.
///
/// Without the `auto_register` feature this expands to nothing; repeat the
/// exclusions through
/// [`RegistryBuilder::no_wrap`](crate::registry::RegistryBuilder::no_wrap).
///
/// # Examples
///
/// ```ignore
/// bg_no_wrap!(PrivateWidget);
/// ```
#[macro_export]
macro_rules! bg_no_wrap {
    ($($ty:ty),+ $(,)?) => {
        $(
            $crate::cfg::auto_register! {
                $crate::__macro_exports::inventory::submit! {
                    $crate::registry::Registration::NoWrap {
                        ty: $crate::registry::TypeKey::of::<$ty>,
                    }
                }
            }
        )+
    };
}
