//! Foreign function pointers with an optional captured context.
//!
//! A [`Proc`] is the `#[repr(C)]` pair native code uses for callbacks: one
//! function pointer plus a context pointer. A null context selects the
//! capture-free form `fn(args..) -> R`; a non-null one selects the
//! capture-accepting form `fn(context, args..) -> R`.
//!
//! Signatures are written as Rust function pointer types, so a callback
//! taking an `i32` and a `bool` and returning `u8` is a
//! `Proc<fn(i32, bool) -> u8>`. Arities from 0 to 8 are supported.

use alloc::boxed::Box;
use core::any::type_name;
use core::ffi::c_void;
use core::fmt;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr::{self, NonNull};

use crate::fatal::{FatalError, fatal};

// -----------------------------------------------------------------------------
// Signature

/// A callback signature, spelled as a Rust function pointer type.
pub trait Signature: Copy + 'static {
    /// `unsafe extern "C" fn(*mut c_void, args..) -> R`.
    type WithContext: Copy;
    /// `unsafe extern "C" fn(args..) -> R`.
    type WithoutContext: Copy;
}

// -----------------------------------------------------------------------------
// Proc

#[repr(C)]
union Entry<S: Signature> {
    with_context: ManuallyDrop<S::WithContext>,
    without_context: ManuallyDrop<S::WithoutContext>,
    raw: *const c_void,
}

impl<S: Signature> Clone for Entry<S> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Signature> Copy for Entry<S> {}

/// A callable foreign function pointer with an optional context.
///
/// `Proc` has no ownership over the context; whoever built it keeps the
/// context alive. See [`ProcBox`] for a `Proc` that owns a Rust closure.
#[repr(C)]
pub struct Proc<S: Signature> {
    entry: Entry<S>,
    context: *mut c_void,
    _marker: PhantomData<S>,
}

impl<S: Signature> Proc<S> {
    /// The invalid proc. Calling it takes the fatal path.
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            entry: Entry { raw: ptr::null() },
            context: ptr::null_mut(),
            _marker: PhantomData,
        }
    }

    /// A proc calling `func` with `context` as its first argument.
    #[inline]
    pub fn with_context(func: S::WithContext, context: NonNull<c_void>) -> Self {
        Self {
            entry: Entry {
                with_context: ManuallyDrop::new(func),
            },
            context: context.as_ptr(),
            _marker: PhantomData,
        }
    }

    /// A proc calling `func` with exactly the call arguments.
    #[inline]
    pub fn without_context(func: S::WithoutContext) -> Self {
        Self {
            entry: Entry {
                without_context: ManuallyDrop::new(func),
            },
            context: ptr::null_mut(),
            _marker: PhantomData,
        }
    }

    /// Rebuilds a proc received from native code.
    ///
    /// # Safety
    ///
    /// `func` is null or a function of the form selected by `context`:
    /// capture-accepting when `context` is non-null, capture-free otherwise,
    /// with the argument and return types of `S`.
    #[inline]
    pub const unsafe fn from_raw_parts(func: *const c_void, context: *mut c_void) -> Self {
        Self {
            entry: Entry { raw: func },
            context,
            _marker: PhantomData,
        }
    }

    /// Returns `true` unless this is the invalid proc.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.as_raw().is_null()
    }

    /// The function pointer, untyped.
    #[inline]
    pub fn as_raw(&self) -> *const c_void {
        // SAFETY: every variant is a pointer of the same size.
        unsafe { self.entry.raw }
    }

    /// The context pointer; null for the capture-free form.
    #[inline]
    pub fn context(&self) -> *mut c_void {
        self.context
    }

    #[cold]
    #[inline(never)]
    #[track_caller]
    fn invalid_call() -> ! {
        fatal(FatalError::InvalidProc(type_name::<S>()))
    }
}

impl<S: Signature> Clone for Proc<S> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Signature> Copy for Proc<S> {}

impl<S: Signature> Default for Proc<S> {
    #[inline]
    fn default() -> Self {
        Self::invalid()
    }
}

impl<S: Signature> fmt::Debug for Proc<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proc")
            .field("signature", &type_name::<S>())
            .field("func", &self.as_raw())
            .field("context", &self.context)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ProcBox

/// A [`Proc`] that owns a Rust closure as its context.
///
/// The proc handed out by [`as_proc`](Self::as_proc) stays valid while the
/// `ProcBox` lives.
pub struct ProcBox<S: Signature> {
    proc: Proc<S>,
    drop_context: unsafe fn(*mut c_void),
}

unsafe fn drop_context<F>(context: *mut c_void) {
    drop(unsafe { Box::from_raw(context.cast::<F>()) });
}

impl<S: Signature> ProcBox<S> {
    /// The capture-accepting proc dispatching to the closure.
    #[inline]
    pub fn as_proc(&self) -> Proc<S> {
        self.proc
    }
}

impl<S: Signature> Drop for ProcBox<S> {
    fn drop(&mut self) {
        // SAFETY: the context was leaked from a `Box<F>` with the matching `F`.
        unsafe { (self.drop_context)(self.proc.context) }
    }
}

impl<S: Signature> fmt::Debug for ProcBox<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProcBox").field(&self.proc).finish()
    }
}

// -----------------------------------------------------------------------------
// Arity impls

macro_rules! impl_signature {
    ($num:literal: [$($idx:tt : $p:ident),*]) => {
        impl<R: 'static, $($p: 'static),*> Signature for fn($($p),*) -> R {
            type WithContext = unsafe extern "C" fn(*mut c_void $(, $p)*) -> R;
            type WithoutContext = unsafe extern "C" fn($($p),*) -> R;
        }

        impl<R: 'static, $($p: 'static),*> Proc<fn($($p),*) -> R> {
            /// Calls the function with the given argument tuple.
            ///
            /// A non-null context is passed first. Calling the invalid proc
            /// takes the fatal path.
            ///
            /// # Safety
            ///
            /// The function and context are valid for this signature, as
            /// required by [`from_raw_parts`](Self::from_raw_parts).
            #[track_caller]
            pub unsafe fn call(&self, args: ($($p,)*)) -> R {
                if !self.is_valid() {
                    Self::invalid_call();
                }
                let _ = &args;
                if self.context.is_null() {
                    // SAFETY: forwarded from the caller.
                    unsafe { (*self.entry.without_context)($(args.$idx),*) }
                } else {
                    // SAFETY: forwarded from the caller.
                    unsafe { (*self.entry.with_context)(self.context $(, args.$idx)*) }
                }
            }
        }

        impl<R: 'static, $($p: 'static),*> ProcBox<fn($($p),*) -> R> {
            /// Boxes `func` and exposes it as a capture-accepting proc.
            pub fn new<F>(func: F) -> Self
            where
                F: Fn($($p),*) -> R + 'static,
            {
                #[allow(non_snake_case, improper_ctypes_definitions)]
                unsafe extern "C" fn trampoline<F: Fn($($p),*) -> R, R, $($p),*>(
                    context: *mut c_void
                    $(, $p: $p)*
                ) -> R {
                    // SAFETY: the context is the boxed `F` owned by the `ProcBox`.
                    let func = unsafe { &*context.cast::<F>() };
                    func($($p),*)
                }

                let entry = trampoline::<F, R, $($p),*>
                    as unsafe extern "C" fn(*mut c_void $(, $p)*) -> R;
                let context = NonNull::from(Box::leak(Box::new(func))).cast::<c_void>();
                Self {
                    proc: Proc::with_context(entry, context),
                    drop_context: drop_context::<F>,
                }
            }
        }
    };
}

bg_utils::range_invoke!(impl_signature, 8);

// -----------------------------------------------------------------------------
// Tests
