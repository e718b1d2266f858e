//! The fail-fast channel.
//!
//! Every protocol violation the bridge detects (using an object after its
//! wrapper released it, dereferencing a null handle, calling an invalid
//! [`Proc`](crate::Proc), ...) ends up in [`fatal`]. Continuing after any of
//! them would corrupt the native graph, so `fatal` never returns.
//!
//! The final step is a process-wide [`FatalHook`]. The default hook aborts;
//! tests and embedders may install one that panics instead.

use core::panic::Location;
use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use crate::registry::RegistryError;

// -----------------------------------------------------------------------------
// FatalError

/// A protocol violation that cannot be recovered from.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FatalError {
    /// A wrapped pointer was read after its wrapper released it.
    #[error("native object of type `{0}` has been deleted")]
    Released(&'static str),
    /// A null [`SafeHandle`](crate::SafeHandle) was dereferenced.
    #[error("reference null-pointer to native object of type `{0}`")]
    NullHandle(&'static str),
    /// An invalid [`Proc`](crate::Proc) was called.
    #[error("called an invalid proc `{0}`")]
    InvalidProc(&'static str),
    /// An owning construction produced a null pointer.
    #[error("constructor of `{0}` returned a null pointer")]
    NullConstruct(&'static str),
    /// The bridge had to destroy an object whose type has no destructor.
    #[error("native type `{0}` has no accessible destructor")]
    NoDestructor(&'static str),
    /// The process-wide registry could not be built.
    #[error("ownership registry could not be built: {0}")]
    Registry(#[from] RegistryError),
}

// -----------------------------------------------------------------------------
// Hook

/// The last step of [`fatal`]. It must not return.
pub type FatalHook = fn(&FatalError) -> !;

fn abort(_: &FatalError) -> ! {
    std::process::abort()
}

static HOOK: RwLock<FatalHook> = RwLock::new(abort as FatalHook);

/// Replaces the process-wide fatal hook, returning the previous one.
///
/// The default hook aborts the process.
pub fn set_fatal_hook(hook: FatalHook) -> FatalHook {
    let mut current = HOOK.write().unwrap_or_else(PoisonError::into_inner);
    core::mem::replace(&mut *current, hook)
}

/// Reports `error` and terminates through the installed [`FatalHook`].
///
/// The message goes to the `log` facade and to stderr, so it is visible even
/// when no logger is installed.
#[cold]
#[inline(never)]
#[track_caller]
pub fn fatal(error: FatalError) -> ! {
    let location = Location::caller();
    log::error!("{error} ({location})");
    std::eprintln!("Fatal error in bindings: {error} ({location})");

    // Copy the hook out so a panicking hook never poisons the lock.
    let hook = *HOOK.read().unwrap_or_else(PoisonError::into_inner);
    hook(&error)
}

// -----------------------------------------------------------------------------
// Tests
