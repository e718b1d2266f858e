//! Compile-time configuration helpers shared by the `bg_*` crates.
//!
//! A crate declares its aliases once:
//!
//! ```
//! pub mod cfg {
//!     bg_cfg::define_alias! {
//!         #[cfg(debug_assertions)] => debug,
//!         #[cfg(feature = "never_enabled")] => never,
//!     }
//! }
//!
//! cfg::never! { compile_error!("stripped"); }
//!
//! let level = cfg::debug! { if { "debug" } else { "release" } };
//! assert_eq!(level, if cfg!(debug_assertions) { "debug" } else { "release" });
//! assert!(!cfg::never!());
//! ```
//!
//! Each alias is a macro that either passes its input through or drops it,
//! depending on the `cfg` predicate evaluated in the *declaring* crate. This
//! is what lets exported `macro_rules!` items respect the features of the
//! crate that defined them rather than the features of the caller.
#![no_std]

/// Declares one macro alias per `#[cfg(..)]` predicate.
///
/// See the [crate-level documentation](crate) for the three accepted forms:
/// `alias!()` (a `bool`), `alias! { if { .. } else { .. } }` and
/// `alias! { .. }`.
#[macro_export]
macro_rules! define_alias {
    ($(#[cfg($meta:meta)] => $name:ident),* $(,)?) => {
        $(
            #[cfg($meta)]
            #[doc = concat!("Passes its input through, `#[cfg(", stringify!($meta), ")]` is active.")]
            pub use $crate::enabled as $name;

            #[cfg(not($meta))]
            #[doc = concat!("Drops its input, `#[cfg(", stringify!($meta), ")]` is inactive.")]
            pub use $crate::disabled as $name;
        )*
    };
}

/// The expansion used by an alias whose predicate holds.
#[doc(hidden)]
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($p)* };
    ($($p:tt)*) => { $($p)* };
}

/// The expansion used by an alias whose predicate does not hold.
#[doc(hidden)]
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { $($n)* };
    ($($p:tt)*) => {};
}
