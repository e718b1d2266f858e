//! Which native types are wrapped, and how.
//!
//! ## Menu
//!
//! - [`TypeKey`]: the identity of a native type.
//! - [`WrapPolicy`]: the resolved answer for one type, either unwrapped or
//!   [`Wrapped`] with the rule of its wrapped base.
//! - [`Storage`]: plain pointer or self-clearing [`Tracker`].
//! - [`ParentLookup`], [`Track`]: what a wrapped base must provide.
//! - [`Registration`]: one declaration, as produced by the macros below.
//! - [`RegistryBuilder`] and [`Registry`]: declarations in, policies out.
//! - Macros: [`bg_native!`](crate::bg_native), [`bg_wrap!`](crate::bg_wrap),
//!   [`bg_no_wrap!`](crate::bg_no_wrap).
//!
//! ## Resolution
//!
//! A type is wrapped when it, or one of its ancestors, is a wrapped base, and
//! it is not itself excluded. When several wrapped bases apply, the most
//! specific one wins. Two unrelated wrapped bases are an error, as are a
//! lineage cycle, a base wrapped twice and a base both wrapped and excluded.
//!
//! ## auto_register
//!
//! With the `auto_register` feature the macros also submit their declarations
//! through the [`inventory`] crate, and
//! [`RegistryBuilder::auto_register`] collects them. Not every platform
//! supports link-time collection; where it is unsupported the builder simply
//! sees no declarations.

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod error;
mod key;
mod policy;
mod registration;
mod table;

// -----------------------------------------------------------------------------
// Exports

pub use builder::RegistryBuilder;
pub use error::RegistryError;
pub use key::TypeKey;
pub use policy::{
    HasParentFn, ParentLookup, Storage, Track, TrackFn, Tracker, WrapPolicy, Wrapped,
};
pub use registration::Registration;
pub use table::Registry;

// -----------------------------------------------------------------------------
// Tests
