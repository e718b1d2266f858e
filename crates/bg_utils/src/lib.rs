//! Small containers and macros shared by the `bg_*` crates.
//!
//! - [`TypeIdMap`] and [`TypeIdSet`]: containers keyed by [`TypeId`](core::any::TypeId),
//!   used for the per-type lookup tables of the ownership registry.
//! - [`hash`]: the pass-through hasher those containers use, plus a *hashbrown* re-export.
//! - [`range_invoke!`]: expands a macro once per arity, for tuple-shaped impls.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod range_invoke;
mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::{TypeIdMap, TypeIdSet};
