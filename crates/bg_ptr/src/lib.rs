//! Type-erased pointers into a foreign object graph.
//!
//! Objects on the native side are never borrowed in the Rust sense: they live
//! as long as the native graph (or a GC wrapper) keeps them, which no Rust
//! lifetime can describe. These wrappers keep such pointers type-erased and
//! lifetime-free, adding null handling and optional alignment checks over
//! plain `*mut ()`.
//!
//! **ErasedPtr**
//!
//! [`ErasedPtr`] is a nullable, `Copy` pointer to a native object of unknown
//! type. It never dereferences anything itself, so all of its methods are safe;
//! turning it back into a typed pointer with [`cast`](ErasedPtr::cast) is the
//! point where the caller asserts the type.
//!
//! **AtomicErasedPtr**
//!
//! [`AtomicErasedPtr`] is an [`ErasedPtr`] slot that can be cleared exactly
//! once from any thread with [`take`](AtomicErasedPtr::take), which is what
//! single-owner release protocols need.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod atomic;
mod erased;

// -----------------------------------------------------------------------------
// Top-level exports

pub use atomic::AtomicErasedPtr;
pub use erased::ErasedPtr;
