//! A garbage-collection-aware bridge into parent-owned native object graphs.
//!
//! Native object graphs such as widget toolkits use tree-shaped manual
//! ownership: a parent destroys its children. A caller that wants to hold such
//! objects from a collected environment needs three things the native graph
//! does not provide:
//!
//! - objects must stay alive while the caller can still reach them,
//! - an object must be destroyed exactly once, and never by the caller when a
//!   parent already owns it,
//! - misuse (null or already-destroyed objects) must stop the process instead
//!   of corrupting the graph.
//!
//! ## Menu
//!
//! - [`registry`]: which native types need wrapping, and how to ask the
//!   native graph whether an object has a parent.
//! - [`gc`]: the collector that owns wrappers and finalizes unreachable ones.
//! - [`wrapper`]: [`GcWrapper`], the collected cell that owns one native pointer.
//! - [`handle`]: [`SafeHandle`], the caller-facing reference.
//! - [`callable`]: [`Proc`], a foreign function pointer with optional capture.
//! - [`text`]: [`BridgeString`], the pointer+length text record.
//! - [`Bridge`]: one registry plus one collector, with a process-wide default.
//! - [`fatal`]: the fail-fast channel every protocol violation goes through.
//!
//! ## Declaring a native graph
//!
//! ```
//! use core::cell::Cell;
//! use core::ptr;
//! use bg_bridge::{Bridge, NativeType, SafeHandle, bg_native, bg_wrap};
//! use bg_bridge::registry::Registry;
//!
//! pub struct Node {
//!     parent: Cell<*mut Node>,
//! }
//!
//! impl NativeType for Node {
//!     unsafe fn destroy(ptr: *mut Self) {
//!         drop(unsafe { Box::from_raw(ptr) });
//!     }
//! }
//!
//! unsafe fn node_parent(node: *const Node) -> *mut Node {
//!     unsafe { (*node).parent.get() }
//! }
//!
//! bg_native!(Node);
//! bg_wrap!(Node, Plain, node_parent);
//!
//! let bridge = Bridge::new(Registry::auto().expect("unambiguous registry"));
//! assert!(bridge.policy::<Node>().is_wrapped());
//!
//! let raw = Box::into_raw(Box::new(Node { parent: Cell::new(ptr::null_mut()) }));
//! let handle: SafeHandle<Node> = unsafe { bridge.handle(raw) };
//! assert_eq!(handle.to_raw(), raw);
//!
//! drop(handle);
//! // Unreachable and parentless: the node is destroyed here.
//! assert_eq!(bridge.collect(), 1);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![expect(unsafe_code, reason = "bridging raw native pointers is inherently unsafe")]
#![no_std]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    bg_cfg::define_alias! {
        #[cfg(feature = "auto_register")] => auto_register,
        #[cfg(all(debug_assertions, feature = "debug"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// std support

// The collector and the fatal channel need locks, stderr and `abort`.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod bridge;
mod native;

pub mod callable;
pub mod fatal;
pub mod gc;
pub mod handle;
pub mod registry;
pub mod text;
pub mod wrapper;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use bg_ptr::{AtomicErasedPtr, ErasedPtr};
pub use bridge::Bridge;
pub use callable::{Proc, ProcBox};
pub use fatal::{FatalError, fatal, set_fatal_hook};
pub use gc::{Collector, Gc};
pub use handle::SafeHandle;
pub use native::{IsA, NativeType};
pub use text::BridgeString;
pub use wrapper::{FromPtr, GcWrapper};
