//! A miniature parent-owned object graph for unit tests.
//!
//! Deleting a [`Node`] deletes its children first, the way widget toolkits
//! do. Every destroyed node bumps the counter it was created with.
#![allow(dead_code, reason = "lineage-only types are never built")]

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::ptr;
use core::sync::atomic::{AtomicUsize, Ordering};

use bg_ptr::{AtomicErasedPtr, ErasedPtr};

use crate::fatal::{FatalError, set_fatal_hook};
use crate::native::{IsA, NativeType};
use crate::registry::{ParentLookup, Track, Tracker};

pub(crate) fn panicking_hook(error: &FatalError) -> ! {
    panic!("{error}")
}

/// Turns fatal errors into panics so `#[should_panic]` can observe them.
pub(crate) fn panic_on_fatal() {
    set_fatal_hook(panicking_hook);
}

// -----------------------------------------------------------------------------
// Node

#[repr(C)]
pub(crate) struct Node {
    parent: Cell<*mut Node>,
    children: RefCell<Vec<*mut Node>>,
    alive: Arc<AtomicErasedPtr>,
    drops: Arc<AtomicUsize>,
    deleter: unsafe fn(*mut Node),
}

unsafe fn delete_node(node: *mut Node) {
    drop(unsafe { Box::from_raw(node) });
}

impl Node {
    fn new(drops: &Arc<AtomicUsize>, deleter: unsafe fn(*mut Node)) -> Self {
        Self {
            parent: Cell::new(ptr::null_mut()),
            children: RefCell::new(Vec::new()),
            alive: Arc::new(AtomicErasedPtr::null()),
            drops: Arc::clone(drops),
            deleter,
        }
    }

    /// Lets trackers observe `node` until it is dropped.
    unsafe fn publish(node: *mut Node) {
        let alive = Arc::new(AtomicErasedPtr::new(ErasedPtr::from_ptr(node)));
        unsafe { (*node).alive = alive };
    }

    pub(crate) fn create(drops: &Arc<AtomicUsize>) -> *mut Node {
        let node = Box::into_raw(Box::new(Node::new(drops, delete_node)));
        unsafe { Node::publish(node) };
        node
    }

    pub(crate) unsafe fn parent(node: *const Node) -> *mut Node {
        unsafe { (*node).parent.get() }
    }

    pub(crate) unsafe fn attach(child: *mut Node, parent: *mut Node) {
        unsafe {
            Node::detach(child);
            (*child).parent.set(parent);
            (*parent).children.borrow_mut().push(child);
        }
    }

    pub(crate) unsafe fn detach(child: *mut Node) {
        unsafe {
            let parent = (*child).parent.replace(ptr::null_mut());
            if !parent.is_null() {
                (*parent).children.borrow_mut().retain(|c| *c != child);
            }
        }
    }

    /// Native teardown: children first, then the node itself.
    pub(crate) unsafe fn delete(node: *mut Node) {
        unsafe {
            Node::detach(node);
            let children = core::mem::take(&mut *(*node).children.borrow_mut());
            for child in children {
                (*child).parent.set(ptr::null_mut());
                Node::delete(child);
            }
            ((*node).deleter)(node);
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        self.alive.take();
        self.drops.fetch_add(1, Ordering::Relaxed);
    }
}

impl NativeType for Node {
    unsafe fn destroy(ptr: *mut Self) {
        unsafe { Node::delete(ptr) }
    }
}

impl ParentLookup for Node {
    unsafe fn has_parent(ptr: *const Self) -> bool {
        !unsafe { Node::parent(ptr) }.is_null()
    }
}

struct NodeTracker(Arc<AtomicErasedPtr>);

impl Tracker for NodeTracker {
    fn get(&self) -> ErasedPtr {
        self.0.load()
    }
}

impl Track for Node {
    unsafe fn track(ptr: *mut Self) -> Box<dyn Tracker> {
        Box::new(NodeTracker(Arc::clone(unsafe { &(*ptr).alive })))
    }
}

// -----------------------------------------------------------------------------
// Leaf

#[repr(C)]
pub(crate) struct Leaf {
    pub node: Node,
    pub label: &'static str,
}

unsafe fn delete_leaf(node: *mut Node) {
    drop(unsafe { Box::from_raw(node.cast::<Leaf>()) });
}

impl Leaf {
    pub(crate) fn create(drops: &Arc<AtomicUsize>, label: &'static str) -> *mut Leaf {
        let leaf = Box::into_raw(Box::new(Leaf {
            node: Node::new(drops, delete_leaf),
            label,
        }));
        unsafe { Node::publish(leaf.cast()) };
        leaf
    }
}

unsafe impl IsA<Node> for Leaf {}

impl NativeType for Leaf {
    unsafe fn destroy(ptr: *mut Self) {
        unsafe { Node::delete(ptr.cast()) }
    }
}

impl ParentLookup for Leaf {
    unsafe fn has_parent(ptr: *const Self) -> bool {
        unsafe { Node::has_parent(ptr.cast()) }
    }
}

// -----------------------------------------------------------------------------
// Lineage-only types

/// A leaf subclass.
#[repr(C)]
pub(crate) struct Twig {
    leaf: Leaf,
}

unsafe impl IsA<Leaf> for Twig {}
unsafe impl IsA<Node> for Twig {}
impl NativeType for Twig {}

/// A node subclass without an accessible destructor.
#[repr(C)]
pub(crate) struct Private {
    node: Node,
}

unsafe impl IsA<Node> for Private {}
impl NativeType for Private {}

/// A subclass of [`Private`].
#[repr(C)]
pub(crate) struct Sprig {
    private: Private,
}

unsafe impl IsA<Private> for Sprig {}
unsafe impl IsA<Node> for Sprig {}
impl NativeType for Sprig {}

/// An unrelated wrapped base.
pub(crate) struct Item {
    owner: Cell<*mut Item>,
}

impl NativeType for Item {}

impl ParentLookup for Item {
    unsafe fn has_parent(ptr: *const Self) -> bool {
        !unsafe { (*ptr).owner.get() }.is_null()
    }
}
