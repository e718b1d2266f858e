//! End-to-end use through the declaration macros and auto registration.
#![cfg(feature = "auto_register")]
#![expect(unsafe_code, reason = "the test doubles are raw native objects")]

extern crate alloc;

use alloc::sync::Arc;
use core::any::TypeId;
use core::cell::{Cell, RefCell};
use core::ptr;
use core::sync::atomic::{AtomicUsize, Ordering};

use bg_bridge::registry::{Registry, Track, Tracker, TypeKey, WrapPolicy};
use bg_bridge::{
    AtomicErasedPtr, Bridge, ErasedPtr, FatalError, NativeType, SafeHandle, bg_native, bg_no_wrap,
    bg_wrap, set_fatal_hook,
};

// -----------------------------------------------------------------------------
// Native graph

#[repr(C)]
struct Widget {
    parent: Cell<*mut Widget>,
    children: RefCell<Vec<*mut Widget>>,
    deleted: Arc<AtomicUsize>,
    deleter: unsafe fn(*mut Widget),
}

unsafe fn delete_widget(widget: *mut Widget) {
    drop(unsafe { Box::from_raw(widget) });
}

impl Widget {
    fn new(deleted: &Arc<AtomicUsize>, deleter: unsafe fn(*mut Widget)) -> Self {
        Self {
            parent: Cell::new(ptr::null_mut()),
            children: RefCell::new(Vec::new()),
            deleted: Arc::clone(deleted),
            deleter,
        }
    }

    fn create(deleted: &Arc<AtomicUsize>) -> *mut Widget {
        Box::into_raw(Box::new(Widget::new(deleted, delete_widget)))
    }

    unsafe fn set_parent(child: *mut Widget, parent: *mut Widget) {
        unsafe {
            (*child).parent.set(parent);
            (*parent).children.borrow_mut().push(child);
        }
    }

    unsafe fn delete(widget: *mut Widget) {
        unsafe {
            let parent = (*widget).parent.replace(ptr::null_mut());
            if !parent.is_null() {
                (*parent).children.borrow_mut().retain(|c| *c != widget);
            }
            let children = core::mem::take(&mut *(*widget).children.borrow_mut());
            for child in children {
                (*child).parent.set(ptr::null_mut());
                Widget::delete(child);
            }
            ((*widget).deleter)(widget);
        }
    }
}

impl Drop for Widget {
    fn drop(&mut self) {
        self.deleted.fetch_add(1, Ordering::Relaxed);
    }
}

impl NativeType for Widget {
    unsafe fn destroy(ptr: *mut Self) {
        unsafe { Widget::delete(ptr) }
    }
}

unsafe fn widget_parent(widget: *const Widget) -> *mut Widget {
    unsafe { (*widget).parent.get() }
}

#[repr(C)]
#[allow(dead_code, reason = "the base is only reached through pointer casts")]
struct Button {
    widget: Widget,
    text: &'static str,
}

unsafe fn delete_button(widget: *mut Widget) {
    drop(unsafe { Box::from_raw(widget.cast::<Button>()) });
}

impl Button {
    fn create(deleted: &Arc<AtomicUsize>, text: &'static str) -> *mut Button {
        Box::into_raw(Box::new(Button {
            widget: Widget::new(deleted, delete_button),
            text,
        }))
    }
}

impl NativeType for Button {
    unsafe fn destroy(ptr: *mut Self) {
        unsafe { Widget::delete(ptr.cast()) }
    }
}

#[repr(C)]
#[allow(dead_code, reason = "the base is only reached through pointer casts")]
struct Toggle {
    button: Button,
    on: bool,
}

unsafe fn delete_toggle(widget: *mut Widget) {
    drop(unsafe { Box::from_raw(widget.cast::<Toggle>()) });
}

impl Toggle {
    fn create(deleted: &Arc<AtomicUsize>) -> *mut Toggle {
        Box::into_raw(Box::new(Toggle {
            button: Button {
                widget: Widget::new(deleted, delete_toggle),
                text: "toggle",
            },
            on: false,
        }))
    }
}

impl NativeType for Toggle {
    unsafe fn destroy(ptr: *mut Self) {
        unsafe { Widget::delete(ptr.cast()) }
    }
}

/// A widget subclass without an accessible destructor.
#[repr(C)]
#[allow(dead_code, reason = "lineage only")]
struct Secret {
    widget: Widget,
}

impl NativeType for Secret {}

/// Never declared.
#[allow(dead_code, reason = "lineage only")]
struct Style;

impl NativeType for Style {}

struct Timer {
    owner: Cell<*mut Widget>,
    alive: Arc<AtomicErasedPtr>,
}

impl Timer {
    fn create() -> *mut Timer {
        let timer = Box::into_raw(Box::new(Timer {
            owner: Cell::new(ptr::null_mut()),
            alive: Arc::new(AtomicErasedPtr::null()),
        }));
        unsafe { (*timer).alive = Arc::new(AtomicErasedPtr::new(ErasedPtr::from_ptr(timer))) };
        timer
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.alive.take();
    }
}

impl NativeType for Timer {
    unsafe fn destroy(ptr: *mut Self) {
        drop(unsafe { Box::from_raw(ptr) });
    }
}

struct TimerTracker(Arc<AtomicErasedPtr>);

impl Tracker for TimerTracker {
    fn get(&self) -> ErasedPtr {
        self.0.load()
    }
}

impl Track for Timer {
    unsafe fn track(ptr: *mut Self) -> Box<dyn Tracker> {
        Box::new(TimerTracker(Arc::clone(unsafe { &(*ptr).alive })))
    }
}

unsafe fn timer_owner(timer: *const Timer) -> *mut Widget {
    unsafe { (*timer).owner.get() }
}

bg_native!(Widget);
bg_native!(Button: Widget);
bg_native!(Toggle: Button, Widget);
bg_native!(Secret: Widget);
bg_native!(Timer);

bg_wrap!(Widget, Plain, widget_parent);
bg_wrap!(Timer, Tracked, timer_owner);

bg_no_wrap!(Secret);

fn panic_on_fatal() {
    fn hook(error: &FatalError) -> ! {
        panic!("{error}")
    }
    set_fatal_hook(hook);
}

fn bridge() -> Bridge {
    Bridge::new(Registry::auto().unwrap())
}

// -----------------------------------------------------------------------------
// Tests

#[test]
fn declarations_are_collected() {
    let registry = Registry::auto().unwrap();

    let widget = registry.policy::<Widget>();
    assert_eq!(widget.base(), Some(TypeKey::of::<Widget>()));
    assert_eq!(registry.policy::<Button>(), widget);
    assert_eq!(registry.policy::<Secret>(), WrapPolicy::Unwrapped);
    assert_eq!(registry.policy::<Style>(), WrapPolicy::Unwrapped);
    assert!(registry.policy::<Timer>().storage().is_tracked());

    assert!(registry.contains(TypeId::of::<Secret>()));
    assert!(!registry.contains(TypeId::of::<Style>()));
}

#[test]
fn parentless_leaf_is_destroyed() {
    let deleted = Arc::new(AtomicUsize::new(0));
    let bridge = bridge();

    let button = unsafe { bridge.construct(|| Button::create(&deleted, "ok")) };
    assert_eq!(button.text, "ok");

    drop(button);
    assert_eq!(bridge.collect(), 1);
    assert_eq!(deleted.load(Ordering::Relaxed), 1);
}

#[test]
fn parented_leaf_goes_with_its_parent() {
    let deleted = Arc::new(AtomicUsize::new(0));
    let bridge = bridge();
    let window = Widget::create(&deleted);

    let button = unsafe { bridge.construct(|| Button::create(&deleted, "cancel")) };
    unsafe { Widget::set_parent(button.to_raw().cast(), window) };

    drop(button);
    assert_eq!(bridge.collect(), 1);
    assert_eq!(deleted.load(Ordering::Relaxed), 0);

    unsafe { Widget::delete(window) };
    assert_eq!(deleted.load(Ordering::Relaxed), 2);
}

#[test]
fn narrowed_handles_share_the_wrapper() {
    let deleted = Arc::new(AtomicUsize::new(0));
    let bridge = bridge();
    let raw = Button::create(&deleted, "apply");

    let button = unsafe { bridge.handle(raw) };
    let widget: SafeHandle<Widget> = button.clone().narrow();
    assert_eq!(widget.to_raw().cast::<Button>(), raw);
    assert_eq!(bridge.collector().allocated(), 1);

    drop(button);
    assert_eq!(bridge.collect(), 0);
    drop(widget);
    assert_eq!(bridge.collect(), 1);
    assert_eq!(deleted.load(Ordering::Relaxed), 1);
}

#[test]
fn listed_ancestors_narrow_directly() {
    let deleted = Arc::new(AtomicUsize::new(0));
    let bridge = bridge();
    let raw = Toggle::create(&deleted);

    let toggle = unsafe { bridge.handle(raw) };
    assert!(!toggle.on);
    let widget: SafeHandle<Widget> = toggle.clone().narrow();
    let button: SafeHandle<Button> = toggle.narrow();
    assert_eq!(button.text, "toggle");
    assert_eq!(widget.to_raw().cast::<Toggle>(), raw);
    assert_eq!(bridge.collector().allocated(), 1);

    drop(widget);
    drop(button);
    assert_eq!(bridge.collect(), 1);
    assert_eq!(deleted.load(Ordering::Relaxed), 1);
}

#[test]
fn tracked_pointers_follow_native_destruction() {
    let deleted = Arc::new(AtomicUsize::new(0));
    let bridge = bridge();
    let owner = Widget::create(&deleted);
    let timer = Timer::create();
    unsafe { (*timer).owner.set(owner) };

    let handle = unsafe { bridge.handle(timer) };
    assert_eq!(handle.to_raw(), timer);

    // The native side destroys the timer behind the bridge's back.
    drop(unsafe { Box::from_raw(timer) });
    assert!(handle.wrapper().is_some_and(|w| w.is_released()));

    drop(handle);
    bridge.collect();
    unsafe { Widget::delete(owner) };
    assert_eq!(deleted.load(Ordering::Relaxed), 1);
}

#[test]
fn process_wide_bridge() {
    let deleted = Arc::new(AtomicUsize::new(0));
    let raw = Widget::create(&deleted);

    let handle = unsafe { SafeHandle::from_raw(raw) };
    assert!(handle.is_managed());
    assert_eq!(handle.to_raw(), raw);

    let null = unsafe { SafeHandle::<Widget>::from_raw(ptr::null_mut()) };
    assert!(null.is_null());

    drop(handle);
    assert_eq!(Bridge::global().collect(), 1);
    assert_eq!(deleted.load(Ordering::Relaxed), 1);
}

#[test]
#[should_panic(expected = "has been deleted")]
fn use_after_release_is_fatal() {
    panic_on_fatal();
    let deleted = Arc::new(AtomicUsize::new(0));
    let bridge = bridge();

    let button = unsafe { bridge.construct(|| Button::create(&deleted, "gone")) };
    if let Some(wrapper) = button.wrapper() {
        wrapper.release();
    }
    let _text = button.text;
}
