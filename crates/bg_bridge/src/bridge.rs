use std::sync::OnceLock;

use crate::fatal::{FatalError, fatal};
use crate::gc::Collector;
use crate::handle::SafeHandle;
use crate::native::NativeType;
use crate::registry::{Registry, WrapPolicy};
use crate::wrapper::GcWrapper;

static GLOBAL: OnceLock<Bridge> = OnceLock::new();

// -----------------------------------------------------------------------------
// Bridge

/// One ownership [`Registry`] plus the [`Collector`] its wrappers live in.
///
/// Most programs use the process-wide instance from [`Bridge::global`],
/// built from the automatically registered declarations. Tests and embedders
/// that need isolation create their own.
pub struct Bridge {
    registry: Registry,
    collector: Collector,
}

impl Bridge {
    /// Creates a bridge with its own collector.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            collector: Collector::new(),
        }
    }

    /// The process-wide bridge.
    ///
    /// Created on first use from [`Registry::auto`] unless
    /// [`install`](Self::install) ran first. An invalid registry takes the
    /// fatal path.
    pub fn global() -> &'static Bridge {
        GLOBAL.get_or_init(|| match Registry::auto() {
            Ok(registry) => {
                log::debug!("process-wide bridge created with {} types", registry.len());
                Bridge::new(registry)
            }
            Err(error) => fatal(FatalError::Registry(error)),
        })
    }

    /// Makes `bridge` the process-wide bridge.
    ///
    /// Gives `bridge` back if the process-wide bridge already exists.
    pub fn install(bridge: Bridge) -> Result<(), Bridge> {
        GLOBAL.set(bridge)
    }

    /// The ownership registry.
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The collector wrappers are allocated in.
    #[inline]
    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// The policy of `T`.
    #[inline]
    pub fn policy<T: NativeType>(&self) -> WrapPolicy {
        self.registry.policy::<T>()
    }

    /// Takes a pointer received from native code.
    ///
    /// # Safety
    ///
    /// See [`SafeHandle::from_raw_in`].
    #[inline]
    pub unsafe fn handle<T: NativeType>(&self, ptr: *mut T) -> SafeHandle<T> {
        unsafe { SafeHandle::from_raw_in(self, ptr) }
    }

    /// Owning construction: the returned handle owns the result of `ctor`.
    ///
    /// Unlike [`handle`](Self::handle) this always allocates a wrapper. An
    /// unwrapped `T` is then owned by value: releasing destroys it without
    /// asking for a parent.
    ///
    /// # Safety
    ///
    /// See [`GcWrapper::construct`].
    #[track_caller]
    pub unsafe fn construct<T: NativeType>(&self, ctor: impl FnOnce() -> *mut T) -> SafeHandle<T> {
        let wrapper = unsafe { GcWrapper::construct(self.policy::<T>(), ctor) };
        SafeHandle::from_wrapper(self.collector.alloc(wrapper))
    }

    /// Finalizes every unreachable wrapper. See [`Collector::collect`].
    #[inline]
    pub fn collect(&self) -> usize {
        self.collector.collect()
    }
}

impl core::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bridge")
            .field("registry", &self.registry)
            .field("collector", &self.collector)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
