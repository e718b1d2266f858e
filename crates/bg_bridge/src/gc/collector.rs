use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Deref;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::gc::Finalize;

// -----------------------------------------------------------------------------
// Gc

/// A strong reference to a cell owned by a [`Collector`].
///
/// While any `Gc` to a cell exists the cell is reachable and will not be
/// finalized.
pub struct Gc<T: ?Sized>(Arc<T>);

impl<T: ?Sized> Gc<T> {
    /// Returns `true` if both references point at the same cell.
    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }

    /// The number of live references to this cell, the collector's own
    /// bookkeeping excluded.
    #[inline]
    pub fn reachable_count(this: &Self) -> usize {
        Arc::strong_count(&this.0).saturating_sub(1)
    }
}

impl<T> Gc<T> {
    /// Reinterprets the cell as a `U`.
    ///
    /// # Safety
    ///
    /// `T` and `U` have the same layout and every valid `T` is a valid `U`.
    #[inline]
    pub(crate) unsafe fn cast_unchecked<U>(this: Self) -> Gc<U> {
        let raw = Arc::into_raw(this.0);
        Gc(unsafe { Arc::from_raw(raw.cast::<U>()) })
    }
}

impl<T: ?Sized> Clone for Gc<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> Deref for Gc<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Gc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

// -----------------------------------------------------------------------------
// Collector

/// Owns collected cells and finalizes the unreachable ones.
///
/// A cell is unreachable once every [`Gc`] handed out for it has been
/// dropped. [`collect`](Self::collect) finds those cells, runs their
/// [`Finalize`] callbacks and frees them. Cells still alive when the
/// collector is dropped are finalized by their own `Drop`, if they have one.
pub struct Collector {
    cells: Mutex<Vec<Arc<dyn Finalize>>>,
    allocated: AtomicUsize,
    finalized: AtomicUsize,
}

impl Collector {
    /// Creates an empty collector.
    pub const fn new() -> Self {
        Self {
            cells: Mutex::new(Vec::new()),
            allocated: AtomicUsize::new(0),
            finalized: AtomicUsize::new(0),
        }
    }

    /// Moves `value` into a new collected cell.
    pub fn alloc<T: Finalize>(&self, value: T) -> Gc<T> {
        let cell = Arc::new(value);
        let erased: Arc<dyn Finalize> = cell.clone();
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(erased);
        self.allocated.fetch_add(1, Ordering::Relaxed);
        Gc(cell)
    }

    /// Finalizes and frees every unreachable cell, returning how many there
    /// were.
    pub fn collect(&self) -> usize {
        let unreachable: Vec<Arc<dyn Finalize>> = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            let (unreachable, live) = core::mem::take(&mut *cells)
                .into_iter()
                .partition(|cell| Arc::strong_count(cell) == 1);
            *cells = live;
            unreachable
        };

        // Finalizers may allocate or collect again; the lock is released.
        for cell in &unreachable {
            cell.finalize();
        }

        let count = unreachable.len();
        if count > 0 {
            self.finalized.fetch_add(count, Ordering::Relaxed);
            log::trace!("collector finalized {count} cells");
        }
        count
    }

    /// The number of cells not yet finalized.
    pub fn live(&self) -> usize {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// The number of cells allocated so far.
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    /// The number of cells finalized so far.
    pub fn finalized(&self) -> usize {
        self.finalized.load(Ordering::Relaxed)
    }
}

impl Default for Collector {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Collector {
    fn drop(&mut self) {
        self.collect();
    }
}

impl fmt::Debug for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collector")
            .field("live", &self.live())
            .field("allocated", &self.allocated())
            .field("finalized", &self.finalized())
            .finish()
    }
}
