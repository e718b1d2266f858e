//! A small reference-tracking collector.
//!
//! The bridge only needs two properties from its host collector: cells stay
//! alive while referenced, and each unreachable cell gets exactly one
//! finalization callback. [`Collector`] provides both over [`Arc`] reference
//! counts, deferring finalization to explicit [`Collector::collect`] calls.
//!
//! [`Arc`]: alloc::sync::Arc

// -----------------------------------------------------------------------------
// Modules

mod collector;
mod finalize;

// -----------------------------------------------------------------------------
// Exports

pub use collector::{Collector, Gc};
pub use finalize::Finalize;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::{Collector, Finalize, Gc};

    struct Counted(Arc<AtomicUsize>);

    impl Finalize for Counted {
        fn finalize(&self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn reachable_cells_survive() {
        let finalized = Arc::new(AtomicUsize::new(0));
        let collector = Collector::new();

        let cell = collector.alloc(Counted(finalized.clone()));
        let other = cell.clone();
        assert_eq!(Gc::reachable_count(&cell), 2);

        drop(cell);
        assert_eq!(collector.collect(), 0);
        assert_eq!(finalized.load(Ordering::Relaxed), 0);

        drop(other);
        assert_eq!(collector.collect(), 1);
        assert_eq!(finalized.load(Ordering::Relaxed), 1);
        assert_eq!(collector.live(), 0);

        // Nothing left to finalize twice.
        assert_eq!(collector.collect(), 0);
        assert_eq!(finalized.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn counters() {
        let finalized = Arc::new(AtomicUsize::new(0));
        let collector = Collector::default();

        let kept = collector.alloc(Counted(finalized.clone()));
        for _ in 0..3 {
            collector.alloc(Counted(finalized.clone()));
        }

        assert_eq!(collector.allocated(), 4);
        assert_eq!(collector.collect(), 3);
        assert_eq!(collector.finalized(), 3);
        assert_eq!(collector.live(), 1);
        assert!(Gc::ptr_eq(&kept, &kept.clone()));
    }

    #[test]
    fn dropping_the_collector_finalizes_garbage() {
        let finalized = Arc::new(AtomicUsize::new(0));
        let collector = Collector::new();
        collector.alloc(Counted(finalized.clone()));
        let kept = collector.alloc(Counted(finalized.clone()));

        drop(collector);
        assert_eq!(finalized.load(Ordering::Relaxed), 1);
        drop(kept);
        assert_eq!(finalized.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn handles_cross_threads() {
        let finalized = Arc::new(AtomicUsize::new(0));
        let collector = Collector::new();

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let cell = collector.alloc(Counted(finalized.clone()));
                    let copy = cell.clone();
                    drop(cell);
                    collector.collect();
                    drop(copy);
                });
            }
        });

        collector.collect();
        assert_eq!(finalized.load(Ordering::Relaxed), 4);
    }
}
