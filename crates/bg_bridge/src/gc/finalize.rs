/// Work a collected cell performs once it has become unreachable.
///
/// The [`Collector`](crate::Collector) calls [`finalize`](Self::finalize) at
/// most once per cell, outside of any collector lock, after the last
/// [`Gc`](crate::Gc) pointing at the cell has been dropped. The call may
/// happen on whichever thread runs [`collect`](crate::Collector::collect).
pub trait Finalize: Send + Sync + 'static {
    /// Runs the finalization callback.
    fn finalize(&self);
}
