//! Paths the exported macros expand to.

crate::cfg::auto_register! {
    pub use inventory;
}
