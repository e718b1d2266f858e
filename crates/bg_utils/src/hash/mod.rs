//! Provide the hashing used by type-keyed containers, re-exports *hashbrown*.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using the pass-through hasher.
pub type NoOpHashMap<K, V> = hashbrown::HashMap<K, V, NoOpHashState>;

/// A [`hashbrown::HashSet`] using the pass-through hasher.
pub type NoOpHashSet<K> = hashbrown::HashSet<K, NoOpHashState>;

// -----------------------------------------------------------------------------
// Re-export crates

pub use hashbrown;
