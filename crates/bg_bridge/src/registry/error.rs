use alloc::vec::Vec;

use thiserror::Error;

use crate::registry::TypeKey;

// -----------------------------------------------------------------------------
// Error

/// A registry whose declarations do not resolve to one policy per type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("`{ty}` inherits from several unrelated wrapped bases: {candidates:?}")]
    Ambiguous { ty: TypeKey, candidates: Vec<TypeKey> },

    #[error("wrapped base `{0}` is registered more than once")]
    DuplicateWrap(TypeKey),

    #[error("`{0}` is registered both as a wrapped base and as excluded from wrapping")]
    Conflict(TypeKey),

    #[error("the lineage of `{0}` contains a cycle")]
    CyclicLineage(TypeKey),
}
