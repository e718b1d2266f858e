use core::any::TypeId;
use core::fmt;

use bg_utils::TypeIdMap;

use crate::registry::{RegistryBuilder, RegistryError, TypeKey, WrapPolicy};

// -----------------------------------------------------------------------------
// Registry

/// The resolved wrapping policy of every declared native type.
///
/// Built once through [`RegistryBuilder`] and immutable afterwards, so it can
/// be shared freely between threads.
///
/// Types that were never declared are [`WrapPolicy::Unwrapped`].
pub struct Registry {
    policies: TypeIdMap<(TypeKey, WrapPolicy)>,
}

impl Registry {
    pub(crate) fn from_policies(policies: TypeIdMap<(TypeKey, WrapPolicy)>) -> Self {
        Self { policies }
    }

    /// A registry with no declarations; every type is unwrapped.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            policies: TypeIdMap::new(),
        }
    }

    /// Starts a new [`RegistryBuilder`].
    #[inline]
    pub const fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builds a registry from the automatically collected declarations.
    ///
    /// See [`RegistryBuilder::auto_register`].
    pub fn auto() -> Result<Self, RegistryError> {
        Self::builder().auto_register().build()
    }

    /// The policy of `T`.
    pub fn policy<T: 'static>(&self) -> WrapPolicy {
        let id = TypeId::of::<T>();
        crate::cfg::debug! {
            if !self.contains(id) {
                log::trace!(
                    "`{}` is not declared, treating it as unwrapped",
                    core::any::type_name::<T>(),
                );
            }
        }
        self.policy_of(id)
    }

    /// The policy of the type behind `id`.
    #[inline]
    pub fn policy_of(&self, id: TypeId) -> WrapPolicy {
        self.policies
            .get(&id)
            .map_or(WrapPolicy::Unwrapped, |(_, policy)| *policy)
    }

    /// Returns `true` if the type behind `id` was declared.
    #[inline]
    pub fn contains(&self, id: TypeId) -> bool {
        self.policies.contains(&id)
    }

    /// The number of declared types.
    #[inline]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns `true` if no type was declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Every declared type with its policy, in arbitrary order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (TypeKey, WrapPolicy)> + '_ {
        self.policies.values().copied()
    }
}

impl Default for Registry {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
