use alloc::vec::Vec;

use bg_utils::{TypeIdMap, TypeIdSet};

use crate::native::{IsA, NativeType};
use crate::registry::{
    ParentLookup, Registration, Registry, RegistryError, Storage, TypeKey, WrapPolicy, Wrapped,
};

// -----------------------------------------------------------------------------
// RegistryBuilder

struct Lineage {
    bases: Vec<TypeKey>,
}

/// Collects lineage and wrapping declarations, then resolves them into an
/// immutable [`Registry`].
///
/// # Examples
///
/// ```ignore
/// let registry = Registry::builder()
///     .inherits::<Button, Widget>()
///     .wrap::<Widget>(Storage::Plain)
///     .no_wrap::<PrivateWidget>()
///     .build()?;
///
/// assert_eq!(registry.policy::<Button>(), registry.policy::<Widget>());
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    keys: TypeIdMap<TypeKey>,
    lineage: TypeIdMap<Lineage>,
    wrapped: TypeIdMap<Wrapped>,
    excluded: TypeIdSet,
    errors: Vec<RegistryError>,
    auto_registered: bool,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub const fn new() -> Self {
        Self {
            keys: TypeIdMap::new(),
            lineage: TypeIdMap::new(),
            wrapped: TypeIdMap::new(),
            excluded: TypeIdSet::new(),
            errors: Vec::new(),
            auto_registered: false,
        }
    }

    /// Declares a native type without bases.
    pub fn native<S: NativeType>(mut self) -> Self {
        self.declare(TypeKey::of::<S>(), &[]);
        self
    }

    /// Declares that `S` directly inherits from `T`.
    pub fn inherits<S: IsA<T>, T: NativeType>(mut self) -> Self {
        self.declare(TypeKey::of::<S>(), &[TypeKey::of::<T>()]);
        self
    }

    /// Declares `T` as a wrapped base type.
    pub fn wrap<T: ParentLookup>(mut self, storage: Storage) -> Self {
        self.insert_wrapped(Wrapped::of::<T>(storage));
        self
    }

    /// Excludes `S` itself from wrapping.
    pub fn no_wrap<S: NativeType>(mut self) -> Self {
        self.exclude(TypeKey::of::<S>());
        self
    }

    /// Applies one [`Registration`].
    pub fn add(&mut self, registration: &Registration) {
        match registration {
            Registration::Native { ty, bases } => {
                let bases: Vec<TypeKey> = bases.iter().map(|base| base()).collect();
                self.declare(ty(), &bases);
            }
            Registration::Wrap { wrapped } => self.insert_wrapped(wrapped()),
            Registration::NoWrap { ty } => self.exclude(ty()),
        }
    }

    /// Applies every registration submitted by [`bg_native!`](crate::bg_native),
    /// [`bg_wrap!`](crate::bg_wrap) and [`bg_no_wrap!`](crate::bg_no_wrap).
    ///
    /// Repeated calls on the same builder do nothing. Without the
    /// `auto_register` feature this only logs a warning.
    pub fn auto_register(mut self) -> Self {
        if self.auto_registered {
            return self;
        }
        self.auto_registered = true;

        crate::cfg::auto_register! {
            if {
                for registration in inventory::iter::<Registration> {
                    self.add(registration);
                }
            } else {
                log::warn!("`auto_register` feature is disabled, declarations must be added by hand");
            }
        }
        self
    }

    /// Resolves the policy of every declared type.
    ///
    /// A type's policy comes from its most specific wrapped ancestor (itself
    /// included) unless the type itself is excluded. Types with no wrapped
    /// ancestor are unwrapped.
    pub fn build(self) -> Result<Registry, RegistryError> {
        if let Some(error) = self.errors.first() {
            return Err(error.clone());
        }

        for key in self.wrapped.values().map(Wrapped::base) {
            if self.excluded.contains(&key.id()) {
                return Err(RegistryError::Conflict(key));
            }
        }

        let mut policies = TypeIdMap::with_capacity(self.keys.len());
        for key in self.keys.values() {
            let policy = self.resolve(*key)?;
            policies.insert(key.id(), (*key, policy));
        }

        log::debug!(
            "ownership registry built: {} types, {} wrapped bases",
            policies.len(),
            self.wrapped.len(),
        );
        Ok(Registry::from_policies(policies))
    }

    fn remember(&mut self, key: TypeKey) {
        self.keys.try_insert(key.id(), || key);
    }

    fn declare(&mut self, key: TypeKey, bases: &[TypeKey]) {
        self.remember(key);
        for base in bases {
            self.remember(*base);
        }

        let lineage = self.lineage.get_or_insert(key.id(), || Lineage { bases: Vec::new() });
        for base in bases {
            if !lineage.bases.contains(base) {
                lineage.bases.push(*base);
            }
        }
    }

    fn insert_wrapped(&mut self, wrapped: Wrapped) {
        let base = wrapped.base();
        self.remember(base);
        if !self.wrapped.try_insert(base.id(), || wrapped) {
            self.errors.push(RegistryError::DuplicateWrap(base));
        }
    }

    fn exclude(&mut self, key: TypeKey) {
        self.remember(key);
        self.excluded.insert(key.id());
    }

    /// Every ancestor of `key`, nearest first, each listed once.
    fn ancestors(&self, key: TypeKey) -> Result<Vec<TypeKey>, RegistryError> {
        let mut path = Vec::new();
        let mut seen = TypeIdSet::new();
        let mut ancestors = Vec::new();
        self.visit(key, &mut path, &mut seen, &mut ancestors)?;
        Ok(ancestors)
    }

    fn visit(
        &self,
        key: TypeKey,
        path: &mut Vec<TypeKey>,
        seen: &mut TypeIdSet,
        ancestors: &mut Vec<TypeKey>,
    ) -> Result<(), RegistryError> {
        path.push(key);
        if let Some(lineage) = self.lineage.get(&key.id()) {
            for base in &lineage.bases {
                if path.contains(base) {
                    return Err(RegistryError::CyclicLineage(*base));
                }
                if seen.insert(base.id()) {
                    ancestors.push(*base);
                    self.visit(*base, path, seen, ancestors)?;
                }
            }
        }
        path.pop();
        Ok(())
    }

    fn resolve(&self, key: TypeKey) -> Result<WrapPolicy, RegistryError> {
        let ancestors = self.ancestors(key)?;
        if self.excluded.contains(&key.id()) {
            return Ok(WrapPolicy::Unwrapped);
        }

        let candidates: Vec<(TypeKey, Wrapped)> = core::iter::once(key)
            .chain(ancestors)
            .filter_map(|ty| self.wrapped.get(&ty.id()).map(|wrapped| (ty, *wrapped)))
            .collect();

        // Drop every candidate that another candidate descends from.
        let mut specific = Vec::with_capacity(candidates.len());
        for &(ty, wrapped) in &candidates {
            let mut shadowed = false;
            for &(other, _) in &candidates {
                if other != ty && self.ancestors(other)?.contains(&ty) {
                    shadowed = true;
                    break;
                }
            }
            if !shadowed {
                specific.push((ty, wrapped));
            }
        }

        match specific.as_slice() {
            [] => Ok(WrapPolicy::Unwrapped),
            [(_, wrapped)] => Ok(WrapPolicy::Wrapped(*wrapped)),
            _ => Err(RegistryError::Ambiguous {
                ty: key,
                candidates: specific.iter().map(|(ty, _)| *ty).collect(),
            }),
        }
    }
}
