use core::any::TypeId;
use core::fmt::Debug;

use crate::hash::hashbrown::hash_map::Entry;
use crate::hash::{NoOpHashMap, NoOpHashSet, NoOpHashState};

// -----------------------------------------------------------------------------
// TypeIdMap

/// A map with [`TypeId`] as the fixed key type.
///
/// Only the operations the registry tables need are exposed, so the backing
/// container can change without touching callers.
///
/// # Examples
///
/// ```
/// use bg_utils::TypeIdMap;
///
/// let mut map = TypeIdMap::new();
/// assert!(map.try_insert_type::<u8>(|| "byte"));
/// assert!(!map.try_insert_type::<u8>(|| "again"));
/// assert_eq!(map.get_type::<u8>(), Some(&"byte"));
/// ```
pub struct TypeIdMap<V>(NoOpHashMap<TypeId, V>);

impl<V> TypeIdMap<V> {
    /// Creates an empty `TypeIdMap`.
    #[inline]
    pub const fn new() -> Self {
        Self(NoOpHashMap::with_hasher(NoOpHashState))
    }

    /// Creates an empty `TypeIdMap` with the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(NoOpHashMap::with_capacity_and_hasher(capacity, NoOpHashState))
    }

    /// Attempts to insert a key-value pair into the map.
    ///
    /// - Returns `true` if the key was not present and the pair was inserted.
    /// - Returns `false` if the key already exists, leaving the map unchanged.
    ///
    /// The closure `f` is only called if the key is not present.
    #[inline]
    pub fn try_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> bool {
        match self.0.entry(type_id) {
            Entry::Vacant(entry) => {
                entry.insert(f());
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// See [`try_insert`](Self::try_insert).
    #[inline(always)]
    pub fn try_insert_type<T: ?Sized + 'static>(&mut self, f: impl FnOnce() -> V) -> bool {
        self.try_insert(TypeId::of::<T>(), f)
    }

    /// Gets a mutable reference to the value of `type_id`, inserting the
    /// result of `f` first if the key is not present.
    #[inline]
    pub fn get_or_insert(&mut self, type_id: TypeId, f: impl FnOnce() -> V) -> &mut V {
        match self.0.entry(type_id) {
            Entry::Vacant(entry) => entry.insert(f()),
            Entry::Occupied(entry) => entry.into_mut(),
        }
    }

    /// Returns a reference to the value corresponding to the key.
    #[inline]
    pub fn get(&self, type_id: &TypeId) -> Option<&V> {
        self.0.get(type_id)
    }

    /// Returns a reference to the value corresponding to the type.
    #[inline(always)]
    pub fn get_type<T: ?Sized + 'static>(&self) -> Option<&V> {
        self.get(&TypeId::of::<T>())
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut(&mut self, type_id: &TypeId) -> Option<&mut V> {
        self.0.get_mut(type_id)
    }

    /// Inserts a key-value pair, returning the previous value if any.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId, v: V) -> Option<V> {
        self.0.insert(type_id, v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains_key(type_id)
    }

    /// Returns `true` if the map contains a value for the specified type.
    #[inline(always)]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&TypeId::of::<T>())
    }

    /// Returns the number of elements in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator visiting all key-value pairs in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&TypeId, &V)> {
        self.0.iter()
    }

    /// An iterator visiting all values in arbitrary order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.0.values()
    }

    /// An iterator visiting all keys in arbitrary order.
    #[inline]
    pub fn types(&self) -> impl ExactSizeIterator<Item = &TypeId> {
        self.0.keys()
    }
}

impl<T> Default for TypeIdMap<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for TypeIdMap<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Debug> Debug for TypeIdMap<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

// -----------------------------------------------------------------------------
// TypeIdSet

/// A set of [`TypeId`]s.
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use bg_utils::TypeIdSet;
///
/// let mut set = TypeIdSet::new();
/// assert!(set.insert(TypeId::of::<u8>()));
/// assert!(!set.insert(TypeId::of::<u8>()));
/// assert!(set.contains_type::<u8>());
/// ```
#[derive(Clone, Default)]
pub struct TypeIdSet(NoOpHashSet<TypeId>);

impl TypeIdSet {
    /// Creates an empty `TypeIdSet`.
    #[inline]
    pub const fn new() -> Self {
        Self(NoOpHashSet::with_hasher(NoOpHashState))
    }

    /// Adds a key, returning `true` if it was not present.
    #[inline]
    pub fn insert(&mut self, type_id: TypeId) -> bool {
        self.0.insert(type_id)
    }

    /// Returns `true` if the set contains the key.
    #[inline]
    pub fn contains(&self, type_id: &TypeId) -> bool {
        self.0.contains(type_id)
    }

    /// Returns `true` if the set contains the type.
    #[inline(always)]
    pub fn contains_type<T: ?Sized + 'static>(&self) -> bool {
        self.contains(&TypeId::of::<T>())
    }

    /// Returns the number of elements in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An iterator visiting all keys in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeId> {
        self.0.iter()
    }
}

impl Debug for TypeIdSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{TypeIdMap, TypeIdSet};
    use core::any::TypeId;

    #[test]
    fn get_or_insert_keeps_first() {
        let mut map = TypeIdMap::with_capacity(4);
        *map.get_or_insert(TypeId::of::<i32>(), || 1) += 1;
        *map.get_or_insert(TypeId::of::<i32>(), || 100) += 1;

        assert_eq!(map.get_type::<i32>(), Some(&3));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_type::<u32>());
    }

    #[test]
    fn insert_overwrites() {
        let mut map = TypeIdMap::new();
        assert_eq!(map.insert(TypeId::of::<u8>(), 'a'), None);
        assert_eq!(map.insert(TypeId::of::<u8>(), 'b'), Some('a'));
        assert_eq!(map.values().copied().next(), Some('b'));
    }

    #[test]
    fn set_membership() {
        let mut set = TypeIdSet::default();
        assert!(set.is_empty());
        set.insert(TypeId::of::<()>());
        set.insert(TypeId::of::<bool>());
        assert_eq!(set.len(), 2);
        assert!(set.contains_type::<bool>());
        assert!(!set.contains_type::<char>());
    }
}
