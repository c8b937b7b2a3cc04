//! a parent tree set that can be shared between threads
use crate::{
    error::{Error, Result},
    set::ParentTreeSet,
};
use core::{fmt::Debug, hash::Hash};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// A cheaply cloneable handle to a [ParentTreeSet] behind a read/write lock.
///
/// Every method takes the lock for the duration of a single call, so each call sees a consistent
/// forest. A sequence of calls does not; use [read](Self::read) or [write](Self::write) to hold the
/// lock across multiple operations.
///
/// Query results are cloned out of the set, since they can not outlive the lock.
pub struct SharedParentTreeSet<K: Eq + Hash, V>(Arc<RwLock<ParentTreeSet<K, V>>>);

impl<K: Eq + Hash, V> Clone for SharedParentTreeSet<K, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<K: Eq + Hash + Debug, V: Debug> Debug for SharedParentTreeSet<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedParentTreeSet").field(&*self.0.read()).finish()
    }
}

impl<K: Eq + Hash, V> From<ParentTreeSet<K, V>> for SharedParentTreeSet<K, V> {
    fn from(set: ParentTreeSet<K, V>) -> Self {
        Self(Arc::new(RwLock::new(set)))
    }
}

impl<K: Clone + Eq + Hash + Debug, V: Clone> SharedParentTreeSet<K, V> {
    pub fn new(key_fn: impl Fn(&V) -> K + Send + Sync + 'static) -> Self {
        ParentTreeSet::new(key_fn).into()
    }

    /// shared access for a consistent view over multiple queries
    pub fn read(&self) -> RwLockReadGuard<'_, ParentTreeSet<K, V>> {
        self.0.read()
    }

    /// exclusive access for a sequence of operations that must not interleave with others
    pub fn write(&self) -> RwLockWriteGuard<'_, ParentTreeSet<K, V>> {
        self.0.write()
    }

    /// Get the set back, fails if there are other handles.
    pub fn into_inner(self) -> Result<ParentTreeSet<K, V>> {
        let inner = Arc::try_unwrap(self.0).map_err(|_| Error::MultipleStrongRef)?;
        Ok(inner.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn add(&self, value: V) -> K {
        self.write().add(value)
    }

    pub fn delete(&self, value: &V) -> usize {
        self.write().delete(value)
    }

    pub fn delete_all<'a>(&self, values: impl IntoIterator<Item = &'a V>) -> usize
    where
        V: 'a,
    {
        self.write().delete_all(values)
    }

    pub fn add_parent(&self, value: V, parent: V) -> K {
        self.write().add_parent(value, parent)
    }

    pub fn relink(&self, value: &V, parent: Option<V>) -> Result<()> {
        self.write().relink(value, parent)
    }

    pub fn replace(&self, old: &V, new: V) -> Result<K> {
        self.write().replace(old, new)
    }

    pub fn contains(&self, value: &V) -> bool {
        self.read().contains(value)
    }

    pub fn contains_and_equals(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.read().contains_and_equals(value)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.read().get(key).cloned()
    }

    pub fn get_parent_tree_at(&self, value: &V) -> Result<Vec<V>> {
        Ok(cloned(self.read().get_parent_tree_at(value)?))
    }

    pub fn get_tree_at(&self, value: &V) -> Result<Vec<V>> {
        Ok(cloned(self.read().get_tree_at(value)?))
    }

    pub fn get_full_tree(&self, value: &V) -> Result<Vec<V>> {
        Ok(cloned(self.read().get_full_tree(value)?))
    }

    pub fn delete_tree_at(&self, value: &V) -> Result<Vec<V>> {
        self.write().delete_tree_at(value)
    }

    pub fn parent_of(&self, value: &V) -> Option<V> {
        self.read().parent_of(value).cloned()
    }

    pub fn children_of(&self, value: &V) -> Vec<V> {
        cloned(self.read().children_of(value))
    }

    pub fn siblings_of(&self, value: &V) -> Vec<V> {
        cloned(self.read().siblings_of(value))
    }

    pub fn check_invariants(&self) -> Result<()> {
        self.read().check_invariants()
    }
}

fn cloned<V: Clone>(values: Vec<&V>) -> Vec<V> {
    values.into_iter().cloned().collect()
}
