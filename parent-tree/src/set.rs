//! values arranged in a forest, keyed by a key function
use crate::{
    config::Config,
    error::{Error, Result},
    tree::ParentTree,
};
use core::{fmt, fmt::Debug, hash::Hash};
use fnv::{FnvHashMap, FnvHashSet};
use std::sync::Arc;
use tracing::trace;

type KeyFn<K, V> = Arc<dyn Fn(&V) -> K + Send + Sync>;

/// A set of values arranged in a forest.
///
/// The identity of a value is the key computed by the key function given at construction. The key
/// function must be deterministic. Adding a value with the key of an existing value replaces the
/// stored value, but keeps the position of the node in the forest.
///
/// All queries that return values go through the value table, so a key without a stored value never
/// shows up in a result.
pub struct ParentTreeSet<K: Eq + Hash, V> {
    tree: ParentTree<K>,
    values: FnvHashMap<K, V>,
    key_fn: KeyFn<K, V>,
    config: Config,
}

impl<K: Clone + Eq + Hash, V: Clone> Clone for ParentTreeSet<K, V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            values: self.values.clone(),
            key_fn: self.key_fn.clone(),
            config: self.config,
        }
    }
}

impl<K: Eq + Hash + Debug, V: Debug> Debug for ParentTreeSet<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParentTreeSet")
            .field("tree", &self.tree)
            .field("values", &self.values)
            .field("config", &self.config)
            .finish()
    }
}

impl<K: Clone + Eq + Hash + Debug, V> ParentTreeSet<K, V> {
    pub fn new(key_fn: impl Fn(&V) -> K + Send + Sync + 'static) -> Self {
        Self::with_config(Config::default(), key_fn)
    }

    pub fn with_config(config: Config, key_fn: impl Fn(&V) -> K + Send + Sync + 'static) -> Self {
        Self {
            tree: ParentTree::with_capacity(config.initial_capacity),
            values: FnvHashMap::with_capacity_and_hasher(
                config.initial_capacity,
                Default::default(),
            ),
            key_fn: Arc::new(key_fn),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// the underlying forest of keys
    pub fn tree(&self) -> &ParentTree<K> {
        &self.tree
    }

    pub fn key_of(&self, value: &V) -> K {
        (self.key_fn)(value)
    }

    /// number of nodes in the forest
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// the value stored under `key`, if any
    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    /// values of all nodes, in no particular order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.project_iter(self.tree.keys())
    }

    /// values of all nodes without a parent
    pub fn roots(&self) -> impl Iterator<Item = &V> {
        self.project_iter(self.tree.roots())
    }

    pub fn clear(&mut self) {
        self.tree.clear();
        self.values.clear();
    }

    /// Store `value` and make sure there is a node for it.
    ///
    /// The value always replaces a previously stored value with the same key, the links of an
    /// existing node are kept.
    pub fn add(&mut self, value: V) -> K {
        let key = self.key_of(&value);
        self.values.insert(key.clone(), value);
        self.tree.add(key.clone());
        key
    }

    pub fn update_or_add(&mut self, value: V) -> K {
        self.add(value)
    }

    /// Remove the node for the key of `value`. Returns the number of removed nodes, 0 or 1.
    ///
    /// Former children of the node become roots.
    pub fn delete(&mut self, value: &V) -> usize {
        let key = self.key_of(value);
        self.delete_key(&key)
    }

    pub fn delete_all<'a>(&mut self, values: impl IntoIterator<Item = &'a V>) -> usize
    where
        V: 'a,
    {
        values.into_iter().map(|value| self.delete(value)).sum()
    }

    /// Store `value` and `parent`, and add `value` as a child of `parent`.
    ///
    /// Like [ParentTree::add_parent], an existing node for `value` keeps its current parent. Both
    /// values are stored regardless.
    pub fn add_parent(&mut self, value: V, parent: V) -> K {
        let parent_key = self.add(parent);
        let key = self.key_of(&value);
        self.values.insert(key.clone(), value);
        self.tree.add_parent(key.clone(), parent_key);
        key
    }

    /// Move the node for `value` below `parent`, or make it a root for `None`.
    ///
    /// The parent value is stored, and gets a node if it does not have one yet.
    pub fn relink(&mut self, value: &V, parent: Option<V>) -> Result<()> {
        let key = self.contained_key(value)?;
        let parent_key = parent.as_ref().map(|parent| self.key_of(parent));
        self.tree.relink(&key, parent_key.clone())?;
        if let (Some(parent_key), Some(parent)) = (parent_key, parent) {
            self.values.insert(parent_key, parent);
        }
        Ok(())
    }

    /// Replace `old` with `new`, moving the node if the key changes.
    ///
    /// Fails if `old` is not contained, or if the key of `new` belongs to a different node.
    pub fn replace(&mut self, old: &V, new: V) -> Result<K> {
        let old_key = self.contained_key(old)?;
        let new_key = self.key_of(&new);
        if old_key != new_key {
            self.tree.update(&old_key, new_key.clone())?;
            self.values.remove(&old_key);
        }
        self.values.insert(new_key.clone(), new);
        Ok(new_key)
    }

    /// true if there is both a node and a stored value for the key of `value`
    pub fn contains(&self, value: &V) -> bool {
        self.contains_key(&self.key_of(value))
    }

    /// true if `value` is contained and equal to the stored value for its key
    pub fn contains_and_equals(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        let key = self.key_of(value);
        self.contains_key(&key) && self.values.get(&key) == Some(value)
    }

    /// Values of all ancestors, from the immediate parent up to the root.
    pub fn get_parent_tree_at(&self, value: &V) -> Result<Vec<&V>> {
        let key = self.key_of(value);
        if !self.contains_key(&key) {
            return Ok(Vec::new());
        }
        Ok(self.project(&self.tree.all_parents(&key)?))
    }

    /// The value itself, followed by all its descendants in depth first pre-order.
    pub fn get_tree_at(&self, value: &V) -> Result<Vec<&V>> {
        Ok(self.project(&self.tree_keys(value)?))
    }

    /// Ancestors, the value itself and its descendants, without duplicates.
    pub fn get_full_tree(&self, value: &V) -> Result<Vec<&V>> {
        let key = self.key_of(value);
        if !self.contains_key(&key) {
            return Ok(Vec::new());
        }
        let mut keys = self.tree.all_parents(&key)?;
        keys.extend(self.tree_keys(value)?);
        let mut seen = FnvHashSet::default();
        keys.retain(|key| seen.insert(key.clone()));
        Ok(self.project(&keys))
    }

    /// Delete the value and all its descendants, returning the removed values in
    /// [get_tree_at](Self::get_tree_at) order.
    ///
    /// The result does not depend on [Config::purge_values]; the values are captured before
    /// deletion.
    pub fn delete_tree_at(&mut self, value: &V) -> Result<Vec<V>>
    where
        V: Clone,
    {
        let keys = self.tree_keys(value)?;
        let mut res = Vec::with_capacity(keys.len());
        for key in keys.iter() {
            let removed = if self.config.purge_values {
                self.values.remove(key)
            } else {
                self.values.get(key).cloned()
            };
            res.extend(removed);
            if self.tree.remove(key).is_ok() {
                trace!("deleted {:?}", key);
            }
        }
        Ok(res)
    }

    /// value of the parent, None for roots and values that are not contained
    pub fn parent_of(&self, value: &V) -> Option<&V> {
        let key = self.key_of(value);
        self.tree
            .parent(&key)
            .and_then(|parent| self.values.get(parent))
    }

    /// values of the immediate children
    pub fn children_of(&self, value: &V) -> Vec<&V> {
        self.project(&self.tree.children(&self.key_of(value)))
    }

    /// values of the other children of the parent, never including `value` itself
    pub fn siblings_of(&self, value: &V) -> Vec<&V> {
        self.project(&self.tree.siblings(&self.key_of(value)))
    }

    /// Check the forest links, and that every node has a stored value.
    pub fn check_invariants(&self) -> Result<()> {
        self.tree.check_invariants()?;
        if let Some(key) = self.tree.keys().find(|key| !self.values.contains_key(*key)) {
            return Err(Error::Inconsistent(format!("node {:?} without value", key)));
        }
        if self.config.purge_values {
            if let Some(key) = self.values.keys().find(|key| !self.tree.contains(key)) {
                return Err(Error::Inconsistent(format!("value {:?} without node", key)));
            }
        }
        Ok(())
    }

    fn contains_key(&self, key: &K) -> bool {
        self.values.contains_key(key) && self.tree.contains(key)
    }

    fn contained_key(&self, value: &V) -> Result<K> {
        let key = self.key_of(value);
        if self.contains_key(&key) {
            Ok(key)
        } else {
            Err(Error::not_found(&key))
        }
    }

    fn delete_key(&mut self, key: &K) -> usize {
        if self.config.purge_values {
            self.values.remove(key);
        }
        match self.tree.remove(key) {
            Ok(_) => {
                trace!("deleted {:?}", key);
                1
            }
            Err(_) => 0,
        }
    }

    /// key of `value` followed by the keys of all descendants, empty if not contained
    fn tree_keys(&self, value: &V) -> Result<Vec<K>> {
        let key = self.key_of(value);
        if !self.contains_key(&key) {
            return Ok(Vec::new());
        }
        let descendants = self.tree.all_children(&key)?;
        let mut keys = Vec::with_capacity(descendants.len() + 1);
        keys.push(key);
        keys.extend(descendants);
        Ok(keys)
    }

    fn project(&self, keys: &[K]) -> Vec<&V> {
        keys.iter().filter_map(|key| self.values.get(key)).collect()
    }

    fn project_iter<'a>(
        &'a self,
        keys: impl Iterator<Item = &'a K> + 'a,
    ) -> impl Iterator<Item = &'a V> + 'a {
        keys.filter_map(move |key| self.values.get(key))
    }
}
