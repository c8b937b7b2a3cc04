//! the key-indexed node store
use crate::{
    error::{Error, Result},
    node::Node,
};
use core::{fmt::Debug, hash::Hash};
use fnv::{FnvHashMap, FnvHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

/// work stack for the depth first traversals, most trees are shallow
type Stack<K> = SmallVec<[K; 16]>;

/// A forest of nodes indexed by key.
///
/// Every node has at most one parent and any number of children. Parent and child links are kept
/// consistent in both directions by every mutating operation: if `a` lists `b` as a child, then the
/// parent of `b` is `a`.
///
/// Traversals use an explicit stack and keep track of visited keys, so a corrupted structure will
/// surface as [Error::Cycle] instead of a stack overflow or an infinite loop.
#[derive(Debug, Clone)]
pub struct ParentTree<K: Eq + Hash> {
    map: FnvHashMap<K, Node<K>>,
}

impl<K: Eq + Hash> Default for ParentTree<K> {
    fn default() -> Self {
        Self {
            map: FnvHashMap::default(),
        }
    }
}

impl<K: Clone + Eq + Hash + Debug> ParentTree<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: FnvHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub fn get(&self, key: &K) -> Option<&Node<K>> {
        self.map.get(key)
    }

    /// all keys in the tree, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    /// keys of all nodes without a parent
    pub fn roots(&self) -> impl Iterator<Item = &K> {
        self.map
            .values()
            .filter(|node| node.is_root())
            .map(|node| &node.key)
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }

    /// Add a parentless node for `key`.
    ///
    /// Adding an existing key leaves its links untouched. Returns true if a node was created.
    pub fn add(&mut self, key: K) -> bool {
        if self.map.contains_key(&key) {
            return false;
        }
        trace!("add {:?}", key);
        self.map.insert(key.clone(), Node::root(key));
        true
    }

    /// Move the node stored under `old` to `new`, rewriting the links of its parent and children.
    ///
    /// Updating a key to itself is a no-op.
    pub fn update(&mut self, old: &K, new: K) -> Result<()> {
        if !self.map.contains_key(old) {
            return Err(Error::not_found(old));
        }
        if old == &new {
            return Ok(());
        }
        if self.map.contains_key(&new) {
            return Err(Error::already_exists(&new));
        }
        let mut node = self.map.remove(old).ok_or_else(|| Error::not_found(old))?;
        trace!("update {:?} -> {:?}", old, new);
        if let Some(parent) = node.parent.as_ref() {
            let parent = self.node_mut(parent)?;
            parent.children.remove(old);
            parent.children.insert(new.clone());
        }
        for child in node.children.iter() {
            self.node_mut(child)?.parent = Some(new.clone());
        }
        node.key = new.clone();
        self.map.insert(new, node);
        Ok(())
    }

    /// Remove the node for `key` and return it.
    ///
    /// The node is detached from its parent, and its former children become roots. The returned node
    /// still carries its last parent and children for inspection.
    pub fn remove(&mut self, key: &K) -> Result<Node<K>> {
        let node = self.map.remove(key).ok_or_else(|| Error::not_found(key))?;
        trace!("remove {:?}", key);
        if let Some(parent) = node.parent.as_ref() {
            if let Some(parent) = self.map.get_mut(parent) {
                parent.children.remove(key);
            }
        }
        for child in node.children.iter() {
            if let Some(child) = self.map.get_mut(child) {
                child.parent = None;
            }
        }
        Ok(node)
    }

    /// Add `key` as a child of `parent`, creating a parentless node for `parent` if needed.
    ///
    /// If `key` already exists, its parent is not changed. Use [relink](Self::relink) for that.
    /// Returns true if `key` was created and linked.
    pub fn add_parent(&mut self, key: K, parent: K) -> bool {
        self.add(parent.clone());
        if self.map.contains_key(&key) {
            debug!("{:?} already exists, not linking to {:?}", key, parent);
            return false;
        }
        trace!("link {:?} -> {:?}", key, parent);
        if let Some(node) = self.map.get_mut(&parent) {
            node.children.insert(key.clone());
        }
        self.map.insert(key.clone(), Node::child(key, parent));
        true
    }

    /// Change the parent of an existing node.
    ///
    /// `None` detaches the node and makes it a root. A missing parent is created as a root.
    /// Making a node its own ancestor fails with [Error::Cycle].
    pub fn relink(&mut self, key: &K, parent: Option<K>) -> Result<()> {
        let current = self.node(key)?.parent.clone();
        if current == parent {
            return Ok(());
        }
        if let Some(parent) = parent.as_ref() {
            if parent == key || self.all_parents(parent)?.contains(key) {
                return Err(Error::cycle(key));
            }
        }
        trace!("relink {:?}: {:?} -> {:?}", key, current, parent);
        if let Some(current) = current.as_ref() {
            self.node_mut(current)?.children.remove(key);
        }
        if let Some(parent) = parent.as_ref() {
            self.add(parent.clone());
            self.node_mut(parent)?.children.insert(key.clone());
        }
        self.node_mut(key)?.parent = parent;
        Ok(())
    }

    /// the parent key, or None if `key` is a root or absent
    pub fn parent(&self, key: &K) -> Option<&K> {
        self.map.get(key).and_then(|node| node.parent.as_ref())
    }

    /// Ancestor keys, from the immediate parent up to the root.
    ///
    /// Empty if `key` is a root or absent.
    pub fn all_parents(&self, key: &K) -> Result<Vec<K>> {
        let mut res = Vec::new();
        let mut node = match self.map.get(key) {
            Some(node) => node,
            None => return Ok(res),
        };
        let mut seen = FnvHashSet::default();
        seen.insert(key);
        while let Some(parent) = node.parent.as_ref() {
            if !seen.insert(parent) {
                warn!("cycle in ancestors of {:?} at {:?}", key, parent);
                return Err(Error::cycle(parent));
            }
            res.push(parent.clone());
            node = self.node(parent).map_err(|_| self.dangling(&node.key, parent))?;
        }
        Ok(res)
    }

    /// immediate child keys, empty if `key` is absent or a leaf
    pub fn children(&self, key: &K) -> Vec<K> {
        self.map
            .get(key)
            .map(|node| node.children.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All descendant keys in depth first pre-order, excluding `key` itself.
    ///
    /// Every node is listed before its own descendants, and all descendants of a node are listed
    /// before its next sibling. The order of siblings is unspecified.
    pub fn all_children(&self, key: &K) -> Result<Vec<K>> {
        let mut res = Vec::new();
        let node = match self.map.get(key) {
            Some(node) => node,
            None => return Ok(res),
        };
        let mut seen = FnvHashSet::default();
        seen.insert(key);
        let mut stack: Stack<&K> = node.children.iter().collect();
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                warn!("cycle in descendants of {:?} at {:?}", key, current);
                return Err(Error::cycle(current));
            }
            res.push(current.clone());
            let node = self.node(current).map_err(|_| self.dangling(key, current))?;
            stack.extend(node.children.iter());
        }
        Ok(res)
    }

    /// Other children of the parent of `key`, never including `key` itself.
    ///
    /// Empty if `key` is a root or absent.
    pub fn siblings(&self, key: &K) -> Vec<K> {
        self.parent(key)
            .and_then(|parent| self.map.get(parent))
            .map(|parent| {
                parent
                    .children
                    .iter()
                    .filter(|child| *child != key)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// number of ancestors of `key`, 0 for roots
    pub fn depth(&self, key: &K) -> Result<usize> {
        self.node(key)?;
        Ok(self.all_parents(key)?.len())
    }

    /// Check that all links are bidirectionally consistent and that there are no cycles.
    pub fn check_invariants(&self) -> Result<()> {
        for (key, node) in self.map.iter() {
            if &node.key != key {
                return Err(Error::Inconsistent(format!(
                    "node {:?} stored under {:?}",
                    node.key, key
                )));
            }
            if let Some(parent) = node.parent.as_ref() {
                let parent_node = self.node(parent).map_err(|_| self.dangling(key, parent))?;
                if !parent_node.children.contains(key) {
                    return Err(Error::Inconsistent(format!(
                        "{:?} is not a child of its parent {:?}",
                        key, parent
                    )));
                }
            }
            for child in node.children.iter() {
                let child_node = self.node(child).map_err(|_| self.dangling(key, child))?;
                if child_node.parent.as_ref() != Some(key) {
                    return Err(Error::Inconsistent(format!(
                        "{:?} is listed as a child of {:?}, but its parent is {:?}",
                        child, key, child_node.parent
                    )));
                }
            }
        }
        // with consistent links, every node that is not reachable from a root is part of a cycle
        let mut reachable = 0;
        for root in self.roots() {
            reachable += 1 + self.all_children(root)?.len();
        }
        if reachable != self.map.len() {
            if let Some(key) = self.map.keys().find(|key| self.all_parents(key).is_err()) {
                return Err(Error::cycle(key));
            }
            return Err(Error::Inconsistent(format!(
                "{} of {} nodes reachable from roots",
                reachable,
                self.map.len()
            )));
        }
        Ok(())
    }

    fn node(&self, key: &K) -> Result<&Node<K>> {
        self.map.get(key).ok_or_else(|| Error::not_found(key))
    }

    fn node_mut(&mut self, key: &K) -> Result<&mut Node<K>> {
        self.map.get_mut(key).ok_or_else(|| Error::not_found(key))
    }

    fn dangling(&self, from: &K, to: &K) -> Error {
        warn!("dangling link from {:?} to {:?}", from, to);
        Error::Inconsistent(format!("{:?} links to missing node {:?}", from, to))
    }
}
