use core::hash::Hash;
use fnv::FnvHashSet;

/// A single entry of a [ParentTree](crate::ParentTree).
///
/// Links are stored as keys and resolved through the tree, never as references to other nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K: Eq + Hash> {
    pub(crate) key: K,
    pub(crate) parent: Option<K>,
    pub(crate) children: FnvHashSet<K>,
}

impl<K: Eq + Hash> Node<K> {
    pub(crate) fn root(key: K) -> Self {
        Self {
            key,
            parent: None,
            children: FnvHashSet::default(),
        }
    }

    pub(crate) fn child(key: K, parent: K) -> Self {
        Self {
            key,
            parent: Some(parent),
            children: FnvHashSet::default(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// key of the parent node, None for roots
    pub fn parent(&self) -> Option<&K> {
        self.parent.as_ref()
    }

    /// keys of the immediate children, in no particular order
    pub fn children(&self) -> impl Iterator<Item = &K> {
        self.children.iter()
    }

    pub fn has_child(&self, key: &K) -> bool {
        self.children.contains(key)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_child() {
        let mut root = Node::root(1u32);
        let child = Node::child(2u32, 1);
        root.children.insert(2);
        assert!(root.is_root());
        assert!(!root.is_leaf());
        assert!(root.has_child(&2));
        assert_eq!(root.child_count(), 1);
        assert_eq!(child.parent(), Some(&1));
        assert!(child.is_leaf());
        assert_eq!(child.key(), &2);
    }
}
