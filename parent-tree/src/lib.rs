//! # Parent trees
//!
//! A parent tree is an in-memory forest of application values. Each value is identified by a key,
//! computed from the value by a key function supplied by the application. Values are arranged in a
//! parent/child hierarchy, and can be looked up by key and queried for their ancestors, descendants
//! and siblings.
//!
//! This is **not** a balanced or sorted tree, and **not** a persistent data structure. It is not a
//! general graph either: every node has at most one parent, and cycles are rejected.
//!
//! ## Layers
//!
//! The [ParentTree] is a forest of keys. Nodes store the keys of their parent and children, and
//! all links are resolved through the key index of the tree. Both directions of a link are kept in
//! sync by every mutating operation.
//!
//! The [ParentTreeSet] wraps a [ParentTree] with a table from key to the latest value added for
//! that key. Adding a value with an existing key replaces the value, but keeps the node where it
//! is in the forest. Queries on the set take and return values.
//!
//! ## Removal
//!
//! Removing a node detaches it from its parent. Its children are not removed, but become roots.
//! To remove a whole subtree, use [ParentTreeSet::delete_tree_at]. Whether the stored value is
//! removed together with the node is configured with [Config::purge_values].
//!
//! ## Concurrency
//!
//! [ParentTree] and [ParentTreeSet] are plain data structures that are mutated through `&mut self`.
//! [SharedParentTreeSet] puts a set behind a read/write lock. Single calls on it are atomic, but a
//! sequence of calls is not. Hold a [read](SharedParentTreeSet::read) or
//! [write](SharedParentTreeSet::write) guard to get a consistent view over multiple operations.
//!
//! ## Deep trees
//!
//! All traversals use an explicit stack, so deep or degenerate trees do not exhaust the call stack.
//! Traversals also track visited nodes, and report a corrupted structure as [Error::Cycle].
mod config;
mod error;
mod node;
mod set;
mod shared;
mod tree;

pub use config::Config;
pub use error::{Error, Result};
pub use node::Node;
pub use set::ParentTreeSet;
pub use shared::SharedParentTreeSet;
pub use tree::ParentTree;

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;
