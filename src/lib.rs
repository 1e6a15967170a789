//! Ordex - an in-memory ordered index engine built on a B-tree.
//!
//! # Architecture
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                          Ordex                            │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌───────────────────────────────────────────────────┐    │
//! │  │        Application Layer (index/database.rs)      │    │
//! │  │     DatabaseIndex<K, V>: key → payload mapping    │    │
//! │  └───────────────────────────────────────────────────┘    │
//! │                            ↓                              │
//! │  ┌───────────────────────────────────────────────────┐    │
//! │  │             Index Layer (index/btree/)            │    │
//! │  │   BTree: search / insert / delete / range query   │    │
//! │  │   Iter: lazy ascending traversal                  │    │
//! │  │   BTreeStats: structural statistics               │    │
//! │  └───────────────────────────────────────────────────┘    │
//! │                            ↓                              │
//! │  ┌───────────────────────────────────────────────────┐    │
//! │  │           Node Layer (index/btree/node.rs)        │    │
//! │  │   BTreeNode: bounded keys/children + primitives   │    │
//! │  └───────────────────────────────────────────────────┘    │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (Error, config)
//! - [`index`] - The B-tree and the index layer built on it
//!
//! # Quick Start
//! ```
//! use ordex::BTree;
//!
//! let mut tree: BTree<i32> = BTree::new(3).unwrap();
//! tree.insert(7);
//! tree.insert(3);
//! tree.insert(11);
//!
//! assert_eq!(tree.search(&7), Some(&7));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![3, 7, 11]);
//! assert!(tree.delete(&3));
//! assert_eq!(tree.len(), 2);
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_MIN_DEGREE, MIN_DEGREE_FLOOR};
pub use common::{Error, Result};

pub use index::btree::{BTree, BTreeNode, BTreeStats, Iter};
pub use index::DatabaseIndex;
