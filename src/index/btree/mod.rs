//! B-tree index implementation.
//!
//! An in-memory B-tree of minimum degree `t`:
//! - every node holds at most `2t - 1` keys;
//! - every non-root node holds at least `t - 1` keys;
//! - all leaves sit at the same depth.
//!
//! # Components
//! - [`BTreeNode`] - fixed-capacity key/child container with index-safe
//!   mutation primitives
//! - [`BTree`] - search, insertion (pre-emptive splitting), deletion
//!   (borrow/merge rebalancing), range queries
//! - [`Iter`] - lazy ascending traversal
//! - [`BTreeStats`] - structural statistics snapshot

mod iter;
mod node;
mod stats;
mod tree;

pub use iter::Iter;
pub use node::BTreeNode;
pub use stats::BTreeStats;
pub use tree::{BTree, KeyComparator};
