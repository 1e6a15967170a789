//! Structural statistics for a B-tree.

use std::fmt;

use crate::common::config::max_keys;
use crate::index::btree::node::BTreeNode;
use crate::index::btree::tree::BTree;

/// A point-in-time snapshot of a tree's structural characteristics.
///
/// Computed by [`BTree::stats`]; plain data that can be printed, compared,
/// or logged freely.
///
/// # Example
/// ```
/// use ordex::BTree;
///
/// let mut tree: BTree<u32> = BTree::new(3).unwrap();
/// for key in 0..100 {
///     tree.insert(key);
/// }
///
/// let stats = tree.stats();
/// assert_eq!(stats.size, 100);
/// assert!(stats.storage_efficiency > 0.0);
/// println!("{}", stats);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BTreeStats {
    /// Total number of keys.
    pub size: usize,

    /// Number of levels.
    pub height: usize,

    /// Minimum degree `t` of the tree.
    pub min_degree: usize,

    /// Number of nodes.
    pub node_count: usize,

    /// Estimated heap footprint in bytes (allocated capacity, not just
    /// live entries).
    pub memory_bytes: usize,

    /// Mean keys stored per node.
    pub average_keys_per_node: f64,

    /// Fraction of the allocated key slots that hold a key
    /// (`size / (node_count * (2t - 1))`).
    pub storage_efficiency: f64,

    /// Worst-case height of a B-tree of this size and degree (every node
    /// at minimum occupancy): `log_t((n + 1) / 2)`, counted in edges.
    pub theoretical_height: f64,
}

impl fmt::Display for BTreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BTreeStats {{ size: {}, height: {}, nodes: {}, avg keys/node: {:.2}, \
             efficiency: {:.2}%, memory: {} bytes }}",
            self.size,
            self.height,
            self.node_count,
            self.average_keys_per_node,
            self.storage_efficiency * 100.0,
            self.memory_bytes
        )
    }
}

impl<T> BTree<T> {
    /// Compute a statistics snapshot by walking the tree.
    pub fn stats(&self) -> BTreeStats {
        let min_degree = self.min_degree();
        let size = self.len();

        let Some(root) = self.root_node() else {
            return BTreeStats {
                size: 0,
                height: 0,
                min_degree,
                node_count: 0,
                memory_bytes: std::mem::size_of::<Self>(),
                average_keys_per_node: 0.0,
                storage_efficiency: 0.0,
                theoretical_height: 0.0,
            };
        };

        let mut node_count = 0;
        let mut memory_bytes = std::mem::size_of::<Self>();
        visit(root, &mut node_count, &mut memory_bytes);

        let slot_count = node_count * max_keys(min_degree);
        BTreeStats {
            size,
            height: self.height(),
            min_degree,
            node_count,
            memory_bytes,
            average_keys_per_node: size as f64 / node_count as f64,
            storage_efficiency: size as f64 / slot_count as f64,
            theoretical_height: ((size as f64 + 1.0) / 2.0).ln() / (min_degree as f64).ln(),
        }
    }
}

/// Accumulate node count and memory over a subtree.
fn visit<T>(node: &BTreeNode<T>, node_count: &mut usize, memory_bytes: &mut usize) {
    *node_count += 1;
    *memory_bytes += node.memory_size();
    if !node.is_leaf() {
        for i in 0..node.child_count() {
            visit(node.child(i), node_count, memory_bytes);
        }
    }
}
