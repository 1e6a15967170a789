//! Lazy ascending traversal of a B-tree.

use crate::index::btree::node::BTreeNode;
use crate::index::btree::tree::BTree;

/// Ascending (inorder) iterator over a tree's keys.
///
/// Lazy: keys are produced one at a time as the caller pulls them.
/// Restartable: every call to [`BTree::iter`] builds fresh iterator state
/// from the tree structure, so traversals never interfere with each other.
///
/// Internally an explicit stack of `(node, next key index)` frames stands
/// in for the recursion, since a Rust iterator cannot suspend a recursive
/// walk. Stack depth is bounded by the tree height.
pub struct Iter<'a, T> {
    /// Pending frames, innermost last. Each frame resumes at `next key
    /// index`; for internal nodes the child left of that key has already
    /// been visited.
    stack: Vec<(&'a BTreeNode<T>, usize)>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: Option<&'a BTreeNode<T>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        if let Some(root) = root {
            iter.descend_leftmost(root);
        }
        iter
    }

    /// Push `node` and the chain of its leftmost descendants.
    fn descend_leftmost(&mut self, node: &'a BTreeNode<T>) {
        let mut node = node;
        loop {
            self.stack.push((node, 0));
            if node.is_leaf() {
                return;
            }
            node = node.child(0);
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            let (node, index) = self.stack.last_mut()?;
            let node = *node;

            if *index >= node.len() {
                // Frame exhausted; resume the parent at its pending key.
                self.stack.pop();
                continue;
            }

            let key = node.key(*index);
            *index += 1;

            if !node.is_leaf() {
                // Visit the subtree to the right of the yielded key before
                // this frame's next key.
                let right = node.child(*index);
                self.descend_leftmost(right);
            }
            return Some(key);
        }
    }
}

impl<T> BTree<T> {
    /// Lazy ascending traversal of all keys.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root_node())
    }
}

impl<'a, T> IntoIterator for &'a BTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(min_degree: usize, keys: &[i32]) -> BTree<i32> {
        let mut tree = BTree::new(min_degree).unwrap();
        for &key in keys {
            tree.insert(key);
        }
        tree
    }

    #[test]
    fn test_iter_empty_tree() {
        let tree: BTree<i32> = BTree::new(3).unwrap();
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn test_iter_single_leaf() {
        let tree = build(3, &[2, 1, 3]);
        let got: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(got, vec![1, 2, 3]);
    }

    #[test]
    fn test_iter_multi_level_tree_is_sorted() {
        // Enough keys for three levels at t = 2.
        let mut keys: Vec<i32> = (1..=64).rev().collect();
        let tree = build(2, &keys);
        keys.sort_unstable();

        let got: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(got, keys);
    }

    #[test]
    fn test_iter_is_lazy_and_restartable() {
        let tree = build(2, &(1..=10).collect::<Vec<_>>());

        // Pull only a prefix.
        let prefix: Vec<i32> = tree.iter().take(3).copied().collect();
        assert_eq!(prefix, vec![1, 2, 3]);

        // A fresh traversal starts over from the smallest key.
        let full: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(full, (1..=10).collect::<Vec<_>>());

        // Two interleaved traversals do not disturb each other.
        let mut a = tree.iter();
        let mut b = tree.iter();
        assert_eq!(a.next(), Some(&1));
        assert_eq!(a.next(), Some(&2));
        assert_eq!(b.next(), Some(&1));
        assert_eq!(a.next(), Some(&3));
        assert_eq!(b.next(), Some(&2));
    }

    #[test]
    fn test_into_iterator_for_reference() {
        let tree = build(2, &[3, 1, 2]);
        let mut got = Vec::new();
        for key in &tree {
            got.push(*key);
        }
        assert_eq!(got, vec![1, 2, 3]);
    }
}
