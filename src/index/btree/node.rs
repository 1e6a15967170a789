//! B-tree node - a bounded container of keys and child links.

use std::cmp::Ordering;
use std::mem;

use crate::common::{Error, Result};

/// A node in a B-tree.
///
/// Each node holds:
/// - `keys`: up to `2t - 1` keys, sorted ascending under the tree's
///   comparator; the vector length is the live key count (`num_keys`),
///   there is no sentinel padding.
/// - `children`: `None` for leaves; for internal nodes exactly
///   `keys.len() + 1` exclusively-owned children.
///
/// Whether a node is a leaf is fixed at creation: leaves never gain a
/// children array and internal nodes never lose theirs.
///
/// # Index contract
/// The index-based primitives are only ever called by the tree layer with
/// indices it just computed, so an out-of-range index (or touching
/// `children` on a leaf) is a programming defect, not a runtime condition.
/// These methods assert and panic rather than return errors; see the
/// `# Panics` sections. The validating constructor [`BTreeNode::try_from_parts`]
/// is the `Result`-returning surface for building nodes from raw parts.
#[derive(Debug, Clone)]
pub struct BTreeNode<T> {
    /// Live keys, sorted ascending.
    keys: Vec<T>,

    /// Child subtrees; `None` iff this node is a leaf.
    children: Option<Vec<Box<BTreeNode<T>>>>,
}

impl<T> BTreeNode<T> {
    /// Create an empty leaf node with room for `max_keys` keys.
    pub(crate) fn new_leaf(max_keys: usize) -> Self {
        Self {
            keys: Vec::with_capacity(max_keys),
            children: None,
        }
    }

    /// Create an empty internal node with room for `max_keys` keys
    /// and `max_keys + 1` children.
    pub(crate) fn new_internal(max_keys: usize) -> Self {
        Self {
            keys: Vec::with_capacity(max_keys),
            children: Some(Vec::with_capacity(max_keys + 1)),
        }
    }

    /// Build a node from raw parts, validating the structural invariants.
    ///
    /// # Errors
    /// - [`Error::LeafWithChildren`] if `is_leaf` but children are supplied
    /// - [`Error::MissingChildren`] if internal but children are omitted
    /// - [`Error::KeyOverflow`] if more than `max_keys` keys are supplied
    /// - [`Error::ChildCountMismatch`] if an internal node's children count
    ///   is not `keys.len() + 1`
    pub fn try_from_parts(
        keys: Vec<T>,
        children: Option<Vec<Box<BTreeNode<T>>>>,
        is_leaf: bool,
        max_keys: usize,
    ) -> Result<Self> {
        if is_leaf && children.is_some() {
            return Err(Error::LeafWithChildren);
        }
        if !is_leaf && children.is_none() {
            return Err(Error::MissingChildren);
        }
        if keys.len() > max_keys {
            return Err(Error::KeyOverflow {
                len: keys.len(),
                max: max_keys,
            });
        }
        if let Some(ref children) = children {
            if children.len() != keys.len() + 1 {
                return Err(Error::ChildCountMismatch {
                    keys: keys.len(),
                    children: children.len(),
                });
            }
        }
        Ok(Self { keys, children })
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Number of live keys (`num_keys`).
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether this node holds no keys (transient: a freshly emptied root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether this node is a leaf.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of live children (`num_keys + 1` for internal nodes, 0 for leaves).
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }

    /// Whether the node is at capacity.
    #[inline]
    pub fn is_full(&self, max_keys: usize) -> bool {
        self.keys.len() >= max_keys
    }

    /// Whether the node is below the minimum occupancy.
    #[inline]
    pub fn is_underflow(&self, min_keys: usize) -> bool {
        self.keys.len() < min_keys
    }

    // ========================================================================
    // Key primitives
    // ========================================================================

    /// Get the key at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn key(&self, index: usize) -> &T {
        assert!(index < self.keys.len(), "key index {} out of range", index);
        &self.keys[index]
    }

    /// Overwrite the key at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn set_key(&mut self, index: usize, key: T) {
        assert!(index < self.keys.len(), "key index {} out of range", index);
        self.keys[index] = key;
    }

    /// Overwrite the key at `index`, returning the previous key.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    #[inline]
    pub fn replace_key(&mut self, index: usize, key: T) -> T {
        assert!(index < self.keys.len(), "key index {} out of range", index);
        mem::replace(&mut self.keys[index], key)
    }

    /// Insert a key at `index`, shifting later keys right.
    ///
    /// # Panics
    /// Panics if `index > len()`.
    pub fn insert_key(&mut self, index: usize, key: T) {
        assert!(
            index <= self.keys.len(),
            "key insertion index {} out of range",
            index
        );
        self.keys.insert(index, key);
    }

    /// Remove and return the key at `index`, shifting later keys left.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn remove_key(&mut self, index: usize) -> T {
        assert!(index < self.keys.len(), "key index {} out of range", index);
        self.keys.remove(index)
    }

    // ========================================================================
    // Child primitives
    // ========================================================================

    /// Get the child at `index`.
    ///
    /// # Panics
    /// Panics on a leaf, or if `index >= child_count()`.
    #[inline]
    pub fn child(&self, index: usize) -> &BTreeNode<T> {
        let children = self.children_ref();
        assert!(index < children.len(), "child index {} out of range", index);
        &children[index]
    }

    /// Get the child at `index` mutably.
    ///
    /// # Panics
    /// Panics on a leaf, or if `index >= child_count()`.
    #[inline]
    pub fn child_mut(&mut self, index: usize) -> &mut BTreeNode<T> {
        let children = self.children_mut();
        assert!(index < children.len(), "child index {} out of range", index);
        &mut children[index]
    }

    /// Overwrite the child at `index`, dropping the previous subtree.
    ///
    /// # Panics
    /// Panics on a leaf, or if `index >= child_count()`.
    #[inline]
    pub fn set_child(&mut self, index: usize, child: Box<BTreeNode<T>>) {
        let children = self.children_mut();
        assert!(index < children.len(), "child index {} out of range", index);
        children[index] = child;
    }

    /// Insert a child at `index`, shifting later children right.
    ///
    /// # Panics
    /// Panics on a leaf, or if `index > child_count()`.
    pub fn insert_child(&mut self, index: usize, child: Box<BTreeNode<T>>) {
        let children = self.children_mut();
        assert!(
            index <= children.len(),
            "child insertion index {} out of range",
            index
        );
        children.insert(index, child);
    }

    /// Remove and return the child at `index`, shifting later children left.
    ///
    /// # Panics
    /// Panics on a leaf, or if `index >= child_count()`.
    pub fn remove_child(&mut self, index: usize) -> Box<BTreeNode<T>> {
        let children = self.children_mut();
        assert!(index < children.len(), "child index {} out of range", index);
        children.remove(index)
    }

    #[inline]
    fn children_ref(&self) -> &Vec<Box<BTreeNode<T>>> {
        match self.children {
            Some(ref children) => children,
            None => panic!("leaf nodes cannot have children"),
        }
    }

    #[inline]
    fn children_mut(&mut self) -> &mut Vec<Box<BTreeNode<T>>> {
        match self.children {
            Some(ref mut children) => children,
            None => panic!("leaf nodes cannot have children"),
        }
    }

    // ========================================================================
    // Search primitive
    // ========================================================================

    /// Lower bound: the first position whose key is `>= key` under `compare`,
    /// or `len()` if every key is smaller.
    ///
    /// Linear scan: a node holds at most `2t - 1` keys, so this is O(t).
    pub fn find_key_index(&self, key: &T, compare: &dyn Fn(&T, &T) -> Ordering) -> usize {
        let mut i = 0;
        while i < self.keys.len() && compare(key, &self.keys[i]) == Ordering::Greater {
            i += 1;
        }
        i
    }

    /// Whether this node itself contains `key` (children are not searched).
    pub fn has_key(&self, key: &T, compare: &dyn Fn(&T, &T) -> Ordering) -> bool {
        let i = self.find_key_index(key, compare);
        i < self.keys.len() && compare(key, &self.keys[i]) == Ordering::Equal
    }

    // ========================================================================
    // Split / merge primitives
    // ========================================================================

    /// Split this node at `mid`: the key at `mid` is removed and returned
    /// for promotion, and keys `mid + 1..` (with the matching children for
    /// internal nodes) move into a newly created right sibling.
    ///
    /// This is the only way the tree creates nodes after the first insert.
    ///
    /// # Panics
    /// Panics if `mid >= len()`.
    pub(crate) fn split_off(&mut self, mid: usize) -> (T, BTreeNode<T>) {
        assert!(mid < self.keys.len(), "split index {} out of range", mid);

        let right_keys = self.keys.split_off(mid + 1);
        let promoted = self.keys.remove(mid);
        let right_children = self
            .children
            .as_mut()
            .map(|children| children.split_off(mid + 1));

        let right = BTreeNode {
            keys: right_keys,
            children: right_children,
        };
        (promoted, right)
    }

    /// Absorb `right`, appending its keys and children after this node's.
    ///
    /// The caller has already demoted the separating parent key into this
    /// node, so afterwards the combined node is a valid merge result.
    ///
    /// # Panics
    /// Panics if the two nodes disagree on leafness.
    pub(crate) fn absorb(&mut self, right: BTreeNode<T>) {
        assert_eq!(
            self.is_leaf(),
            right.is_leaf(),
            "cannot merge a leaf with an internal node"
        );
        self.keys.extend(right.keys);
        if let (Some(children), Some(right_children)) = (self.children.as_mut(), right.children) {
            children.extend(right_children);
        }
    }

    // ========================================================================
    // Accounting
    // ========================================================================

    /// Estimated heap footprint of this node alone (not its subtree):
    /// the node header plus the allocated key and child-pointer capacity.
    pub fn memory_size(&self) -> usize {
        let mut total = mem::size_of::<Self>();
        total += self.keys.capacity() * mem::size_of::<T>();
        if let Some(ref children) = self.children {
            total += children.capacity() * mem::size_of::<Box<BTreeNode<T>>>();
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: &i32, b: &i32) -> Ordering {
        a.cmp(b)
    }

    #[test]
    fn test_new_leaf() {
        let node: BTreeNode<i32> = BTreeNode::new_leaf(5);
        assert!(node.is_leaf());
        assert!(node.is_empty());
        assert_eq!(node.len(), 0);
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_new_internal() {
        let node: BTreeNode<i32> = BTreeNode::new_internal(5);
        assert!(!node.is_leaf());
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_insert_and_remove_key() {
        let mut node = BTreeNode::new_leaf(5);
        node.insert_key(0, 20);
        node.insert_key(0, 10);
        node.insert_key(2, 30);

        assert_eq!(node.len(), 3);
        assert_eq!(*node.key(0), 10);
        assert_eq!(*node.key(1), 20);
        assert_eq!(*node.key(2), 30);

        assert_eq!(node.remove_key(1), 20);
        assert_eq!(node.len(), 2);
        assert_eq!(*node.key(1), 30);
    }

    #[test]
    fn test_replace_key() {
        let mut node = BTreeNode::new_leaf(3);
        node.insert_key(0, 7);
        assert_eq!(node.replace_key(0, 9), 7);
        assert_eq!(*node.key(0), 9);
    }

    #[test]
    #[should_panic(expected = "key insertion index")]
    fn test_insert_key_out_of_range_panics() {
        let mut node = BTreeNode::new_leaf(3);
        node.insert_key(1, 42);
    }

    #[test]
    #[should_panic(expected = "key index")]
    fn test_remove_key_out_of_range_panics() {
        let mut node: BTreeNode<i32> = BTreeNode::new_leaf(3);
        node.remove_key(0);
    }

    #[test]
    #[should_panic(expected = "leaf nodes cannot have children")]
    fn test_leaf_rejects_child_access() {
        let node: BTreeNode<i32> = BTreeNode::new_leaf(3);
        node.child(0);
    }

    #[test]
    fn test_insert_and_remove_child() {
        let mut node = BTreeNode::new_internal(3);
        node.insert_child(0, Box::new(BTreeNode::new_leaf(3)));
        let mut second = BTreeNode::new_leaf(3);
        second.insert_key(0, 99);
        node.insert_child(1, Box::new(second));

        assert_eq!(node.child_count(), 2);
        assert_eq!(*node.child(1).key(0), 99);

        let removed = node.remove_child(1);
        assert_eq!(*removed.key(0), 99);
        assert_eq!(node.child_count(), 1);
    }

    #[test]
    fn test_set_child_overwrites() {
        let mut node = BTreeNode::new_internal(3);
        node.insert_child(0, Box::new(BTreeNode::new_leaf(3)));

        let mut replacement = BTreeNode::new_leaf(3);
        replacement.insert_key(0, 7);
        node.set_child(0, Box::new(replacement));

        assert_eq!(node.child_count(), 1);
        assert_eq!(*node.child(0).key(0), 7);
    }

    #[test]
    fn test_find_key_index_lower_bound() {
        let mut node = BTreeNode::new_leaf(5);
        for key in [10, 20, 30] {
            node.insert_key(node.len(), key);
        }

        assert_eq!(node.find_key_index(&5, &cmp), 0);
        assert_eq!(node.find_key_index(&10, &cmp), 0);
        assert_eq!(node.find_key_index(&15, &cmp), 1);
        assert_eq!(node.find_key_index(&30, &cmp), 2);
        assert_eq!(node.find_key_index(&35, &cmp), 3);
    }

    #[test]
    fn test_has_key() {
        let mut node = BTreeNode::new_leaf(5);
        node.insert_key(0, 10);
        node.insert_key(1, 20);

        assert!(node.has_key(&10, &cmp));
        assert!(node.has_key(&20, &cmp));
        assert!(!node.has_key(&15, &cmp));
    }

    #[test]
    fn test_is_full_and_underflow() {
        let mut node = BTreeNode::new_leaf(3);
        assert!(node.is_underflow(1));
        assert!(!node.is_full(3));

        for key in [1, 2, 3] {
            node.insert_key(node.len(), key);
        }
        assert!(node.is_full(3));
        assert!(!node.is_underflow(1));
    }

    #[test]
    fn test_split_off_leaf() {
        let mut node = BTreeNode::new_leaf(5);
        for key in [1, 2, 3, 4, 5] {
            node.insert_key(node.len(), key);
        }

        // t = 3: split a full node of 5 keys at the middle (index 2)
        let (promoted, right) = node.split_off(2);
        assert_eq!(promoted, 3);
        assert_eq!(node.len(), 2);
        assert_eq!(right.len(), 2);
        assert_eq!(*node.key(1), 2);
        assert_eq!(*right.key(0), 4);
        assert!(right.is_leaf());
    }

    #[test]
    fn test_split_off_internal_moves_children() {
        let mut node = BTreeNode::new_internal(3);
        for key in [10, 20, 30] {
            node.insert_key(node.len(), key);
        }
        for tag in [1, 2, 3, 4] {
            let mut leaf = BTreeNode::new_leaf(3);
            leaf.insert_key(0, tag);
            node.insert_child(node.child_count(), Box::new(leaf));
        }

        let (promoted, right) = node.split_off(1);
        assert_eq!(promoted, 20);
        assert_eq!(node.len(), 1);
        assert_eq!(node.child_count(), 2);
        assert_eq!(right.len(), 1);
        assert_eq!(right.child_count(), 2);
        assert_eq!(*right.child(0).key(0), 3);
    }

    #[test]
    fn test_absorb() {
        let mut left = BTreeNode::new_leaf(5);
        left.insert_key(0, 1);
        left.insert_key(1, 2); // demoted separator already appended by caller
        let mut right = BTreeNode::new_leaf(5);
        right.insert_key(0, 3);
        right.insert_key(1, 4);

        left.absorb(right);
        assert_eq!(left.len(), 4);
        assert_eq!(*left.key(3), 4);
    }

    #[test]
    fn test_try_from_parts_validation() {
        let leaf_child: Box<BTreeNode<i32>> = Box::new(BTreeNode::new_leaf(3));

        assert_eq!(
            BTreeNode::try_from_parts(vec![1], Some(vec![leaf_child]), true, 3).unwrap_err(),
            Error::LeafWithChildren
        );
        assert_eq!(
            BTreeNode::<i32>::try_from_parts(vec![1], None, false, 3).unwrap_err(),
            Error::MissingChildren
        );
        assert_eq!(
            BTreeNode::<i32>::try_from_parts(vec![1, 2, 3, 4], None, true, 3).unwrap_err(),
            Error::KeyOverflow { len: 4, max: 3 }
        );
        assert_eq!(
            BTreeNode::try_from_parts(
                vec![1],
                Some(vec![Box::new(BTreeNode::new_leaf(3))]),
                false,
                3
            )
            .unwrap_err(),
            Error::ChildCountMismatch { keys: 1, children: 1 }
        );

        let ok = BTreeNode::<i32>::try_from_parts(vec![1, 2], None, true, 3).unwrap();
        assert_eq!(ok.len(), 2);
        assert!(ok.is_leaf());
    }

    #[test]
    fn test_memory_size_counts_capacity() {
        let leaf: BTreeNode<u64> = BTreeNode::new_leaf(5);
        let internal: BTreeNode<u64> = BTreeNode::new_internal(5);
        assert!(leaf.memory_size() >= mem::size_of::<BTreeNode<u64>>());
        assert!(internal.memory_size() > leaf.memory_size());
    }
}
