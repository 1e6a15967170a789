//! B-tree operations: search, insertion, deletion, range queries.

use std::cmp::Ordering;

use crate::common::config::{max_keys, min_keys, MIN_DEGREE_FLOOR};
use crate::common::{Error, Result};
use crate::index::btree::node::BTreeNode;

/// Injected key comparator (three-way).
///
/// Stored as a trait object so one tree type covers both the natural
/// ordering ([`BTree::new`]) and caller-supplied orderings
/// ([`BTree::with_comparator`]).
pub type KeyComparator<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// An in-memory B-tree of minimum degree `t`.
///
/// # Invariants
/// After every public operation completes:
/// - every node holds at most `2t - 1` keys;
/// - every non-root node holds at least `t - 1` keys;
/// - the root holds at least 1 key when the tree is non-empty;
/// - keys within a node are sorted ascending, and every separator key
///   bounds the keys of the children on either side of it;
/// - all leaves sit at the same depth.
///
/// [`BTree::validate`] walks the tree and reports the first violated
/// invariant; the test suites call it after every mutation.
///
/// # Duplicate keys
/// `insert` never pre-checks for an existing equal key: inserting a key
/// already present creates a second structural entry, and `len()` counts
/// both. Callers wanting update-in-place pre-check via [`BTree::search`]
/// (the [`DatabaseIndex`](crate::DatabaseIndex) layer does exactly that).
///
/// # Ownership
/// Every node is exclusively owned by its parent (`Box` per child, no
/// parent pointers), so a node is deallocated the instant it is unlinked
/// on a merge or root collapse.
///
/// # Usage
/// ```
/// use ordex::BTree;
///
/// let mut tree: BTree<i32> = BTree::new(2).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.search(&6), Some(&6));
/// assert_eq!(tree.search(&99), None);
/// assert_eq!(tree.range_query(&6, &12), vec![&6, &7, &10, &12]);
/// ```
pub struct BTree<T> {
    /// Exclusively owned root; `None` iff the tree is empty.
    root: Option<Box<BTreeNode<T>>>,

    /// Minimum degree `t` (immutable after construction).
    min_degree: usize,

    /// Cached capacity bound `2t - 1`.
    max_keys: usize,

    /// Cached occupancy floor `t - 1`.
    min_keys: usize,

    /// Total number of keys stored.
    size: usize,

    /// Number of levels (0 for an empty tree).
    height: usize,

    /// Three-way key comparator.
    compare: KeyComparator<T>,
}

impl<T: Ord + 'static> BTree<T> {
    /// Create an empty tree using the key type's natural ordering.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMinDegree`] if `min_degree < 2`.
    pub fn new(min_degree: usize) -> Result<Self> {
        Self::with_comparator(min_degree, T::cmp)
    }
}

impl<T> BTree<T> {
    /// Create an empty tree with an injected comparator.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMinDegree`] if `min_degree < 2`.
    pub fn with_comparator(
        min_degree: usize,
        compare: impl Fn(&T, &T) -> Ordering + 'static,
    ) -> Result<Self> {
        if min_degree < MIN_DEGREE_FLOOR {
            return Err(Error::InvalidMinDegree(min_degree));
        }
        Ok(Self {
            root: None,
            min_degree,
            max_keys: max_keys(min_degree),
            min_keys: min_keys(min_degree),
            size: 0,
            height: 0,
            compare: Box::new(compare),
        })
    }

    // ========================================================================
    // Public API: queries
    // ========================================================================

    /// Number of keys in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels (0 for an empty tree, 1 for a lone root leaf).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The minimum degree `t` this tree was built with.
    #[inline]
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Search for a key, returning the stored key if present.
    ///
    /// Read-only lower-bound descent from the root; never mutates the tree.
    /// O(t · log_t n) comparisons.
    pub fn search(&self, key: &T) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        loop {
            let i = node.find_key_index(key, &*self.compare);
            if i < node.len() && (self.compare)(key, node.key(i)) == Ordering::Equal {
                return Some(node.key(i));
            }
            if node.is_leaf() {
                return None;
            }
            node = node.child(i);
        }
    }

    /// Whether a key exists in the tree.
    pub fn contains(&self, key: &T) -> bool {
        self.search(key).is_some()
    }

    /// Remove all keys.
    ///
    /// Afterwards every query behaves as on a freshly constructed tree.
    pub fn clear(&mut self) {
        self.root = None;
        self.size = 0;
        self.height = 0;
    }

    // ========================================================================
    // Public API: insertion
    // ========================================================================

    /// Insert a key.
    ///
    /// Top-down pre-emptive splitting: any full child is split *before*
    /// descending into it, so the recursion always lands on a node with
    /// spare capacity and no second upward pass is needed. A full root is
    /// split first, growing the tree by one level.
    pub fn insert(&mut self, key: T) {
        match self.root.take() {
            None => {
                let mut root = Box::new(BTreeNode::new_leaf(self.max_keys));
                root.insert_key(0, key);
                self.root = Some(root);
                self.size = 1;
                self.height = 1;
            }
            Some(mut root) => {
                if root.is_full(self.max_keys) {
                    // Grow upward: a new empty root adopts the old root as
                    // its only child, then splits it.
                    let mut new_root = Box::new(BTreeNode::new_internal(self.max_keys));
                    new_root.insert_child(0, root);
                    self.split_child(&mut new_root, 0);
                    self.height += 1;
                    root = new_root;
                }
                self.insert_non_full(&mut root, key);
                self.root = Some(root);
                self.size += 1;
            }
        }
    }

    /// Insert into a subtree whose root is guaranteed non-full.
    fn insert_non_full(&self, node: &mut BTreeNode<T>, key: T) {
        let mut i = node.find_key_index(&key, &*self.compare);
        if node.is_leaf() {
            node.insert_key(i, key);
        } else {
            if node.child(i).is_full(self.max_keys) {
                self.split_child(node, i);
                // The promoted key now sits at `i`; descend to its right
                // if the new key is greater.
                if (self.compare)(&key, node.key(i)) == Ordering::Greater {
                    i += 1;
                }
            }
            self.insert_non_full(node.child_mut(i), key);
        }
    }

    /// Split the full child at `index`: it keeps the lower `t - 1` keys,
    /// the upper `t - 1` keys (and the matching children) move into a new
    /// right sibling, and the middle key is promoted into `parent` at
    /// `index`.
    fn split_child(&self, parent: &mut BTreeNode<T>, index: usize) {
        let (promoted, right) = parent.child_mut(index).split_off(self.min_keys);
        parent.insert_key(index, promoted);
        parent.insert_child(index + 1, Box::new(right));
    }

    // ========================================================================
    // Public API: deletion
    // ========================================================================

    /// Delete a key.
    ///
    /// Returns `false` (tree unchanged) if the key is absent. The descent
    /// guarantees, before entering any child, that the child holds more
    /// than `t - 1` keys, borrowing from or merging with a sibling first;
    /// a key found in an internal node is replaced by its predecessor or
    /// successor, or resolved by merging both minimum children.
    ///
    /// `T: Clone` because the predecessor/successor replacement copies one
    /// key before deleting it from the subtree.
    pub fn delete(&mut self, key: &T) -> bool
    where
        T: Clone,
    {
        let Some(mut root) = self.root.take() else {
            return false;
        };

        let deleted = self.delete_recursive(&mut root, key);
        if deleted {
            self.size -= 1;
        }

        // Root collapse: an emptied root is replaced by its only child,
        // or discarded entirely when the tree became empty.
        if root.is_empty() {
            if root.is_leaf() {
                self.height = 0;
            } else {
                self.root = Some(root.remove_child(0));
                self.height -= 1;
            }
        } else {
            self.root = Some(root);
        }

        deleted
    }

    fn delete_recursive(&self, node: &mut BTreeNode<T>, key: &T) -> bool
    where
        T: Clone,
    {
        let i = node.find_key_index(key, &*self.compare);
        let found = i < node.len() && (self.compare)(key, node.key(i)) == Ordering::Equal;

        if node.is_leaf() {
            if found {
                node.remove_key(i);
            }
            found
        } else if found {
            self.delete_from_internal(node, i)
        } else {
            self.delete_from_child(node, key, i)
        }
    }

    /// Delete the key at `i` of an internal node by rotating a replacement
    /// up from a child with spare keys, or merging both minimum children.
    fn delete_from_internal(&self, node: &mut BTreeNode<T>, i: usize) -> bool
    where
        T: Clone,
    {
        if node.child(i).len() > self.min_keys {
            // Replace with the predecessor (rightmost key of the left
            // subtree) and delete that from the left child.
            let predecessor = Self::rightmost_key(node.child(i)).clone();
            node.set_key(i, predecessor.clone());
            self.delete_recursive(node.child_mut(i), &predecessor)
        } else if node.child(i + 1).len() > self.min_keys {
            // Replace with the successor (leftmost key of the right
            // subtree) and delete that from the right child.
            let successor = Self::leftmost_key(node.child(i + 1)).clone();
            node.set_key(i, successor.clone());
            self.delete_recursive(node.child_mut(i + 1), &successor)
        } else {
            // Both children at minimum: merge them around the key, then
            // delete the key from the merged node.
            let key = node.key(i).clone();
            self.merge_children(node, i);
            self.delete_recursive(node.child_mut(i), &key)
        }
    }

    /// Descend into the child at `i`, first ensuring it has a spare key.
    fn delete_from_child(&self, node: &mut BTreeNode<T>, key: &T, i: usize) -> bool
    where
        T: Clone,
    {
        let i = if node.child(i).len() == self.min_keys {
            self.fill_child(node, i)
        } else {
            i
        };
        self.delete_recursive(node.child_mut(i), key)
    }

    /// Give the minimum-occupancy child at `i` a spare key by borrowing
    /// from an adjacent sibling or merging with one.
    ///
    /// Returns the child index holding the target subtree afterwards (a
    /// merge with the left sibling shifts it down by one).
    fn fill_child(&self, parent: &mut BTreeNode<T>, i: usize) -> usize {
        if i > 0 && parent.child(i - 1).len() > self.min_keys {
            self.borrow_from_left(parent, i);
            i
        } else if i < parent.len() && parent.child(i + 1).len() > self.min_keys {
            self.borrow_from_right(parent, i);
            i
        } else if i > 0 {
            self.merge_children(parent, i - 1);
            i - 1
        } else {
            self.merge_children(parent, i);
            i
        }
    }

    /// Rotate one key through the parent from the left sibling: the
    /// sibling's last key moves up into the parent, the separator moves
    /// down to the front of the deficient child, and (for internal
    /// siblings) the sibling's last child comes along. O(1), no node
    /// created or destroyed.
    fn borrow_from_left(&self, parent: &mut BTreeNode<T>, i: usize) {
        let separator = i - 1;
        let (moved_key, moved_child) = {
            let left = parent.child_mut(separator);
            let key = left.remove_key(left.len() - 1);
            let child = if left.is_leaf() {
                None
            } else {
                Some(left.remove_child(left.child_count() - 1))
            };
            (key, child)
        };

        let demoted = parent.replace_key(separator, moved_key);
        let child = parent.child_mut(i);
        child.insert_key(0, demoted);
        if let Some(grandchild) = moved_child {
            child.insert_child(0, grandchild);
        }
    }

    /// Mirror of [`Self::borrow_from_left`] for the right sibling.
    fn borrow_from_right(&self, parent: &mut BTreeNode<T>, i: usize) {
        let (moved_key, moved_child) = {
            let right = parent.child_mut(i + 1);
            let key = right.remove_key(0);
            let child = if right.is_leaf() {
                None
            } else {
                Some(right.remove_child(0))
            };
            (key, child)
        };

        let demoted = parent.replace_key(i, moved_key);
        let child = parent.child_mut(i);
        child.insert_key(child.len(), demoted);
        if let Some(grandchild) = moved_child {
            child.insert_child(child.child_count(), grandchild);
        }
    }

    /// Merge the children around the separator key at `separator`: the key
    /// is demoted into the left child, the right child's keys and children
    /// are appended after it, and the right child is destroyed.
    fn merge_children(&self, parent: &mut BTreeNode<T>, separator: usize) {
        let demoted = parent.remove_key(separator);
        let right = parent.remove_child(separator + 1);
        let left = parent.child_mut(separator);
        left.insert_key(left.len(), demoted);
        left.absorb(*right);
    }

    /// Rightmost key of a subtree (the predecessor position).
    fn rightmost_key(node: &BTreeNode<T>) -> &T {
        let mut node = node;
        while !node.is_leaf() {
            node = node.child(node.len());
        }
        node.key(node.len() - 1)
    }

    /// Leftmost key of a subtree (the successor position).
    fn leftmost_key(node: &BTreeNode<T>) -> &T {
        let mut node = node;
        while !node.is_leaf() {
            node = node.child(0);
        }
        node.key(0)
    }

    // ========================================================================
    // Public API: range queries
    // ========================================================================

    /// All keys in `[start, end]` (inclusive both ends), ascending.
    ///
    /// Inorder walk that skips children whose key range cannot intersect
    /// the bounds and stops outright once a key greater than `end` has
    /// been seen. An inverted range (`start > end`) yields nothing.
    pub fn range_query(&self, start: &T, end: &T) -> Vec<&T> {
        let mut out = Vec::new();
        if let Some(root) = self.root.as_deref() {
            self.range_collect(root, start, end, &mut out);
        }
        out
    }

    /// Collect in-range keys of a subtree; returns `false` once a key past
    /// `end` has been seen, so ancestors stop descending.
    fn range_collect<'a>(
        &self,
        node: &'a BTreeNode<T>,
        start: &T,
        end: &T,
        out: &mut Vec<&'a T>,
    ) -> bool {
        // Children strictly below `start` are pruned by starting at the
        // lower bound.
        let mut i = node.find_key_index(start, &*self.compare);

        if node.is_leaf() {
            while i < node.len() {
                if (self.compare)(node.key(i), end) == Ordering::Greater {
                    return false;
                }
                out.push(node.key(i));
                i += 1;
            }
            return true;
        }

        while i < node.len() {
            if !self.range_collect(node.child(i), start, end, out) {
                return false;
            }
            if (self.compare)(node.key(i), end) == Ordering::Greater {
                return false;
            }
            if (self.compare)(node.key(i), start) != Ordering::Less {
                out.push(node.key(i));
            }
            i += 1;
        }
        self.range_collect(node.child(i), start, end, out)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Walk the whole tree and report the first violated invariant.
    ///
    /// Intended for tests and debugging; the public operations maintain
    /// the invariants without ever calling this.
    ///
    /// # Errors
    /// The invariant-violation variants of [`Error`]: occupancy bounds,
    /// child counts, key ordering (non-decreasing, since duplicate inserts
    /// are permitted), uneven leaf depth, and a `size`/key-count mismatch.
    pub fn validate(&self) -> Result<()> {
        let Some(root) = self.root.as_deref() else {
            return if self.size == 0 {
                Ok(())
            } else {
                Err(Error::SizeMismatch {
                    recorded: self.size,
                    actual: 0,
                })
            };
        };

        if root.is_empty() {
            return Err(Error::KeyUnderflow { len: 0, min: 1 });
        }

        let mut counted = 0;
        let mut leaf_depth = None;
        self.validate_node(root, None, None, 1, true, &mut leaf_depth, &mut counted)?;

        if counted != self.size {
            return Err(Error::SizeMismatch {
                recorded: self.size,
                actual: counted,
            });
        }
        if let Some(depth) = leaf_depth {
            if depth != self.height {
                return Err(Error::UnevenLeafDepth {
                    found: depth,
                    expected: self.height,
                });
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn validate_node(
        &self,
        node: &BTreeNode<T>,
        lower: Option<&T>,
        upper: Option<&T>,
        depth: usize,
        is_root: bool,
        leaf_depth: &mut Option<usize>,
        counted: &mut usize,
    ) -> Result<()> {
        if node.len() > self.max_keys {
            return Err(Error::KeyOverflow {
                len: node.len(),
                max: self.max_keys,
            });
        }
        if !is_root && node.is_underflow(self.min_keys) {
            return Err(Error::KeyUnderflow {
                len: node.len(),
                min: self.min_keys,
            });
        }

        for i in 0..node.len() {
            if i > 0 && (self.compare)(node.key(i - 1), node.key(i)) == Ordering::Greater {
                return Err(Error::UnsortedKeys(i));
            }
            if let Some(lower) = lower {
                if (self.compare)(lower, node.key(i)) == Ordering::Greater {
                    return Err(Error::UnsortedKeys(i));
                }
            }
            if let Some(upper) = upper {
                if (self.compare)(node.key(i), upper) == Ordering::Greater {
                    return Err(Error::UnsortedKeys(i));
                }
            }
        }
        *counted += node.len();

        if node.is_leaf() {
            match *leaf_depth {
                None => *leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(Error::UnevenLeafDepth {
                        found: depth,
                        expected,
                    });
                }
                Some(_) => {}
            }
            return Ok(());
        }

        if node.child_count() != node.len() + 1 {
            return Err(Error::ChildCountMismatch {
                keys: node.len(),
                children: node.child_count(),
            });
        }
        for i in 0..node.child_count() {
            let child_lower = if i == 0 { lower } else { Some(node.key(i - 1)) };
            let child_upper = if i == node.len() {
                upper
            } else {
                Some(node.key(i))
            };
            self.validate_node(
                node.child(i),
                child_lower,
                child_upper,
                depth + 1,
                false,
                leaf_depth,
                counted,
            )?;
        }
        Ok(())
    }

    // ========================================================================
    // Internal: shared with the iterator and stats modules
    // ========================================================================

    /// Root node, if any.
    pub(crate) fn root_node(&self) -> Option<&BTreeNode<T>> {
        self.root.as_deref()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for BTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BTree")
            .field("min_degree", &self.min_degree)
            .field("size", &self.size)
            .field("height", &self.height)
            .field("keys", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
