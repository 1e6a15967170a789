//! Error types for Ordex.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in Ordex.
///
/// Two families live here:
/// - **Construction errors** (`InvalidMinDegree`): raised when a tree is
///   built with illegal parameters. Not recoverable.
/// - **Invariant violations** (everything else): produced by node
///   construction validation and by [`BTree::validate`], and indicate a
///   defect in the tree logic rather than a normal runtime condition.
///
/// Absent keys are *not* errors: `search` returns `None` and `delete`
/// returns `false`.
///
/// [`BTree::validate`]: crate::BTree::validate
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The minimum degree passed to a tree constructor was below the floor.
    #[error("minimum degree must be at least 2, got {0}")]
    InvalidMinDegree(usize),

    /// A leaf node was constructed with a children array.
    #[error("leaf nodes cannot have children")]
    LeafWithChildren,

    /// An internal node was constructed without a children array.
    #[error("internal nodes must have children")]
    MissingChildren,

    /// A node holds more keys than its capacity allows.
    #[error("node holds {len} keys, capacity is {max}")]
    KeyOverflow { len: usize, max: usize },

    /// A non-root node holds fewer keys than the minimum occupancy.
    #[error("non-root node holds {len} keys, minimum is {min}")]
    KeyUnderflow { len: usize, min: usize },

    /// An internal node's children count does not match its key count.
    #[error("internal node holds {keys} keys but {children} children")]
    ChildCountMismatch { keys: usize, children: usize },

    /// Keys within a node (or across a separator) are out of order.
    #[error("keys out of order at position {0}")]
    UnsortedKeys(usize),

    /// A leaf was found at a different depth than the others.
    #[error("leaf found at depth {found}, expected depth {expected}")]
    UnevenLeafDepth { found: usize, expected: usize },

    /// The tree's recorded size disagrees with the stored key count.
    #[error("tree records {recorded} keys but stores {actual}")]
    SizeMismatch { recorded: usize, actual: usize },
}
