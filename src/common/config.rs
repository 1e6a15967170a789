//! Configuration constants for Ordex.

/// Smallest legal minimum degree for a B-tree.
///
/// With `t = 2` every node holds 1..=3 keys (a 2-3-4 tree), which is the
/// smallest shape that still exercises splitting, borrowing, and merging.
/// Anything below cannot satisfy the occupancy invariants.
pub const MIN_DEGREE_FLOOR: usize = 2;

/// Default minimum degree used when the caller has no preference.
pub const DEFAULT_MIN_DEGREE: usize = 3;

/// Maximum keys a node may hold for a given minimum degree: `2t - 1`.
#[inline]
pub const fn max_keys(min_degree: usize) -> usize {
    2 * min_degree - 1
}

/// Minimum keys a non-root node must hold for a given minimum degree: `t - 1`.
#[inline]
pub const fn min_keys(min_degree: usize) -> usize {
    min_degree - 1
}
