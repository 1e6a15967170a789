//! Index layer - ordered index structures and the layers built on them.
//!
//! - [`btree`] - The B-tree engine (nodes, tree operations, iteration, stats)
//! - [`DatabaseIndex`] - A key → payload index built on the tree's public API

pub mod btree;
mod database;

pub use database::DatabaseIndex;
