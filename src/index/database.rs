//! A key → payload index built on the B-tree's public operations.

use std::cmp::Ordering;

use crate::common::Result;
use crate::index::btree::BTree;

/// One stored record: a key plus its payload.
///
/// Lookups and deletions probe the tree with an entry that carries no
/// payload (`value: None`); the comparator only ever examines keys, so a
/// probe matches any stored entry with the same key.
#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: Option<V>,
}

impl<K, V> Entry<K, V> {
    fn stored(key: K, value: V) -> Self {
        Self {
            key,
            value: Some(value),
        }
    }

    fn probe(key: K) -> Self {
        Self { key, value: None }
    }
}

/// An ordered index mapping keys to opaque payloads.
///
/// This is the application layer over [`BTree`]: field value → record
/// identifier, term → posting, and similar ordered key → value mappings.
/// It uses only the tree's public operations.
///
/// Unlike the raw tree, `insert` here is an **upsert**: it pre-checks via
/// search and replaces any existing entry, so each key maps to exactly
/// one payload.
///
/// # Usage
/// ```
/// use ordex::DatabaseIndex;
///
/// let mut index: DatabaseIndex<String, u64> = DatabaseIndex::new(3).unwrap();
/// index.insert("alice".to_string(), 17);
/// index.insert("bob".to_string(), 42);
///
/// assert_eq!(index.get(&"bob".to_string()), Some(&42));
/// assert!(index.delete(&"alice".to_string()));
/// assert_eq!(index.len(), 1);
/// ```
pub struct DatabaseIndex<K, V> {
    tree: BTree<Entry<K, V>>,
}

impl<K, V> DatabaseIndex<K, V>
where
    K: Ord + Clone + 'static,
    V: Clone + 'static,
{
    /// Create an empty index over a tree of the given minimum degree.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMinDegree`](crate::Error::InvalidMinDegree)
    /// if `min_degree < 2`.
    pub fn new(min_degree: usize) -> Result<Self> {
        let tree = BTree::with_comparator(min_degree, |a: &Entry<K, V>, b: &Entry<K, V>| {
            a.key.cmp(&b.key)
        })?;
        Ok(Self { tree })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Insert or replace the payload for `key`.
    pub fn insert(&mut self, key: K, value: V) {
        // Pre-check so an existing key is updated rather than duplicated.
        let probe = Entry::probe(key.clone());
        if self.tree.contains(&probe) {
            self.tree.delete(&probe);
        }
        self.tree.insert(Entry::stored(key, value));
    }

    /// Payload stored for `key`, if any.
    pub fn get(&self, key: &K) -> Option<&V> {
        let probe = Entry::probe(key.clone());
        self.tree.search(&probe).and_then(|entry| entry.value.as_ref())
    }

    /// Whether `key` has an entry.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove the entry for `key`; returns `false` if it was absent.
    pub fn delete(&mut self, key: &K) -> bool {
        self.tree.delete(&Entry::probe(key.clone()))
    }

    /// All entries with keys in `[start, end]`, ascending by key.
    pub fn range_query(&self, start: &K, end: &K) -> Vec<(&K, &V)> {
        let start = Entry::probe(start.clone());
        let end = Entry::probe(end.clone());
        self.tree
            .range_query(&start, &end)
            .into_iter()
            .filter_map(|entry| Some((&entry.key, entry.value.as_ref()?)))
            .collect()
    }

    /// All entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.tree
            .iter()
            .filter_map(|entry| Some((&entry.key, entry.value.as_ref()?)))
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DatabaseIndex<u32, &'static str> {
        let mut index = DatabaseIndex::new(2).unwrap();
        index.insert(3, "carol");
        index.insert(1, "alice");
        index.insert(2, "bob");
        index
    }

    #[test]
    fn test_insert_and_get() {
        let index = sample();
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(&1), Some(&"alice"));
        assert_eq!(index.get(&2), Some(&"bob"));
        assert_eq!(index.get(&3), Some(&"carol"));
        assert_eq!(index.get(&4), None);
    }

    #[test]
    fn test_insert_is_upsert() {
        let mut index = sample();
        index.insert(2, "robert");

        assert_eq!(index.len(), 3);
        assert_eq!(index.get(&2), Some(&"robert"));
    }

    #[test]
    fn test_delete() {
        let mut index = sample();
        assert!(index.delete(&2));
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(&2), None);
        assert!(!index.contains_key(&2));

        assert!(!index.delete(&2));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_range_query_pairs() {
        let mut index: DatabaseIndex<u32, u32> = DatabaseIndex::new(2).unwrap();
        for key in 0..20 {
            index.insert(key, key * 10);
        }

        let got: Vec<(u32, u32)> = index
            .range_query(&5, &8)
            .into_iter()
            .map(|(k, v)| (*k, *v))
            .collect();
        assert_eq!(got, vec![(5, 50), (6, 60), (7, 70), (8, 80)]);
    }

    #[test]
    fn test_iter_ascending_by_key() {
        let index = sample();
        let keys: Vec<u32> = index.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 2, 3]);
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut index = sample();
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.get(&1), None);

        index.insert(9, "dave");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&9), Some(&"dave"));
    }

    #[test]
    fn test_large_index_round_trip() {
        let mut index: DatabaseIndex<u32, String> =
            DatabaseIndex::new(crate::common::config::DEFAULT_MIN_DEGREE).unwrap();
        for key in 0..200 {
            index.insert(key, format!("record-{key}"));
        }
        assert_eq!(index.len(), 200);
        for key in 0..200 {
            assert_eq!(index.get(&key), Some(&format!("record-{key}")));
        }
    }
}
