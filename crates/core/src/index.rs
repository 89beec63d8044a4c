//! Key-ordered item storage with boundary search.
//!
//! [`SortedIndex`] keeps two parallel vectors, `keys` (strictly ascending)
//! and `items` (same order), so lookups are binary searches over keys only.
//! Finding is O(log n); insertion and removal shift the tail and are O(n).
//! The index is meant for read-mostly, bulk-loaded collections.

use std::fmt;

use tracing::trace;

use crate::codec::{CursorCodec, CursorKey};
use crate::error::{IndexError, IndexResult};

// =============================================================================
// Configuration
// =============================================================================

/// Static description of one collection.
pub struct IndexConfig<T, K> {
    /// Collection name, used in errors, logs and metrics.
    pub name: String,
    /// Pure key extractor. Must return the same key for an item for as long
    /// as the item is stored.
    pub extract: fn(&T) -> K,
    /// Codec for this collection's cursors.
    pub codec: CursorCodec,
}

impl<T, K> IndexConfig<T, K> {
    /// Config whose cursor prefix is `"{name}:"`.
    pub fn new(name: impl Into<String>, extract: fn(&T) -> K) -> Self {
        let name = name.into();
        let codec = CursorCodec::new(format!("{}:", name));
        Self {
            name,
            extract,
            codec,
        }
    }

    pub fn with_codec(mut self, codec: CursorCodec) -> Self {
        self.codec = codec;
        self
    }
}

// =============================================================================
// SortedIndex
// =============================================================================

/// Items ordered by a unique, totally ordered extracted key.
///
/// Invariant: `keys[i] < keys[i + 1]` and `extract(&items[i]) == keys[i]`.
#[derive(Clone)]
pub struct SortedIndex<T, K> {
    name: String,
    extract: fn(&T) -> K,
    codec: CursorCodec,
    keys: Vec<K>,
    items: Vec<T>,
}

impl<T, K: CursorKey> SortedIndex<T, K> {
    /// Create an empty index.
    pub fn new(config: IndexConfig<T, K>) -> Self {
        Self {
            name: config.name,
            extract: config.extract,
            codec: config.codec,
            keys: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &CursorCodec {
        &self.codec
    }

    /// Extract the key of `item` with this index's extractor.
    pub fn key_of(&self, item: &T) -> K {
        (self.extract)(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stored keys in ascending order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }

    /// Ascending iteration; `.rev()` for descending.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Items in `[begin, end)`, both bounds clamped to `[0, len]`.
    pub fn slice(&self, begin: usize, end: usize) -> &[T] {
        let end = end.min(self.items.len());
        let begin = begin.min(end);
        &self.items[begin..end]
    }

    /// First position whose key is `>= key`.
    pub fn bisect_left(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    /// First position whose key is `> key`.
    pub fn bisect_right(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }

    /// Insert an item at its key position.
    ///
    /// Fails without touching the index if the key is already present or
    /// cannot be carried by this collection's cursors.
    pub fn insert(&mut self, item: T) -> IndexResult<()> {
        let key = self.key_of(&item);

        if !self.codec.fits(&key) {
            return Err(IndexError::KeyTooLong {
                key: key.to_cursor_string(),
                max: self.codec.max_key_len(),
            });
        }

        let position = self.bisect_left(&key);
        if self.keys.get(position) == Some(&key) {
            return Err(IndexError::DuplicateKey {
                collection: self.name.clone(),
                key: key.to_cursor_string(),
            });
        }

        trace!(collection = %self.name, position, "Inserting item");
        self.keys.insert(position, key);
        self.items.insert(position, item);
        Ok(())
    }

    /// Item stored under exactly `key`.
    pub fn find(&self, key: &K) -> Option<&T> {
        let position = self.bisect_left(key);
        match self.keys.get(position) {
            Some(k) if k == key => self.items.get(position),
            _ => None,
        }
    }

    /// Item with the largest key `< key`.
    pub fn find_lt(&self, key: &K) -> Option<&T> {
        self.bisect_left(key)
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
    }

    /// Item with the largest key `<= key`.
    pub fn find_le(&self, key: &K) -> Option<&T> {
        self.bisect_right(key)
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
    }

    /// Item with the smallest key `> key`.
    pub fn find_gt(&self, key: &K) -> Option<&T> {
        self.items.get(self.bisect_right(key))
    }

    /// Item with the smallest key `>= key`.
    pub fn find_ge(&self, key: &K) -> Option<&T> {
        self.items.get(self.bisect_left(key))
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.items.clear();
    }
}

impl<T: PartialEq, K: CursorKey> SortedIndex<T, K> {
    /// Position of `item`, matched by key and then by equality.
    ///
    /// Keys are unique, so the equal-key run has at most one entry; the scan
    /// still checks item equality in case the extractor is not injective.
    pub fn position(&self, item: &T) -> Option<usize> {
        let key = self.key_of(item);
        let begin = self.bisect_left(&key);
        let end = self.bisect_right(&key);
        self.items[begin..end]
            .iter()
            .position(|candidate| candidate == item)
            .map(|offset| begin + offset)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }

    /// Number of stored items equal to `item` (0 or 1).
    pub fn count(&self, item: &T) -> usize {
        let key = self.key_of(item);
        let begin = self.bisect_left(&key);
        let end = self.bisect_right(&key);
        self.items[begin..end]
            .iter()
            .filter(|candidate| *candidate == item)
            .count()
    }

    /// Remove `item` and return the stored copy.
    pub fn remove(&mut self, item: &T) -> IndexResult<T> {
        let Some(position) = self.position(item) else {
            return Err(IndexError::NotFound {
                collection: self.name.clone(),
                key: self.key_of(item).to_cursor_string(),
            });
        };

        trace!(collection = %self.name, position, "Removing item");
        self.keys.remove(position);
        Ok(self.items.remove(position))
    }
}

impl<'a, T, K> IntoIterator for &'a SortedIndex<T, K> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: fmt::Debug, K> fmt::Debug for SortedIndex<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedIndex")
            .field("name", &self.name)
            .field("items", &self.items)
            .finish()
    }
}
