//! In-memory data source over named sorted collections.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use folio_core::codec::CursorKey;
use folio_core::error::{DataSourceError, DataSourceResult};
use folio_core::index::{IndexConfig, SortedIndex};
use folio_core::models::{record_key, Record};
use folio_core::ports::{CollectionSummary, Connection, ConnectionArgs, DataSource};
use folio_core::services::resolve_connection;

type Collections<T, K> = BTreeMap<String, SortedIndex<T, K>>;

/// Collections of items grouped by kind and ordered by key.
///
/// All collections sit behind one `RwLock`: writers (`add`, `extend`,
/// `remove`, `register`) are serialized, and every read holds the read lock
/// for its whole duration, so a connection is always resolved against a
/// single consistent state. Nodes are cloned out before the lock is
/// released.
pub struct MemoryDataSource<T, K> {
    kind_of: fn(&T) -> &str,
    extract: fn(&T) -> K,
    collections: RwLock<Collections<T, K>>,
}

/// Data source for generic [`Record`]s keyed by their integer id.
pub type RecordSource = MemoryDataSource<Record, i64>;

/// Collection name of a record.
pub fn record_kind(record: &Record) -> &str {
    &record.kind
}

impl RecordSource {
    /// Empty source routing records by `kind` and keying them by `id`.
    pub fn for_records() -> Self {
        Self::new(record_kind, record_key)
    }
}

impl<T, K: CursorKey> MemoryDataSource<T, K> {
    /// Create an empty data source.
    ///
    /// `kind_of` routes an item to its collection; `extract` is the key
    /// extractor used for collections created on first insert.
    pub fn new(kind_of: fn(&T) -> &str, extract: fn(&T) -> K) -> Self {
        Self {
            kind_of,
            extract,
            collections: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a collection with an explicit configuration.
    ///
    /// Returns `false` and leaves the existing collection alone if the name
    /// is already taken.
    pub fn register(&self, config: IndexConfig<T, K>) -> DataSourceResult<bool> {
        let mut collections = self.write()?;
        match collections.entry(config.name.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                info!(collection = %config.name, "📚 Registering collection");
                entry.insert(SortedIndex::new(config));
                Ok(true)
            }
        }
    }

    /// Add one item to its collection, creating the collection if needed.
    pub fn add(&self, item: T) -> DataSourceResult<()> {
        let mut collections = self.write()?;
        self.insert_locked(&mut collections, item)
    }

    /// Add many items under a single write lock.
    ///
    /// Stops at the first failing item; items added before it stay added.
    pub fn extend<I>(&self, items: I) -> DataSourceResult<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let mut collections = self.write()?;
        let mut added = 0;
        for item in items {
            self.insert_locked(&mut collections, item)?;
            added += 1;
        }
        debug!(added, "Items added");
        Ok(added)
    }

    /// Number of items in a collection.
    pub fn len(&self, kind: &str) -> DataSourceResult<usize> {
        let collections = self.read()?;
        collections
            .get(kind)
            .map(SortedIndex::len)
            .ok_or_else(|| DataSourceError::UnknownCollection(kind.to_owned()))
    }

    fn insert_locked(&self, collections: &mut Collections<T, K>, item: T) -> DataSourceResult<()> {
        let kind = (self.kind_of)(&item).to_owned();
        let index = match collections.entry(kind) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                info!(collection = %entry.key(), "📚 Creating collection");
                let config = IndexConfig::new(entry.key().clone(), self.extract);
                entry.insert(SortedIndex::new(config))
            }
        };
        index.insert(item)?;
        Ok(())
    }

    fn read(&self) -> DataSourceResult<RwLockReadGuard<'_, Collections<T, K>>> {
        self.collections
            .read()
            .map_err(|e| DataSourceError::Poisoned(e.to_string()))
    }

    fn write(&self) -> DataSourceResult<RwLockWriteGuard<'_, Collections<T, K>>> {
        self.collections
            .write()
            .map_err(|e| DataSourceError::Poisoned(e.to_string()))
    }
}

impl<T: PartialEq, K: CursorKey> MemoryDataSource<T, K> {
    /// Remove an item from its collection and return the stored copy.
    pub fn remove(&self, item: &T) -> DataSourceResult<T> {
        let mut collections = self.write()?;
        let kind = (self.kind_of)(item);
        let index = collections
            .get_mut(kind)
            .ok_or_else(|| DataSourceError::UnknownCollection(kind.to_owned()))?;
        Ok(index.remove(item)?)
    }
}

impl<T, K> DataSource<T> for MemoryDataSource<T, K>
where
    T: Clone + Send + Sync,
    K: CursorKey + Send + Sync,
{
    fn fetch_node(&self, kind: &str, id: &str) -> DataSourceResult<Option<T>> {
        let collections = self.read()?;
        let index = collections
            .get(kind)
            .ok_or_else(|| DataSourceError::UnknownCollection(kind.to_owned()))?;

        let Some(key) = K::from_cursor_str(id) else {
            debug!(collection = kind, "Node id does not parse as a key");
            return Ok(None);
        };

        Ok(index.find(&key).cloned())
    }

    fn connection(&self, kind: &str, args: &ConnectionArgs) -> DataSourceResult<Connection<T>> {
        let collections = self.read()?;
        let index = collections
            .get(kind)
            .ok_or_else(|| DataSourceError::UnknownCollection(kind.to_owned()))?;

        Ok(resolve_connection(index, args)?.cloned())
    }

    fn collections(&self) -> DataSourceResult<Vec<CollectionSummary>> {
        let collections = self.read()?;
        Ok(collections
            .iter()
            .map(|(name, index)| CollectionSummary {
                name: name.clone(),
                size: index.len(),
            })
            .collect())
    }
}

impl<T, K: CursorKey> fmt::Debug for MemoryDataSource<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("MemoryDataSource");
        match self.collections.try_read() {
            Ok(collections) => {
                let sizes: BTreeMap<&str, usize> = collections
                    .iter()
                    .map(|(name, index)| (name.as_str(), index.len()))
                    .collect();
                out.field("collections", &sizes);
            }
            Err(_) => {
                out.field("collections", &"<locked>");
            }
        }
        out.finish()
    }
}
