//! Port trait for paginated node lookup.
//!
//! The schema layer talks to collections only through this trait.
//! Implementations live in adapter crates (e.g., `folio-memory`).

use serde::Serialize;

use crate::error::DataSourceResult;

use super::pagination::{Connection, ConnectionArgs};

/// Name and size of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub name: String,
    pub size: usize,
}

/// Source of nodes grouped into named, key-ordered collections.
pub trait DataSource<T>: Send + Sync {
    /// Fetch one node by collection name and local id.
    ///
    /// An id that does not parse as the collection's key is simply not
    /// found. Unknown collections are an error.
    fn fetch_node(&self, kind: &str, id: &str) -> DataSourceResult<Option<T>>;

    /// Resolve a page of a collection.
    fn connection(&self, kind: &str, args: &ConnectionArgs) -> DataSourceResult<Connection<T>>;

    /// List registered collections in name order.
    fn collections(&self) -> DataSourceResult<Vec<CollectionSummary>>;
}
