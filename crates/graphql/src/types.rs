//! GraphQL type definitions.

use std::sync::Arc;

use async_graphql::{EmptyMutation, EmptySubscription, Schema, SimpleObject, ID};

use folio_core::codec::encode_global_id;
use folio_core::models::Record as RecordModel;
use folio_core::ports::{CollectionSummary, DataSource};

use crate::schema::Query;

/// The Folio GraphQL schema type.
pub type FolioSchema = Schema<Query, EmptyMutation, EmptySubscription>;

/// Data source shared by all resolvers.
pub type SharedSource = Arc<dyn DataSource<RecordModel>>;

// -----------------------------------------------------------------------------
// Object Types
// -----------------------------------------------------------------------------

/// A record stored in a keyed collection.
#[derive(SimpleObject)]
pub struct Record {
    /// Globally unique ID, usable with `node(id:)`.
    pub id: ID,
    /// Collection the record belongs to.
    pub kind: String,
    /// Key of the record within its collection.
    pub key: i64,
    /// Remaining fields of the record.
    pub fields: serde_json::Value,
}

impl From<RecordModel> for Record {
    fn from(r: RecordModel) -> Self {
        Self {
            id: ID(encode_global_id(&r.kind, &r.id.to_string())),
            kind: r.kind,
            key: r.id,
            fields: serde_json::Value::Object(r.fields),
        }
    }
}

/// Name and size of a collection.
#[derive(SimpleObject)]
pub struct Collection {
    pub name: String,
    pub size: i64,
}

impl From<CollectionSummary> for Collection {
    fn from(c: CollectionSummary) -> Self {
        Self {
            name: c.name,
            size: c.size as i64,
        }
    }
}

// -----------------------------------------------------------------------------
// Connection Types (Relay-style pagination)
// -----------------------------------------------------------------------------

#[derive(SimpleObject)]
pub struct PageInfo {
    /// When paginating forwards, are there more items?
    pub has_next_page: bool,
    /// When paginating backwards, are there more items?
    pub has_previous_page: bool,
    /// When paginating backwards, the cursor to continue.
    pub start_cursor: Option<String>,
    /// When paginating forwards, the cursor to continue.
    pub end_cursor: Option<String>,
}

impl From<folio_core::ports::PageInfo> for PageInfo {
    fn from(p: folio_core::ports::PageInfo) -> Self {
        Self {
            has_next_page: p.has_next_page,
            has_previous_page: p.has_previous_page,
            start_cursor: p.start_cursor.map(String::from),
            end_cursor: p.end_cursor.map(String::from),
        }
    }
}

/// Generate Relay-style connection types (Edge + Connection) with From impl.
macro_rules! define_connection {
    ($node:ty, $core_model:ty, $edge:ident, $connection:ident) => {
        #[derive(SimpleObject)]
        pub struct $edge {
            /// The item at the end of the edge.
            pub node: $node,
            /// A cursor for use in pagination.
            pub cursor: String,
        }

        #[derive(SimpleObject)]
        pub struct $connection {
            pub edges: Vec<$edge>,
            pub page_info: PageInfo,
            pub total_count: Option<i64>,
        }

        impl From<folio_core::ports::Connection<$core_model>> for $connection {
            fn from(conn: folio_core::ports::Connection<$core_model>) -> Self {
                Self {
                    edges: conn
                        .edges
                        .into_iter()
                        .map(|e| $edge {
                            node: <$node>::from(e.node),
                            cursor: e.cursor.value,
                        })
                        .collect(),
                    page_info: PageInfo::from(conn.page_info),
                    total_count: conn.total_count,
                }
            }
        }
    };
}

define_connection!(Record, RecordModel, RecordEdge, RecordConnection);
