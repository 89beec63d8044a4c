//! GraphQL API for Folio.
//!
//! Serves keyed collections as Relay-style connections.
//!
//! # Building and serving a schema
//!
//! ```ignore
//! use std::sync::Arc;
//! use folio_graphql::{build_schema, serve_with_shutdown, ServerConfig};
//! use folio_memory::RecordSource;
//!
//! let source = RecordSource::for_records();
//! source.extend(records)?;
//!
//! let schema = build_schema(Arc::new(source));
//! serve_with_shutdown(schema, ServerConfig::default(), shutdown).await?;
//! ```

mod schema;
mod server;
mod types;

pub use schema::{build_schema, Query, MAX_PAGE_SIZE, MAX_QUERY_COMPLEXITY, MAX_QUERY_DEPTH};
pub use server::{router, serve_with_shutdown, ServerConfig};
pub use types::{
    Collection, FolioSchema, PageInfo, Record, RecordConnection, RecordEdge, SharedSource,
};
