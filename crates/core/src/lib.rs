//! Core domain layer for Folio.
//!
//! This crate contains the pagination core: a sorted index over keyed items,
//! the cursor codec and the connection resolver, plus the port traits that
//! adapters implement. It has no dependencies on storage or transport.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      folio (binary)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │        folio-graphql        │         folio-memory          │
//! │     (API, HTTP server)      │   (in-memory data source)     │
//! ├─────────────────────────────┴───────────────────────────────┤
//! │                      folio-core  ← YOU ARE HERE             │
//! │          (codec, index, resolver, models, ports)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`codec`] - Cursor and global ID encodings
//! - [`index`] - [`index::SortedIndex`], items ordered by an extracted key
//! - [`services`] - Connection resolution over a sorted index
//! - [`models`] - Generic records and dataset parsing
//! - [`ports`] - Pagination types and the data source trait
//! - [`error`] - Domain error types
//! - [`metrics`] - Metrics definitions
//!
//! # Example
//!
//! ```
//! use folio_core::index::{IndexConfig, SortedIndex};
//! use folio_core::ports::ConnectionArgs;
//! use folio_core::services::resolve_connection;
//!
//! fn id(n: &i64) -> i64 {
//!     *n
//! }
//!
//! let mut index = SortedIndex::new(IndexConfig::new("Number", id));
//! for n in [3, 1, 2] {
//!     index.insert(n).unwrap();
//! }
//!
//! let page = resolve_connection(&index, &ConnectionArgs::default().first(2)).unwrap();
//! assert_eq!(page.nodes().copied().copied().collect::<Vec<_>>(), [1, 2]);
//! assert!(page.page_info.has_next_page);
//! ```

pub mod codec;
pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;
