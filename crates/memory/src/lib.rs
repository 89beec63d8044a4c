//! In-memory storage layer for Folio.
//!
//! This crate provides the in-memory implementation of the
//! [`DataSource`](folio_core::ports::DataSource) trait defined in
//! `folio-core`. Each collection is a
//! [`SortedIndex`](folio_core::index::SortedIndex) keyed by the item's id.
//!
//! # Usage
//!
//! ```ignore
//! use folio_core::models::{record_key, Record};
//! use folio_memory::MemoryDataSource;
//!
//! let source = MemoryDataSource::new(record_kind, record_key);
//! source.extend(records)?;
//!
//! let page = source.connection("Letter", &ConnectionArgs::default().first(2))?;
//! ```

mod source;

pub use source::{record_kind, MemoryDataSource, RecordSource};
