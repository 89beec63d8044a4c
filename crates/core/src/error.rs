//! Error types for the pagination domain layer.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`IndexError`] - Sorted index maintenance errors
//! - [`PaginationError`] - Caller contract violations on connection arguments
//! - [`DataSourceError`] - Top-level data source errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Malformed cursors are deliberately absent from this hierarchy: the
//! resolver treats them as if no cursor had been supplied.

use thiserror::Error;

// =============================================================================
// Index Errors
// =============================================================================

/// Sorted index maintenance errors.
///
/// Every operation that returns one of these leaves the index untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// An item with the same key is already stored.
    #[error("An item with the same key {key} already exists in collection {collection}")]
    DuplicateKey {
        /// Collection name.
        collection: String,
        /// Offending key, rendered in cursor form.
        key: String,
    },

    /// The item to remove is not stored.
    #[error("Item with key {key} not found in collection {collection}")]
    NotFound {
        /// Collection name.
        collection: String,
        /// Key that was looked up.
        key: String,
    },

    /// The key cannot be represented by a cursor of the configured length.
    #[error("Key {key} exceeds the maximum cursor key length of {max} characters")]
    KeyTooLong {
        /// Offending key, rendered in cursor form.
        key: String,
        /// Configured bound.
        max: usize,
    },
}

// =============================================================================
// Pagination Errors
// =============================================================================

/// Violations of the connection argument contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    /// `first` or `last` was negative.
    #[error("Invalid argument: {argument} must be non-negative, got {value}")]
    InvalidArgument {
        /// Argument name (`first` or `last`).
        argument: &'static str,
        /// Supplied value.
        value: i32,
    },
}

// =============================================================================
// Data Source Errors
// =============================================================================

/// Errors returned by [`crate::ports::DataSource`] implementations.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// No collection is registered under this name.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// A writer panicked while holding the collection lock.
    #[error("Collection lock poisoned: {0}")]
    Poisoned(String),

    /// Index maintenance error.
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Invalid connection arguments.
    #[error("Pagination error: {0}")]
    Pagination(#[from] PaginationError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type for connection resolution.
pub type PaginationResult<T> = Result<T, PaginationError>;

/// Result type for data source operations.
pub type DataSourceResult<T> = Result<T, DataSourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let index_err = IndexError::NotFound {
            collection: "Letter".into(),
            key: "7".into(),
        };
        let source_err: DataSourceError = index_err.into();
        assert!(source_err.to_string().contains("Letter"));
        assert!(source_err.to_string().contains('7'));

        let pagination_err = PaginationError::InvalidArgument {
            argument: "first",
            value: -1,
        };
        let source_err: DataSourceError = pagination_err.into();
        assert!(source_err.to_string().contains("first"));
    }

    #[test]
    fn test_duplicate_key_names_key_and_collection() {
        let err = IndexError::DuplicateKey {
            collection: "Letter".into(),
            key: "3".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Letter") && msg.contains('3'));
    }

    #[test]
    fn test_invalid_argument_reports_value() {
        let err = PaginationError::InvalidArgument {
            argument: "last",
            value: -5,
        };
        assert!(err.to_string().contains("-5"));
    }
}
