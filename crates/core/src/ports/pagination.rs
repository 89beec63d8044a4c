//! Pagination types for list queries.
//!
//! These types implement Relay-style cursor pagination. Serialized field
//! names (`edges`, `node`, `cursor`, `pageInfo`, `hasPreviousPage`,
//! `hasNextPage`, `startCursor`, `endCursor`) follow the connection protocol.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque cursor for pagination.
///
/// The cursor value is produced by [`crate::codec::CursorCodec`] and should
/// be treated as an opaque token by clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor {
    pub value: String,
}

impl Cursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<Cursor> for String {
    fn from(cursor: Cursor) -> Self {
        cursor.value
    }
}

/// Connection arguments.
///
/// Supports forward pagination (`first`/`after`), backward pagination
/// (`last`/`before`) and any combination of the four.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionArgs {
    /// Only return items strictly before this cursor.
    pub before: Option<String>,
    /// Only return items strictly after this cursor.
    pub after: Option<String>,
    /// Keep at most this many items from the front of the window.
    pub first: Option<i32>,
    /// Keep at most this many items from the back of the window.
    pub last: Option<i32>,
}

impl ConnectionArgs {
    pub fn first(mut self, first: i32) -> Self {
        self.first = Some(first);
        self
    }

    pub fn last(mut self, last: i32) -> Self {
        self.last = Some(last);
        self
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }
}

/// Paginated result set with edges and page info.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    /// List of edges (node + cursor pairs).
    pub edges: Vec<Edge<T>>,
    /// Information about the current page.
    pub page_info: PageInfo,
    /// Size of the whole collection when the page was resolved.
    pub total_count: Option<i64>,
}

impl<T> Connection<T> {
    /// A connection without edges.
    pub fn empty(total_count: Option<i64>) -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
            total_count,
        }
    }

    /// Transform every node, keeping cursors and page info.
    pub fn map<U, F>(self, mut f: F) -> Connection<U>
    where
        F: FnMut(T) -> U,
    {
        Connection {
            edges: self
                .edges
                .into_iter()
                .map(|e| Edge {
                    node: f(e.node),
                    cursor: e.cursor,
                })
                .collect(),
            page_info: self.page_info,
            total_count: self.total_count,
        }
    }

    /// Iterate over the nodes of this page.
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }
}

impl<T: Clone> Connection<&T> {
    /// Detach a borrowed page from the index it was resolved against.
    pub fn cloned(self) -> Connection<T> {
        self.map(T::clone)
    }
}

/// A single item in a paginated result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge<T> {
    /// The actual item.
    pub node: T,
    /// Cursor for this item (used for pagination).
    pub cursor: Cursor,
}

/// Information about the current page in a paginated result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Cursor of the first item in this page.
    pub start_cursor: Option<Cursor>,
    /// Cursor of the last item in this page.
    pub end_cursor: Option<Cursor>,
    /// Whether the window holds items before this page.
    pub has_previous_page: bool,
    /// Whether the window holds items after this page.
    pub has_next_page: bool,
}
