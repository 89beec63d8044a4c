//! GraphQL schema definition.
//!
//! This module exposes keyed collections through a Relay-style schema:
//! a `node(id:)` lookup, paginated `records` connections and a
//! `collections` listing.

use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Result, Schema, ID};
use tracing::debug;

use folio_core::codec::decode_global_id;
use folio_core::error::DataSourceError;
use folio_core::ports::ConnectionArgs;

use crate::types::{Collection, FolioSchema, Record, RecordConnection, SharedSource};

// -----------------------------------------------------------------------------
// Schema Configuration
// -----------------------------------------------------------------------------

/// Maximum query depth to prevent deeply nested queries (DoS protection).
/// Note: GraphQL introspection requires depth ~13, so we use 15 to allow it.
pub const MAX_QUERY_DEPTH: usize = 15;

/// Maximum query complexity score (DoS protection).
/// Each field has a default complexity of 1, nested objects multiply.
pub const MAX_QUERY_COMPLEXITY: usize = 500;

/// Largest `first`/`last` a client may request.
pub const MAX_PAGE_SIZE: i32 = 100;

/// Maximum length for a collection name argument.
const MAX_KIND_LENGTH: usize = 128;

// -----------------------------------------------------------------------------
// Schema Builder
// -----------------------------------------------------------------------------

/// Build the GraphQL schema over a data source.
///
/// Includes query depth and complexity limits for DoS protection.
pub fn build_schema(source: SharedSource) -> FolioSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(source)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}

// -----------------------------------------------------------------------------
// Query Root
// -----------------------------------------------------------------------------

/// Query root.
#[derive(Default)]
pub struct Query;

#[Object]
impl Query {
    /// Fetches an object given its ID.
    async fn node<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        #[graphql(desc = "The ID of an object")] id: ID,
    ) -> Result<Option<Record>> {
        let source = ctx.data::<SharedSource>()?;

        let Some((kind, local_id)) = decode_global_id(&id) else {
            debug!(id = %id.as_str(), "Malformed global id");
            return Ok(None);
        };

        match source.fetch_node(&kind, &local_id) {
            Ok(node) => Ok(node.map(Record::from)),
            Err(DataSourceError::UnknownCollection(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List the records of one collection with cursor pagination.
    async fn records<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        kind: String,
        before: Option<String>,
        after: Option<String>,
        first: Option<i32>,
        last: Option<i32>,
    ) -> Result<RecordConnection> {
        validate_kind(&kind)?;
        validate_page_size(first, "first")?;
        validate_page_size(last, "last")?;

        let source = ctx.data::<SharedSource>()?;

        let args = ConnectionArgs {
            before,
            after,
            first,
            last,
        };

        let connection = source.connection(&kind, &args)?;
        Ok(RecordConnection::from(connection))
    }

    /// List collections and their sizes.
    async fn collections<'ctx>(&self, ctx: &Context<'ctx>) -> Result<Vec<Collection>> {
        let source = ctx.data::<SharedSource>()?;

        let collections = source.collections()?;
        Ok(collections.into_iter().map(Collection::from).collect())
    }
}

// -----------------------------------------------------------------------------
// Validation
// -----------------------------------------------------------------------------

/// Validate a collection name argument.
fn validate_kind(kind: &str) -> Result<()> {
    if kind.is_empty() {
        return Err(async_graphql::Error::new("kind cannot be empty"));
    }
    if kind.len() > MAX_KIND_LENGTH {
        return Err(async_graphql::Error::new(format!(
            "kind too long: maximum {} characters allowed",
            MAX_KIND_LENGTH
        )));
    }
    Ok(())
}

/// Reject page sizes above [`MAX_PAGE_SIZE`].
///
/// Negative values are left to the resolver, which rejects them.
fn validate_page_size(value: Option<i32>, field_name: &str) -> Result<()> {
    match value {
        Some(v) if v > MAX_PAGE_SIZE => Err(async_graphql::Error::new(format!(
            "{} too large: maximum page size is {}",
            field_name, MAX_PAGE_SIZE
        ))),
        _ => Ok(()),
    }
}
