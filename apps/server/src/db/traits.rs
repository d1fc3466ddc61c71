//! Core traits for listing backends

use crate::Result;
use async_trait::async_trait;
use hireboard_filter::CompiledQuery;
use serde_json::Value as JsonValue;

/// One page of matching documents plus the total match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub rows: Vec<JsonValue>,
    /// Matches before skip/limit were applied.
    pub total: u64,
}

/// Executes compiled listing queries against a document store.
///
/// Any backend that can evaluate the predicate tree (MongoDB via
/// [`hireboard_filter::Predicate::to_document`], the in-memory store, an HTTP
/// proxy, ...) can implement this trait.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `query` against `collection`.
    ///
    /// Rows are sorted by the query's sort spec before skip and limit are
    /// applied. An unknown collection yields an empty outcome.
    async fn execute(&self, collection: &str, query: &CompiledQuery) -> Result<QueryOutcome>;
}
