//! Listing service - filtered, paged collection reads
//!
//! Orchestrates a listing by:
//! - Splitting query items into paging options, the search term and filters
//! - Compiling them with the collection's filter profile
//! - Running the compiled query through the executor

use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use hireboard_filter::{
    Clock, CompiledQuery, Composition, FilterCompiler, FilterInput, FilterProfile, Limit,
    PageRequest, PagingDefaults,
};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use crate::{db::QueryExecutor, Error, Result};

/// Query keys that carry the free-text search term.
const SEARCH_KEYS: [&str; 2] = ["searchTerm", "q"];

/// Query items split by role.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingParams {
    pub filters: FilterInput,
    pub search_term: Option<String>,
    pub paging: PageRequest,
    /// Keys that were neither paging, search nor filterable.
    pub ignored: Vec<String>,
}

impl ListingParams {
    /// Repeated filter keys accumulate into a list; for paging and search
    /// keys the last occurrence wins.
    pub fn from_items(profile: &FilterProfile, items: &[(String, String)]) -> Self {
        let mut params = Self::default();
        for (key, value) in items {
            match key.as_str() {
                "page" => params.paging.page = Some(value.clone()),
                "limit" => params.paging.limit = Some(value.clone()),
                "sortBy" => params.paging.sort_by = Some(value.clone()),
                "sortOrder" => params.paging.sort_order = Some(value.clone()),
                k if SEARCH_KEYS.contains(&k) => {
                    if !value.trim().is_empty() {
                        params.search_term = Some(value.clone());
                    }
                }
                k if profile.is_filterable(k) => params.filters.append(k, value.clone()),
                k => params.ignored.push(k.to_string()),
            }
        }
        if profile.unpaged {
            params.paging.limit = Some("all".to_string());
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingMeta {
    pub page: u64,
    pub limit: Limit,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub meta: ListingMeta,
    pub data: Vec<JsonValue>,
}

/// Listing service compiles and runs collection queries
pub struct ListingService {
    executor: Arc<dyn QueryExecutor>,
    profiles: Vec<FilterProfile>,
    paging: PagingDefaults,
    composition: Composition,
    offset: FixedOffset,
}

impl ListingService {
    /// Service over the built-in collection profiles.
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            profiles: FilterProfile::builtins(),
            paging: PagingDefaults::default(),
            composition: Composition::default(),
            offset: Utc.fix(),
        }
    }

    pub fn with_paging(mut self, paging: PagingDefaults) -> Self {
        self.paging = paging;
        self
    }

    pub fn with_composition(mut self, composition: Composition) -> Self {
        self.composition = composition;
        self
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Profile by collection name, compared the way
    /// [`FilterProfile::builtin`] compares (trimmed, case-insensitive).
    pub fn profile(&self, collection: &str) -> Result<&FilterProfile> {
        let wanted = collection.trim();
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::NotFound(format!("unknown collection '{collection}'")))
    }

    fn clock(&self) -> Clock {
        Clock::system().with_offset(self.offset)
    }

    /// Compile `items` for `collection` against `clock`.
    pub fn compile(
        &self,
        collection: &str,
        items: &[(String, String)],
        clock: &Clock,
    ) -> Result<CompiledQuery> {
        let profile = self.profile(collection)?;
        let params = ListingParams::from_items(profile, items);
        if !params.ignored.is_empty() {
            tracing::debug!(collection, ignored = ?params.ignored, "ignoring non-filterable query keys");
        }

        let compiler = FilterCompiler::from(profile).with_composition(self.composition);
        let query = compiler.compile_query(
            &params.filters,
            params.search_term.as_deref(),
            &params.paging,
            &self.paging,
            clock,
        )?;
        Ok(query)
    }

    /// List one page of `collection`.
    #[tracing::instrument(name = "listing", skip(self, items), fields(total = tracing::field::Empty))]
    pub async fn list(&self, collection: &str, items: &[(String, String)]) -> Result<Listing> {
        let name = self.profile(collection)?.name.as_str();
        let query = self.compile(collection, items, &self.clock())?;
        let outcome = self.executor.execute(name, &query).await?;
        tracing::Span::current().record("total", outcome.total);

        Ok(Listing {
            meta: ListingMeta {
                page: query.page.page,
                limit: query.page.limit,
                total: outcome.total,
            },
            data: outcome.rows,
        })
    }

    /// The compiled query document, without executing it.
    pub fn explain(&self, collection: &str, items: &[(String, String)]) -> Result<JsonValue> {
        let query = self.compile(collection, items, &self.clock())?;
        Ok(query.to_document())
    }

    /// Profiles as served by the collections index.
    pub fn describe(&self) -> JsonValue {
        json!(self.profiles)
    }
}
