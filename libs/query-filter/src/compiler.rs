//! Filter compiler: search term + field filters into one predicate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::dates::Clock;
use crate::dispatch::{FieldRules, FilterKind};
use crate::input::FilterInput;
use crate::paging::{Page, PageRequest, PagingDefaults};
use crate::predicate::Predicate;
use crate::profile::FilterProfile;
use crate::search::search_arms;
use crate::{Error, Result};

/// How the per-field sub-predicates are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    /// A document matching any field filter is returned.
    #[default]
    Any,
    /// Every field filter must match.
    All,
}

impl FromStr for Composition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "or" => Ok(Self::Any),
            "all" | "and" => Ok(Self::All),
            other => Err(Error::InvalidFilterValue {
                field: "composition".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::All => "all",
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterCompiler {
    rules: FieldRules,
    searchable: Vec<String>,
    composition: Composition,
}

impl FilterCompiler {
    pub fn new<I, S>(fields_to_transform: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules: FieldRules::new(fields_to_transform),
            ..Default::default()
        }
    }

    pub fn with_searchable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_composition(mut self, composition: Composition) -> Self {
        self.composition = composition;
        self
    }

    pub fn composition(&self) -> Composition {
        self.composition
    }

    /// Compile the search term and filter entries.
    ///
    /// The result is `And` of the non-empty groups (search, fields), or
    /// [`Predicate::All`] when both are empty.
    pub fn compile(
        &self,
        input: &FilterInput,
        search_term: Option<&str>,
        clock: &Clock,
    ) -> Result<Predicate> {
        let mut groups = Vec::with_capacity(2);

        if let Some(term) = search_term {
            let arms = search_arms(term, &self.searchable);
            if !arms.is_empty() {
                debug!(term, arms = arms.len(), "compiled search group");
                groups.push(Predicate::Or(arms));
            }
        }

        let mut arms = Vec::new();
        for (key, value) in input.iter() {
            let kind = FilterKind::resolve(key, &self.rules);
            debug!(field = key, kind = ?kind, "dispatching filter");
            if let Some(predicate) = kind.build(key, value, clock)? {
                arms.push(predicate);
            }
        }
        if !arms.is_empty() {
            groups.push(match self.composition {
                Composition::Any => Predicate::Or(arms),
                Composition::All => Predicate::And(arms),
            });
        }

        if groups.is_empty() {
            Ok(Predicate::All)
        } else {
            Ok(Predicate::And(groups))
        }
    }

    /// Compile the filter together with its pagination.
    pub fn compile_query(
        &self,
        input: &FilterInput,
        search_term: Option<&str>,
        paging: &PageRequest,
        defaults: &PagingDefaults,
        clock: &Clock,
    ) -> Result<CompiledQuery> {
        let filter = self.compile(input, search_term, clock)?;
        Ok(CompiledQuery {
            filter,
            page: paging.resolve(defaults),
        })
    }
}

impl From<&FilterProfile> for FilterCompiler {
    fn from(profile: &FilterProfile) -> Self {
        Self::new(&profile.fields_to_transform)
            .with_searchable_fields(profile.searchable_fields.iter().cloned())
    }
}

/// A filter plus the page it should be evaluated over.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub filter: Predicate,
    pub page: Page,
}

impl CompiledQuery {
    /// `{filter, sort, skip, limit, page}`
    pub fn to_document(&self) -> Value {
        json!({
            "filter": self.filter.to_document(),
            "sort": self.page.sort_document(),
            "skip": self.page.skip,
            "limit": self.page.limit,
            "page": self.page.page,
        })
    }
}
