//! In-memory document store

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use hireboard_filter::{evaluate::resolve_path, CompiledQuery, Matcher, SortOrder};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use super::traits::{QueryExecutor, QueryOutcome};
use crate::{Error, Result};

/// Collections of JSON documents held behind a read-write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<JsonValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a `{collection: [documents]}` object.
    pub fn from_seed(seed: JsonValue) -> Result<Self> {
        let JsonValue::Object(map) = seed else {
            return Err(Error::Store(
                "seed must be an object of collection arrays".to_string(),
            ));
        };

        let mut collections = HashMap::with_capacity(map.len());
        for (name, docs) in map {
            let JsonValue::Array(docs) = docs else {
                return Err(Error::Store(format!(
                    "seed collection '{name}' is not an array"
                )));
            };
            collections.insert(name, docs);
        }

        Ok(Self {
            collections: RwLock::new(collections),
        })
    }

    pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Store(format!("read seed {}: {e}", path.display())))?;
        let seed: JsonValue = serde_json::from_str(&raw)
            .map_err(|e| Error::Store(format!("parse seed {}: {e}", path.display())))?;
        Self::from_seed(seed)
    }

}

#[async_trait]
impl QueryExecutor for MemoryStore {
    async fn execute(&self, collection: &str, query: &CompiledQuery) -> Result<QueryOutcome> {
        let matcher = Matcher::new(&query.filter)?;

        let guard = self.collections.read().await;
        let Some(docs) = guard.get(collection) else {
            return Ok(QueryOutcome::default());
        };

        let mut hits: Vec<&JsonValue> = docs.iter().filter(|d| matcher.matches(d)).collect();
        let total = hits.len() as u64;

        let sort = &query.page.sort;
        let path: Vec<&str> = sort.field.split('.').collect();
        hits.sort_by(|a, b| {
            let ord = compare_sort_keys(sort_key(a, &path), sort_key(b, &path));
            match sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        let skip = usize::try_from(query.page.skip).unwrap_or(usize::MAX);
        let take = query
            .page
            .limit
            .as_option()
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

        let rows = hits.into_iter().skip(skip).take(take).cloned().collect();

        tracing::debug!(collection, total, "executed in-memory query");
        Ok(QueryOutcome { rows, total })
    }
}

fn sort_key<'a>(doc: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    resolve_path(doc, path).into_iter().next()
}

/// Missing and null first, then numbers, strings, objects, arrays, booleans.
fn compare_sort_keys(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    fn rank(v: Option<&JsonValue>) -> u8 {
        match v {
            None | Some(JsonValue::Null) => 0,
            Some(JsonValue::Number(_)) => 1,
            Some(JsonValue::String(_)) => 2,
            Some(JsonValue::Object(_)) => 3,
            Some(JsonValue::Array(_)) => 4,
            Some(JsonValue::Bool(_)) => 5,
        }
    }

    match (a, b) {
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x.cmp(y),
        // {"$date": "..."} compares by its RFC 3339 text
        (Some(JsonValue::Object(x)), Some(JsonValue::Object(y))) => {
            let x = x.get("$date").and_then(JsonValue::as_str).unwrap_or_default();
            let y = y.get("$date").and_then(JsonValue::as_str).unwrap_or_default();
            x.cmp(y)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}
