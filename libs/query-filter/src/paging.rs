//! Pagination and sort normalization.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

/// Raw pagination options as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingDefaults {
    /// Page size when the client sends none.
    pub default_limit: u64,
    /// Upper bound for client supplied page sizes.
    pub max_limit: u64,
    pub default_sort_by: String,
}

impl Default for PagingDefaults {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
            default_sort_by: "createdAt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Bounded(u64),
    /// `limit=all`: no page size.
    All,
}

impl Limit {
    pub fn as_option(self) -> Option<u64> {
        match self {
            Self::Bounded(n) => Some(n),
            Self::All => None,
        }
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bounded(n) => serializer.serialize_u64(*n),
            Self::All => serializer.serialize_str("all"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `asc`, `ascending` or `1` sort ascending; anything else descending.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub fn direction(self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: u64,
    pub limit: Limit,
    pub skip: u64,
    pub sort: SortSpec,
}

impl Page {
    /// `{field: 1 | -1}`
    pub fn sort_document(&self) -> Value {
        let mut doc = serde_json::Map::new();
        doc.insert(self.sort.field.clone(), json!(self.sort.order.direction()));
        Value::Object(doc)
    }
}

impl PageRequest {
    pub fn resolve(&self, defaults: &PagingDefaults) -> Page {
        let page = self
            .page
            .as_deref()
            .and_then(parse_int)
            .map(|n| n.max(1) as u64)
            .unwrap_or(1);

        let max_limit = defaults.max_limit.max(1);
        let limit = match self.limit.as_deref().map(str::trim) {
            Some(l) if l.eq_ignore_ascii_case("all") => Limit::All,
            Some(l) => match parse_int(l) {
                Some(n) => Limit::Bounded((n.max(1) as u64).min(max_limit)),
                None => Limit::Bounded(defaults.default_limit.clamp(1, max_limit)),
            },
            None => Limit::Bounded(defaults.default_limit.clamp(1, max_limit)),
        };

        let skip = match limit {
            Limit::Bounded(n) => (page - 1).saturating_mul(n),
            Limit::All => 0,
        };

        let field = self
            .sort_by
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&defaults.default_sort_by)
            .to_string();
        let order = self
            .sort_order
            .as_deref()
            .map(SortOrder::parse)
            .unwrap_or(SortOrder::Desc);

        Page {
            page,
            limit,
            skip,
            sort: SortSpec { field, order },
        }
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
