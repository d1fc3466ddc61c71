//! Compiled predicate tree and its document-store rendering.
//!
//! The tree is database agnostic. [`Predicate::to_document`] renders it as
//! MongoDB extended JSON (`$and`, `$or`, `$regex`, `$in`, `$gte`/`$lte`,
//! `$expr`), which is what the listing service hands to the store.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::normalize::{normalize_value, Joiner};

/// A regular expression source plus its case-insensitivity flag.
///
/// Client text is always escaped before it becomes part of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    case_insensitive: bool,
}

impl Pattern {
    /// A case-insensitive pattern from a trusted regex source.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            case_insensitive: true,
        }
    }

    /// Anchored whole-string match of a hyphen-normalized value.
    pub fn exact(value: &str) -> Self {
        let normalized = normalize_value(value, Joiner::Hyphen);
        Self::new(format!("^{}$", regex::escape(&normalized)))
    }

    /// Unanchored substring match of a trimmed value.
    pub fn contains(value: &str) -> Self {
        Self::new(regex::escape(value.trim()))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    fn options(&self) -> &'static str {
        if self.case_insensitive {
            "i"
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Text(String),
    /// 24 hex digit document id.
    ObjectId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Int(i64),
    Instant(DateTime<Utc>),
}

/// Inclusive range; a missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub gte: Option<Bound>,
    pub lte: Option<Bound>,
}

impl Range {
    pub fn between(gte: Bound, lte: Bound) -> Self {
        Self {
            gte: Some(gte),
            lte: Some(lte),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Equals(Literal),
    Matches(Pattern),
    /// Value matches any of the patterns.
    AnyOf(Vec<Pattern>),
    Range(Range),
    /// Stored `"<a>-<b>[ unit]"` text whose numeric span overlaps `[min, max]`.
    SpanOverlap { min: i64, max: i64 },
}

/// A leaf: one condition on exactly one (dot separated) field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPredicate {
    pub path: String,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every document.
    All,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Field(FieldPredicate),
}

impl Predicate {
    pub fn field(path: impl Into<String>, condition: Condition) -> Self {
        Self::Field(FieldPredicate {
            path: path.into(),
            condition,
        })
    }

    pub fn matches_pattern(path: impl Into<String>, pattern: Pattern) -> Self {
        Self::field(path, Condition::Matches(pattern))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// All leaves in depth-first order.
    pub fn leaves(&self) -> Vec<&FieldPredicate> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a FieldPredicate>) {
        match self {
            Self::All => {}
            Self::And(items) | Self::Or(items) => {
                for item in items {
                    item.collect_leaves(out);
                }
            }
            Self::Field(leaf) => out.push(leaf),
        }
    }

    /// Distinct field paths referenced by the predicate, in first-seen order.
    pub fn field_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for leaf in self.leaves() {
            if !paths.contains(&leaf.path.as_str()) {
                paths.push(&leaf.path);
            }
        }
        paths
    }

    /// Render as a MongoDB extended-JSON filter document.
    pub fn to_document(&self) -> Value {
        match self {
            Self::All => Value::Object(Map::new()),
            Self::And(items) => json!({ "$and": items.iter().map(Self::to_document).collect::<Vec<_>>() }),
            Self::Or(items) => json!({ "$or": items.iter().map(Self::to_document).collect::<Vec<_>>() }),
            Self::Field(leaf) => leaf.to_document(),
        }
    }
}

impl FieldPredicate {
    fn to_document(&self) -> Value {
        let path = self.path.as_str();
        match &self.condition {
            Condition::Equals(literal) => json!({ path: literal_document(literal) }),
            Condition::Matches(pattern) => json!({
                path: { "$regex": pattern.source(), "$options": pattern.options() }
            }),
            Condition::AnyOf(patterns) => {
                let items: Vec<Value> = patterns
                    .iter()
                    .map(|p| {
                        json!({ "$regularExpression": { "pattern": p.source(), "options": p.options() } })
                    })
                    .collect();
                json!({ path: { "$in": items } })
            }
            Condition::Range(range) => {
                let mut bounds = Map::new();
                if let Some(b) = range.gte {
                    bounds.insert("$gte".to_string(), bound_document(b));
                }
                if let Some(b) = range.lte {
                    bounds.insert("$lte".to_string(), bound_document(b));
                }
                json!({ path: bounds })
            }
            Condition::SpanOverlap { min, max } => {
                let field_ref = format!("${path}");
                json!({
                    "$expr": {
                        "$let": {
                            "vars": { "range": { "$split": [field_ref, "-"] } },
                            "in": {
                                "$and": [
                                    { "$lte": [ { "$toInt": { "$arrayElemAt": ["$$range", 0] } }, max ] },
                                    { "$gte": [
                                        { "$toInt": { "$first": { "$split": [ { "$arrayElemAt": ["$$range", 1] }, " " ] } } },
                                        min
                                    ] }
                                ]
                            }
                        }
                    }
                })
            }
        }
    }
}

fn literal_document(literal: &Literal) -> Value {
    match literal {
        Literal::Text(s) => Value::String(s.clone()),
        Literal::ObjectId(id) => json!({ "$oid": id }),
    }
}

fn bound_document(bound: Bound) -> Value {
    match bound {
        Bound::Int(n) => json!(n),
        Bound::Instant(t) => json!({ "$date": t.to_rfc3339_opts(SecondsFormat::Millis, true) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn exact_pattern_is_anchored_and_escaped() {
        assert_eq!(Pattern::exact(" Remote ").source(), "^Remote$");
        assert_eq!(Pattern::exact("C++ Dev").source(), r"^C\+\+\-Dev$");
        assert!(Pattern::exact("x").is_case_insensitive());
    }

    #[test]
    fn contains_pattern_is_unanchored() {
        assert_eq!(Pattern::contains(" dhaka ").source(), "dhaka");
        assert_eq!(Pattern::contains("a.b").source(), r"a\.b");
    }

    #[test]
    fn all_renders_as_empty_document() {
        assert_eq!(Predicate::All.to_document(), json!({}));
    }

    #[test]
    fn renders_regex_and_any_of() {
        let p = Predicate::Or(vec![
            Predicate::matches_pattern("location", Pattern::contains("Dhaka")),
            Predicate::field(
                "workMode",
                Condition::AnyOf(vec![Pattern::exact("Remote"), Pattern::exact("Hybrid")]),
            ),
        ]);
        assert_eq!(
            p.to_document(),
            json!({ "$or": [
                { "location": { "$regex": "Dhaka", "$options": "i" } },
                { "workMode": { "$in": [
                    { "$regularExpression": { "pattern": "^Remote$", "options": "i" } },
                    { "$regularExpression": { "pattern": "^Hybrid$", "options": "i" } }
                ] } }
            ] })
        );
    }

    #[test]
    fn renders_instant_ranges_and_object_ids() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let p = Predicate::And(vec![
            Predicate::field(
                "createdAt",
                Condition::Range(Range::between(Bound::Instant(start), Bound::Instant(end))),
            ),
            Predicate::field(
                "categories",
                Condition::Equals(Literal::ObjectId("65a1b2c3d4e5f60718293a4b".into())),
            ),
        ]);
        assert_eq!(
            p.to_document(),
            json!({ "$and": [
                { "createdAt": {
                    "$gte": { "$date": "2024-03-01T00:00:00.000Z" },
                    "$lte": { "$date": "2024-03-02T00:00:00.000Z" }
                } },
                { "categories": { "$oid": "65a1b2c3d4e5f60718293a4b" } }
            ] })
        );
    }

    #[test]
    fn span_overlap_renders_expr_on_field() {
        let doc = Predicate::field("salaryRange", Condition::SpanOverlap { min: 50, max: 80 })
            .to_document();
        assert_eq!(
            doc["$expr"]["$let"]["vars"]["range"]["$split"][0],
            json!("$salaryRange")
        );
        assert_eq!(doc["$expr"]["$let"]["in"]["$and"][0]["$lte"][1], json!(80));
        assert_eq!(doc["$expr"]["$let"]["in"]["$and"][1]["$gte"][1], json!(50));
    }

    #[test]
    fn field_paths_are_distinct_and_ordered() {
        let p = Predicate::Or(vec![
            Predicate::matches_pattern("b", Pattern::new("x")),
            Predicate::matches_pattern("a", Pattern::new("y")),
            Predicate::matches_pattern("b", Pattern::new("z")),
        ]);
        assert_eq!(p.field_paths(), vec!["b", "a"]);
        assert_eq!(p.leaves().len(), 3);
    }
}
