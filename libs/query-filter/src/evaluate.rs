//! In-memory evaluation of compiled predicates against JSON documents.
//!
//! Semantics follow the document-store rendering: dot paths descend into
//! nested objects and fan out over arrays, regexes only match strings,
//! integer ranges only match numbers and instant ranges match RFC 3339
//! strings or `{"$date": ...}` values.

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::predicate::{Bound, Condition, Literal, Pattern, Predicate, Range};
use crate::{Error, Result};

/// A predicate with its regexes compiled, ready to test many documents.
#[derive(Debug, Clone)]
pub struct Matcher {
    root: Node,
}

#[derive(Debug, Clone)]
enum Node {
    All,
    And(Vec<Node>),
    Or(Vec<Node>),
    Leaf { path: Vec<String>, test: Test },
}

#[derive(Debug, Clone)]
enum Test {
    Equals(Literal),
    Regex(Regex),
    AnyOf(Vec<Regex>),
    Range(Range),
    SpanOverlap { min: i64, max: i64 },
}

impl Matcher {
    pub fn new(predicate: &Predicate) -> Result<Self> {
        Ok(Self {
            root: compile(predicate)?,
        })
    }

    pub fn matches(&self, doc: &Value) -> bool {
        self.root.eval(doc)
    }
}

impl Predicate {
    /// One-shot evaluation. Prefer [`Matcher`] when testing many documents.
    pub fn matches(&self, doc: &Value) -> Result<bool> {
        Ok(Matcher::new(self)?.matches(doc))
    }
}

fn compile(predicate: &Predicate) -> Result<Node> {
    Ok(match predicate {
        Predicate::All => Node::All,
        Predicate::And(items) => Node::And(items.iter().map(compile).collect::<Result<_>>()?),
        Predicate::Or(items) => Node::Or(items.iter().map(compile).collect::<Result<_>>()?),
        Predicate::Field(leaf) => Node::Leaf {
            path: leaf.path.split('.').map(str::to_string).collect(),
            test: match &leaf.condition {
                Condition::Equals(lit) => Test::Equals(lit.clone()),
                Condition::Matches(p) => Test::Regex(build_regex(p)?),
                Condition::AnyOf(ps) => {
                    Test::AnyOf(ps.iter().map(build_regex).collect::<Result<_>>()?)
                }
                Condition::Range(r) => Test::Range(*r),
                Condition::SpanOverlap { min, max } => Test::SpanOverlap {
                    min: *min,
                    max: *max,
                },
            },
        },
    })
}

fn build_regex(pattern: &Pattern) -> Result<Regex> {
    RegexBuilder::new(pattern.source())
        .case_insensitive(pattern.is_case_insensitive())
        .build()
        .map_err(|e| Error::InvalidPattern {
            pattern: pattern.source().to_string(),
            message: e.to_string(),
        })
}

impl Node {
    fn eval(&self, doc: &Value) -> bool {
        match self {
            Node::All => true,
            Node::And(items) => items.iter().all(|n| n.eval(doc)),
            Node::Or(items) => items.iter().any(|n| n.eval(doc)),
            Node::Leaf { path, test } => {
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                resolve_path(doc, &segments)
                    .into_iter()
                    .any(|v| test.check(v))
            }
        }
    }
}

/// Values reachable at `path`, fanning out over arrays on the way and at the
/// end. Missing fields yield nothing.
pub fn resolve_path<'a>(doc: &'a Value, path: &[&str]) -> Vec<&'a Value> {
    let mut out = Vec::new();
    walk(doc, path, &mut out);
    out
}

fn walk<'a>(value: &'a Value, path: &[&str], out: &mut Vec<&'a Value>) {
    match (path.split_first(), value) {
        (None, Value::Array(items)) => {
            out.push(value);
            out.extend(items.iter());
        }
        (None, _) => out.push(value),
        (Some(_), Value::Array(items)) => {
            for item in items {
                walk(item, path, out);
            }
        }
        (Some((head, rest)), Value::Object(map)) => {
            if let Some(next) = map.get(*head) {
                walk(next, rest, out);
            }
        }
        (Some(_), _) => {}
    }
}

impl Test {
    fn check(&self, value: &Value) -> bool {
        match self {
            Test::Equals(Literal::Text(expected)) => value.as_str() == Some(expected.as_str()),
            Test::Equals(Literal::ObjectId(expected)) => object_id(value)
                .map(|id| id.eq_ignore_ascii_case(expected))
                .unwrap_or(false),
            Test::Regex(re) => value.as_str().map(|s| re.is_match(s)).unwrap_or(false),
            Test::AnyOf(res) => value
                .as_str()
                .map(|s| res.iter().any(|re| re.is_match(s)))
                .unwrap_or(false),
            Test::Range(range) => in_range(range, value),
            Test::SpanOverlap { min, max } => value
                .as_str()
                .and_then(stored_span)
                .map(|(lo, hi)| lo <= *max && hi >= *min)
                .unwrap_or(false),
        }
    }
}

fn object_id(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str),
        _ => None,
    }
}

fn instant(value: &Value) -> Option<DateTime<Utc>> {
    let raw = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("$date").and_then(Value::as_str)?,
        _ => return None,
    };
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn in_range(range: &Range, value: &Value) -> bool {
    let check = |bound: Bound, ascending: bool| -> bool {
        match bound {
            Bound::Int(b) => match value.as_f64() {
                Some(n) if ascending => n >= b as f64,
                Some(n) => n <= b as f64,
                None => false,
            },
            Bound::Instant(b) => match instant(value) {
                Some(t) if ascending => t >= b,
                Some(t) => t <= b,
                None => false,
            },
        }
    };
    range.gte.map_or(true, |b| check(b, true)) && range.lte.map_or(true, |b| check(b, false))
}

/// `"<a>-<b>[ unit]"` → `(a, b)`.
fn stored_span(raw: &str) -> Option<(i64, i64)> {
    let (lo, rest) = raw.split_once('-')?;
    let hi = rest.split_whitespace().next()?;
    Some((lo.trim().parse().ok()?, hi.parse().ok()?))
}
