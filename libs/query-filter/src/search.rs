//! Free-text search across an entity's searchable fields.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::patterns::contains;
use crate::predicate::{Bound, Condition, Predicate, Range};

static NUMERIC_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)-(\d+)").expect("numeric span regex is valid"));

/// Split a search term on whitespace and `&`, dropping empty pieces.
pub fn split_terms(term: &str) -> Vec<&str> {
    term.split(|c: char| c.is_whitespace() || c == '&')
        .filter(|t| !t.is_empty())
        .collect()
}

/// One OR arm per (term, concrete field) pair.
pub fn search_arms<S: AsRef<str>>(term: &str, searchable: &[S]) -> Vec<Predicate> {
    let mut arms = Vec::new();
    for t in split_terms(term) {
        for field in searchable {
            push_field_arms(&mut arms, field.as_ref(), t);
        }
    }
    arms
}

fn push_field_arms(arms: &mut Vec<Predicate>, field: &str, term: &str) {
    match field {
        "vendorInfo" => {
            for nested in [
                "vendorInfo.vendorName",
                "vendorInfo.email",
                "vendorInfo.location",
            ] {
                arms.push(contains(nested, term));
            }
        }
        "categoryInfo" => arms.push(contains("categoryInfo.categoryName", term)),
        "salaryRange" | "experienceRange" => match numeric_span(term) {
            Some((min, max)) => arms.push(Predicate::field(
                field,
                Condition::Range(Range::between(Bound::Int(min), Bound::Int(max))),
            )),
            None => arms.push(contains(field, term)),
        },
        _ => arms.push(contains(field, term)),
    }
}

fn numeric_span(term: &str) -> Option<(i64, i64)> {
    let caps = NUMERIC_SPAN.captures(term)?;
    let min = caps[1].parse().ok()?;
    let max = caps[2].parse().ok()?;
    Some((min, max))
}
