//! Generic pattern builders shared by the field handlers.

use crate::input::FilterValue;
use crate::predicate::{Condition, Literal, Pattern, Predicate};

/// Nested fields an `address` filter is matched against.
pub const ADDRESS_FIELDS: [&str; 5] = [
    "location",
    "vendorInfo.address",
    "vendorInfo.location",
    "vendorInfo.city",
    "vendorInfo.district",
];

/// `AnyOf` for lists, a single exact pattern for scalars.
pub fn any_of(value: &FilterValue) -> Condition {
    match value {
        FilterValue::Scalar(s) => Condition::Matches(Pattern::exact(s)),
        FilterValue::List(_) => Condition::AnyOf(exact_patterns(value)),
    }
}

/// Always `AnyOf`, wrapping a scalar as a one-element list.
pub fn any_of_list(value: &FilterValue) -> Condition {
    Condition::AnyOf(exact_patterns(value))
}

fn exact_patterns(value: &FilterValue) -> Vec<Pattern> {
    value.values().into_iter().map(Pattern::exact).collect()
}

/// Case-insensitive substring match on `path`.
pub fn contains(path: &str, value: &str) -> Predicate {
    Predicate::matches_pattern(path, Pattern::contains(value))
}

/// Substring match across every address-like field.
pub fn address(value: &str) -> Predicate {
    Predicate::Or(ADDRESS_FIELDS.iter().map(|f| contains(f, value)).collect())
}

/// Category name match, plus a category id match when `value` is a document id.
pub fn category(value: &str) -> Predicate {
    let value = value.trim();
    let mut arms = vec![Predicate::matches_pattern(
        "categoryInfo.categoryName",
        Pattern::exact(value),
    )];
    if is_object_id(value) {
        arms.push(Predicate::field(
            "categories",
            Condition::Equals(Literal::ObjectId(value.to_ascii_lowercase())),
        ));
    }
    Predicate::Or(arms)
}

/// 24 hexadecimal digits.
pub fn is_object_id(value: &str) -> bool {
    value.len() == 24 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Build one predicate per value and OR them; `None` when none apply.
pub(crate) fn per_value<F>(value: &FilterValue, mut build: F) -> Option<Predicate>
where
    F: FnMut(&str) -> Option<Predicate>,
{
    let mut arms: Vec<Predicate> = value.values().into_iter().filter_map(&mut build).collect();
    match arms.len() {
        0 => None,
        1 => arms.pop(),
        _ => Some(Predicate::Or(arms)),
    }
}
