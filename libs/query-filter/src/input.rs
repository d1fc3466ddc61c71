//! Filter inputs as decoded from a listing query string.

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_value, Joiner};

/// A single filter value: one string, or an ordered list of strings when the
/// client repeated the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(String),
    List(Vec<String>),
}

impl FilterValue {
    /// Non-empty values in order, untrimmed.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Scalar(s) => {
                if s.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![s.as_str()]
                }
            }
            Self::List(items) => items
                .iter()
                .map(String::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect(),
        }
    }

    /// Whether the value carries anything to filter on.
    pub fn is_truthy(&self) -> bool {
        !self.values().is_empty()
    }

    /// The single value of a scalar, or of a list holding exactly one
    /// non-empty element.
    pub fn single(&self) -> Option<&str> {
        match self.values().as_slice() {
            [one] => Some(*one),
            _ => None,
        }
    }

    /// Apply the value normalizer to every element, dropping empties.
    pub fn normalized(&self, joiner: Joiner) -> Self {
        match self {
            Self::Scalar(s) => Self::Scalar(normalize_value(s, joiner)),
            Self::List(items) => Self::List(
                items
                    .iter()
                    .map(|s| normalize_value(s, joiner))
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Scalar(existing) => {
                let first = std::mem::take(existing);
                *self = Self::List(vec![first, value]);
            }
            Self::List(items) => items.push(value),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered key -> value filter map.
///
/// Keys keep the client's spelling; dispatch compares them case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    entries: Vec<(String, FilterValue)>,
}

impl FilterInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Add one occurrence of `key`; repeated keys accumulate into a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.push(value),
            None => self.entries.push((key, FilterValue::Scalar(value))),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FilterInput
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = Self::new();
        for (k, v) in iter {
            input.append(k, v);
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_collapse_into_list() {
        let input: FilterInput = vec![
            ("workMode", "Remote"),
            ("jobType", "Full Time"),
            ("workMode", "Hybrid"),
        ]
        .into_iter()
        .collect();

        assert_eq!(input.len(), 2);
        assert_eq!(
            input.get("workMode"),
            Some(&FilterValue::List(vec![
                "Remote".to_string(),
                "Hybrid".to_string()
            ]))
        );
        assert_eq!(
            input.get("jobType"),
            Some(&FilterValue::Scalar("Full Time".to_string()))
        );
    }

    #[test]
    fn truthiness_ignores_blank_values() {
        assert!(!FilterValue::from("  ").is_truthy());
        assert!(!FilterValue::from(vec!["", " "]).is_truthy());
        assert!(FilterValue::from(vec!["", "Remote"]).is_truthy());
    }

    #[test]
    fn single_accepts_one_element_lists() {
        assert_eq!(FilterValue::from(vec!["", "today"]).single(), Some("today"));
        assert_eq!(FilterValue::from(vec!["a", "b"]).single(), None);
    }

    #[test]
    fn normalized_drops_empty_elements() {
        let v = FilterValue::from(vec![" Full  Time ", "  "]).normalized(Joiner::Hyphen);
        assert_eq!(v, FilterValue::List(vec!["Full-Time".to_string()]));
    }

    #[test]
    fn deserializes_scalar_or_list() {
        let scalar: FilterValue = serde_json::from_str(r#""Remote""#).unwrap();
        let list: FilterValue = serde_json::from_str(r#"["Remote","Hybrid"]"#).unwrap();
        assert_eq!(scalar, FilterValue::from("Remote"));
        assert_eq!(list, FilterValue::from(vec!["Remote", "Hybrid"]));
    }
}
