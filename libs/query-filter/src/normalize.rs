/// How internal whitespace runs are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joiner {
    /// `"Full   Time"` -> `"Full-Time"` (exact-match patterns).
    Hyphen,
    /// `"last   2 days"` -> `"last 2 days"` (keyword windows).
    Space,
}

impl Joiner {
    fn as_str(self) -> &'static str {
        match self {
            Self::Hyphen => "-",
            Self::Space => " ",
        }
    }
}

/// Trim surrounding whitespace and collapse internal whitespace runs.
///
/// Case is preserved; matching is made case-insensitive by the pattern
/// builders instead.
pub fn normalize_value(value: &str, joiner: Joiner) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(joiner.as_str())
}

/// Lowercased, space-joined form used for keyword comparisons.
pub(crate) fn keyword(value: &str) -> String {
    normalize_value(value, Joiner::Space).to_lowercase()
}
