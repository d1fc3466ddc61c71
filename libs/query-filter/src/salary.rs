//! Salary range parsing and overlap filters.
//!
//! Salary ranges are stored as text such as `"60-90 yearly"` or `"40-50"`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::predicate::{Condition, Literal, Pattern, Predicate};

pub const SALARY_FIELD: &str = "salaryRange";

static SALARY_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)-(\d+)\s*(yearly|monthly)?$").expect("salary shape regex is valid")
});

/// Stored-value shape used by the overlap arm.
const STORED_SHAPE: &str = r"^(\d+)-(\d+)\s*(yearly|monthly)?$";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SalaryPeriod {
    #[default]
    Yearly,
    Monthly,
}

impl SalaryPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for SalaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryRange {
    pub min: i64,
    pub max: i64,
    pub period: SalaryPeriod,
}

impl SalaryRange {
    /// Parse `"<min>-<max>[ yearly|monthly]"`. Returns `None` for any other
    /// shape and when `min > max`.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = raw.trim().to_lowercase();
        let caps = SALARY_SHAPE.captures(&cleaned)?;
        let min: i64 = caps.get(1)?.as_str().parse().ok()?;
        let max: i64 = caps.get(2)?.as_str().parse().ok()?;
        let period = match caps.get(3).map(|m| m.as_str()) {
            Some("monthly") => SalaryPeriod::Monthly,
            _ => SalaryPeriod::Yearly,
        };
        (min <= max).then_some(Self { min, max, period })
    }

    /// Same period and intersecting spans; touching bounds overlap.
    pub fn overlaps(&self, other: &SalaryRange) -> bool {
        self.period == other.period && self.min <= other.max && self.max >= other.min
    }
}

impl fmt::Display for SalaryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} {}", self.min, self.max, self.period)
    }
}

pub fn is_valid_salary_range(raw: &str) -> bool {
    SalaryRange::parse(raw).is_some()
}

/// Canonical `"min-max period"` form.
pub fn normalize_salary_range(raw: &str) -> Option<String> {
    SalaryRange::parse(raw).map(|r| r.to_string())
}

/// `false` when either side fails to parse.
pub fn salary_ranges_overlap(a: &str, b: &str) -> bool {
    match (SalaryRange::parse(a), SalaryRange::parse(b)) {
        (Some(a), Some(b)) => a.overlaps(&b),
        _ => false,
    }
}

/// Filter matching the literal value, the same span with any unit, or any
/// stored span that overlaps it. `None` when `raw` is not a valid range.
pub fn salary_range_filter(raw: &str) -> Option<Predicate> {
    let range = SalaryRange::parse(raw)?;
    let same_span = Pattern::new(format!(
        r"^{}-{}\s*(yearly|monthly)?$",
        range.min, range.max
    ));

    Some(Predicate::Or(vec![
        Predicate::field(SALARY_FIELD, Condition::Equals(Literal::Text(raw.to_string()))),
        Predicate::matches_pattern(SALARY_FIELD, same_span),
        Predicate::And(vec![
            Predicate::matches_pattern(SALARY_FIELD, Pattern::new(STORED_SHAPE)),
            Predicate::field(
                SALARY_FIELD,
                Condition::SpanOverlap {
                    min: range.min,
                    max: range.max,
                },
            ),
        ]),
    ]))
}
