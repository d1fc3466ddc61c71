//! Experience filters.
//!
//! Stored experience is free text ("4 years", "2-4 yrs", "4+ years",
//! "Fresher", ...) held under either `experienceInRange` or the older
//! `experience` field, so every filter is an OR across both.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::keyword;
use crate::predicate::{Condition, Literal, Pattern, Predicate};

pub const EXPERIENCE_FIELDS: [&str; 2] = ["experienceInRange", "experience"];

/// Optional unit suffix on stored values.
const UNIT: &str = r"(?:years?|yrs?|yr|y)?";

static FRESHER_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:0\s*(?:years?|yrs?|yr|y)?|0\s*-\s*0|fresh(?:er|ers?)?|entry[\s-]?level|no[\s-]?experience(?:\s*required)?)$",
    )
    .expect("fresher regex is valid")
});

static RANGE_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*-\s*(\d+)\s*(?:years?|yrs?|yr|y)?$").expect("range regex is valid")
});

static YEARS_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*\+?\s*(?:years?|yrs?|yr|y)?$").expect("years regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperienceQuery {
    Fresher,
    Range { min: u32, max: u32 },
    Years(u32),
    Text(String),
}

impl ExperienceQuery {
    /// Classify a raw filter value. `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let kw = keyword(trimmed);

        if FRESHER_INPUT.is_match(&kw) {
            return Some(Self::Fresher);
        }
        if let Some(caps) = RANGE_INPUT.captures(&kw) {
            if let (Ok(a), Ok(b)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
                return Some(Self::Range {
                    min: a.min(b),
                    max: a.max(b),
                });
            }
        }
        if let Some(caps) = YEARS_INPUT.captures(&kw) {
            if let Ok(n) = caps[1].parse::<u32>() {
                return Some(Self::Years(n));
            }
        }
        Some(Self::Text(trimmed.to_string()))
    }

    pub fn to_predicate(&self) -> Predicate {
        match self {
            Self::Fresher => per_field_group(|field| {
                let mut arms: Vec<Predicate> = fresher_patterns()
                    .into_iter()
                    .map(|p| Predicate::matches_pattern(field, p))
                    .collect();
                arms.push(Predicate::field(
                    field,
                    Condition::Equals(Literal::Text(String::new())),
                ));
                Predicate::Or(arms)
            }),
            Self::Range { min, max } => {
                let pattern = Pattern::new(format!(
                    r"^({min}|{max}|{min}-{max}|{max}-{min})\s*{UNIT}$"
                ));
                per_field_group(|field| Predicate::matches_pattern(field, pattern.clone()))
            }
            Self::Years(n) => per_field_group(|field| {
                Predicate::Or(
                    years_patterns(*n)
                        .into_iter()
                        .map(|p| Predicate::matches_pattern(field, p))
                        .collect(),
                )
            }),
            Self::Text(text) => {
                per_field_group(|field| Predicate::matches_pattern(field, Pattern::contains(text)))
            }
        }
    }
}

/// Experience filter for a raw value; `None` for blank input.
pub fn experience_filter(raw: &str) -> Option<Predicate> {
    ExperienceQuery::parse(raw).map(|q| q.to_predicate())
}

fn per_field_group<F>(build: F) -> Predicate
where
    F: Fn(&'static str) -> Predicate,
{
    Predicate::Or(EXPERIENCE_FIELDS.iter().map(|f| build(*f)).collect())
}

fn fresher_patterns() -> Vec<Pattern> {
    vec![
        Pattern::new(format!(r"^0\s*{UNIT}$")),
        Pattern::new(r"^fresh(?:er|ers?)?$"),
        Pattern::new(r"^entry[\s-]?level$"),
        Pattern::new(r"^no[\s-]?experience(?:\s*required)?$"),
        Pattern::new(format!(r"^0-\d+\s*{UNIT}$")),
    ]
}

fn years_patterns(n: u32) -> Vec<Pattern> {
    vec![
        // "4 years", "4yrs"
        Pattern::new(format!(r"^{n}\s*{UNIT}$")),
        // "4-6 years"
        Pattern::new(format!(r"^{n}-\d+\s*{UNIT}$")),
        // "2-4 years"
        Pattern::new(format!(r"^\d+-{n}\s*{UNIT}$")),
        // "4+ years"
        Pattern::new(format!(r"^{n}\+\s*{UNIT}$")),
    ]
}
