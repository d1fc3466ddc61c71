//! Field dispatch: which builder handles a given filter key.

use crate::dates::{self, Clock, DATE_RANGE_FIELD, POSTING_DATE_FIELD};
use crate::experience::experience_filter;
use crate::input::FilterValue;
use crate::patterns::{self, per_value};
use crate::predicate::Predicate;
use crate::salary::salary_range_filter;
use crate::{Error, Result};

/// Case-insensitive set of field names that get non-default handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRules {
    names: Vec<String>,
}

impl FieldRules {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let lower = name.as_ref().trim().to_lowercase();
            if !lower.is_empty() && !out.contains(&lower) {
                out.push(lower);
            }
        }
        Self { names: out }
    }

    pub fn contains(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.names.iter().any(|n| *n == key)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Recognised filter kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Any-of exact match on the literal key.
    Generic,
    /// `workMode`, `jobType`: any-of exact match, scalars wrapped as lists.
    AnyOf,
    /// `vendorInfo`: any-of on `vendorInfo.companyType`.
    VendorCompanyType,
    Category,
    Salary,
    Experience,
    Address,
    Location,
    Date,
    DateRange,
    PostingDate,
    Deadline,
}

impl FilterKind {
    /// Total mapping from a key to its kind. Keys outside `rules` are always
    /// [`FilterKind::Generic`].
    pub fn resolve(key: &str, rules: &FieldRules) -> Self {
        if !rules.contains(key) {
            return Self::Generic;
        }
        Self::from_key(key)
    }

    fn from_key(key: &str) -> Self {
        match key.to_lowercase().as_str() {
            "workmode" | "jobtype" => Self::AnyOf,
            "vendorinfo" => Self::VendorCompanyType,
            "categoryinfo" => Self::Category,
            "salaryrange" => Self::Salary,
            "experiencerange" | "exp" => Self::Experience,
            "address" => Self::Address,
            "location" => Self::Location,
            "date" => Self::Date,
            "daterange" => Self::DateRange,
            "postingdate" => Self::PostingDate,
            "deadline" => Self::Deadline,
            _ => Self::Generic,
        }
    }

    /// Build the sub-predicate for one filter entry.
    ///
    /// `Ok(None)` means the entry contributes nothing (blank value, invalid
    /// salary range, `postingDate=all`).
    pub fn build(self, key: &str, value: &FilterValue, clock: &Clock) -> Result<Option<Predicate>> {
        if !value.is_truthy() {
            return Ok(None);
        }
        let predicate = match self {
            Self::Generic => Some(Predicate::field(key, patterns::any_of(value))),
            Self::AnyOf => Some(Predicate::field(key, patterns::any_of_list(value))),
            Self::VendorCompanyType => Some(Predicate::field(
                "vendorInfo.companyType",
                patterns::any_of(value),
            )),
            Self::Category => per_value(value, |v| Some(patterns::category(v))),
            Self::Salary => per_value(value, salary_range_filter),
            Self::Experience => per_value(value, experience_filter),
            Self::Address => per_value(value, |v| Some(patterns::address(v))),
            Self::Location => per_value(value, |v| Some(patterns::contains("location", v))),
            Self::Date => {
                let raw = single(key, value)?;
                Some(dates::single_day_window(raw)?.to_predicate(key))
            }
            Self::DateRange => {
                let raw = single(key, value)?;
                Some(dates::two_date_window(raw, clock)?.to_predicate(DATE_RANGE_FIELD))
            }
            Self::PostingDate => {
                let raw = single(key, value)?;
                dates::posting_date_window(key, raw, clock)?
                    .map(|w| w.to_predicate(POSTING_DATE_FIELD))
            }
            Self::Deadline => {
                let raw = single(key, value)?;
                Some(dates::deadline_window(key, raw, clock)?.to_predicate(key))
            }
        };
        Ok(predicate)
    }
}

fn single<'a>(key: &str, value: &'a FilterValue) -> Result<&'a str> {
    value
        .single()
        .ok_or_else(|| Error::MalformedInput(format!("filter '{key}' expects a single value")))
}
