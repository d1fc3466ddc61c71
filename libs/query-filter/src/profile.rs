//! Per-entity filter profiles.

use serde::Serialize;

use crate::compiler::FilterCompiler;

/// Which fields of an entity are searchable, transformed and filterable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterProfile {
    pub name: String,
    pub searchable_fields: Vec<String>,
    pub fields_to_transform: Vec<String>,
    /// Query keys forwarded into the filter input. Everything else is dropped.
    pub filterable_fields: Vec<String>,
    /// Listings ignore the requested page size and return every match.
    pub unpaged: bool,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

const JOB_FILTERS: &[&str] = &[
    "workMode",
    "jobType",
    "vendorInfo",
    "categoryInfo",
    "salaryRange",
    "experienceRange",
    "exp",
    "address",
    "location",
    "date",
    "dateRange",
    "postingDate",
    "deadline",
];

impl FilterProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            searchable_fields: Vec::new(),
            fields_to_transform: Vec::new(),
            filterable_fields: Vec::new(),
            unpaged: false,
        }
    }

    pub fn jobs() -> Self {
        let mut filterable = strings(JOB_FILTERS);
        filterable.extend(strings(&["department", "status", "isActive"]));
        Self {
            name: "jobs".into(),
            searchable_fields: strings(&[
                "postName",
                "description",
                "location",
                "vendorInfo",
                "categoryInfo",
                "salaryRange",
                "experienceRange",
            ]),
            fields_to_transform: strings(JOB_FILTERS),
            filterable_fields: filterable,
            unpaged: false,
        }
    }

    pub fn users() -> Self {
        Self {
            name: "users".into(),
            searchable_fields: strings(&["email", "phone", "userStatus", "paymentMethod"]),
            fields_to_transform: strings(&["postingDate"]),
            filterable_fields: strings(&[
                "email",
                "phone",
                "userStatus",
                "paymentMethod",
                "createdAt",
                "postingDate",
            ]),
            unpaged: false,
        }
    }

    pub fn departments() -> Self {
        Self {
            name: "departments".into(),
            searchable_fields: strings(&["departmentName", "tag", "description"]),
            fields_to_transform: Vec::new(),
            filterable_fields: strings(&["departmentName", "tag", "slug", "isActive"]),
            unpaged: false,
        }
    }

    pub fn categories() -> Self {
        Self {
            name: "categories".into(),
            searchable_fields: strings(&["categoryName", "description"]),
            fields_to_transform: strings(&["postingDate"]),
            filterable_fields: strings(&[
                "categoryName",
                "slug",
                "department",
                "isActive",
                "postingDate",
            ]),
            unpaged: true,
        }
    }

    pub fn builtins() -> Vec<Self> {
        vec![
            Self::jobs(),
            Self::users(),
            Self::departments(),
            Self::categories(),
        ]
    }

    /// Built-in profile by collection name (case-insensitive).
    pub fn builtin(name: &str) -> Option<Self> {
        Self::builtins()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_filterable(&self, key: &str) -> bool {
        self.filterable_fields.iter().any(|f| f == key)
    }

    pub fn compiler(&self) -> FilterCompiler {
        FilterCompiler::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve_by_name() {
        for name in ["jobs", "USERS", " departments ", "categories"] {
            assert!(FilterProfile::builtin(name).is_some(), "{name}");
        }
        assert!(FilterProfile::builtin("invoices").is_none());
    }

    #[test]
    fn filterable_is_exact() {
        let users = FilterProfile::users();
        assert!(users.is_filterable("userStatus"));
        assert!(!users.is_filterable("password"));
        assert!(!users.is_filterable("page"));
    }

    #[test]
    fn job_transforms_are_filterable() {
        let jobs = FilterProfile::jobs();
        for field in &jobs.fields_to_transform {
            assert!(jobs.is_filterable(field), "{field}");
        }
    }
}
