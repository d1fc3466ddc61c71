//! Listing query compiler for the hireboard API.
//!
//! Turns loosely typed listing parameters into a structured predicate that a
//! document store can execute:
//! - Free-text search across an entity's searchable fields
//! - Per-field filters with special handling for salary, experience, dates,
//!   categories and locations
//! - Pagination and sorting with bounded defaults
//!
//! The compiler is pure: it performs no I/O and keeps no shared state, so it
//! can be called concurrently from any number of request handlers.

#![forbid(unsafe_code)]

mod compiler;
pub mod dates;
mod dispatch;
mod error;
pub mod evaluate;
pub mod experience;
mod input;
mod normalize;
pub mod paging;
pub mod patterns;
mod predicate;
mod profile;
pub mod salary;
mod search;

pub use compiler::{CompiledQuery, Composition, FilterCompiler};
pub use dates::{Clock, DateWindow};
pub use dispatch::{FieldRules, FilterKind};
pub use error::{Error, Result};
pub use evaluate::Matcher;
pub use input::{FilterInput, FilterValue};
pub use normalize::{normalize_value, Joiner};
pub use paging::{Limit, Page, PageRequest, PagingDefaults, SortOrder, SortSpec};
pub use predicate::{Bound, Condition, FieldPredicate, Literal, Pattern, Predicate, Range};
pub use profile::FilterProfile;
pub use search::{search_arms, split_terms};
