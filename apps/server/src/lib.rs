//! Hireboard listing server
//!
//! A read-only listing API over job-board collections with:
//! - Free-text search and per-field filters compiled by `hireboard-filter`
//! - Bounded pagination and sorting
//! - A pluggable query executor (in-memory store included)

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
