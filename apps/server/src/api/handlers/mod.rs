//! Request handlers for API endpoints

pub mod listing;

pub use listing::*;
