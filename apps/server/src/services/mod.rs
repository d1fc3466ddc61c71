//! Service layer

pub mod listing;

pub use listing::{Listing, ListingMeta, ListingParams, ListingService};
