//! Listing API routes, nested under `/api/v1`.

use crate::api::handlers::listing;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn listing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(listing::list_collections))
        .route("/:collection", get(listing::list_collection))
        .route("/:collection/_explain", get(listing::explain_collection))
}
