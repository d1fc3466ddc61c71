//! Listing handlers
//!
//! - GET /api/v1                       collection index
//! - GET /api/v1/{collection}          filtered, paged listing
//! - GET /api/v1/{collection}/_explain compiled query without executing it

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{state::AppState, Result};

pub async fn list_collections(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Collections retrieved successfully",
        "data": state.listing.describe(),
    }))
}

pub async fn list_collection(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(items): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse> {
    let listing = state.listing.list(&collection, &items).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{collection} retrieved successfully"),
        "meta": listing.meta,
        "data": listing.data,
    })))
}

pub async fn explain_collection(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(items): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse> {
    let document = state.listing.explain(&collection, &items)?;
    Ok(Json(document))
}
