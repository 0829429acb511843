//! Page props for the two navigable routes.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use nextcoffee_core::StoreRecord;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_places_error, ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IndexProps {
    pub city: String,
    pub coffee_stores: Vec<StoreRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CoffeeStoreProps {
    /// `{}` for ids the city list does not know about.
    pub coffee_store: serde_json::Value,
}

/// GET /: the fixed city's coffee shops.
pub(super) async fn index_props(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<IndexProps>, ApiError> {
    let coffee_stores = state
        .pages
        .index(&state.places)
        .await
        .map_err(|e| map_places_error(req_id.0, &e))?;

    Ok(Json(IndexProps {
        city: state.pages.city_name().to_owned(),
        coffee_stores,
    }))
}

/// GET /coffee-store/{id}: navigation-time data for a detail page.
pub(super) async fn coffee_store_props(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<CoffeeStoreProps>, ApiError> {
    let found = state
        .pages
        .coffee_store(&state.places, &id)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    let coffee_store = match found {
        Some(store) => serde_json::to_value(store).map_err(|e| {
            tracing::error!(error = %e, "failed to serialize page props");
            ApiError::new(req_id.0, "internal_error", "failed to render page")
        })?,
        None => serde_json::json!({}),
    };

    Ok(Json(CoffeeStoreProps { coffee_store }))
}
