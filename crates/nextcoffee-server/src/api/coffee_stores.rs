//! Coffee store API handlers.
//!
//! - `POST /api/createCoffeeStore`        : insert-if-absent, echoes the stored record
//! - `GET  /api/getCoffeeStoreById`       : `[record]` or `[]`
//! - `GET  /api/getCoffeeStoresByLocation`: places search around `latLong`
//! - `PUT  /api/favouriteCoffeeStoreById` : `[updated]` or `[]`

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use nextcoffee_core::{Coordinates, StoreRecord};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, map_places_error, ApiError, AppState};

const DEFAULT_NEARBY_LIMIT: u32 = 31;
const MAX_NEARBY_LIMIT: u32 = 50;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LocationQuery {
    #[serde(rename = "latLong")]
    pub lat_long: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FavouriteRequest {
    #[serde(default)]
    pub id: String,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn require_id(req_id: &str, id: Option<&str>) -> Result<String, ApiError> {
    match id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_owned()),
        _ => Err(ApiError::new(req_id, "validation_error", "id is required")),
    }
}

pub(super) fn normalize_nearby_limit(limit: Option<i64>) -> u32 {
    let clamped = limit
        .unwrap_or(i64::from(DEFAULT_NEARBY_LIMIT))
        .clamp(1, i64::from(MAX_NEARBY_LIMIT));
    u32::try_from(clamped).unwrap_or(DEFAULT_NEARBY_LIMIT)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/createCoffeeStore: store a coffee shop the first time it is viewed.
///
/// Returns 201 with the new record, or 200 with the record already stored.
/// The incoming `voting` is ignored: new records always start at zero.
pub(super) async fn create_coffee_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(mut body): Json<StoreRecord>,
) -> Result<(StatusCode, Json<StoreRecord>), ApiError> {
    let rid = &req_id.0;
    body.id = require_id(rid, Some(&body.id))?;

    if let Some(existing) = state
        .datastore
        .get_by_id(&body.id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?
    {
        return Ok((StatusCode::OK, Json(existing)));
    }

    body.name = body.name.trim().to_owned();
    if body.name.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "name is required to create a coffee store",
        ));
    }

    let stored = state
        .datastore
        .upsert(&body)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(id = %stored.id, name = %stored.name, "coffee store created");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/getCoffeeStoreById?id=: zero or one stored record.
pub(super) async fn get_coffee_store_by_id(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Vec<StoreRecord>>, ApiError> {
    let rid = &req_id.0;
    let id = require_id(rid, query.id.as_deref())?;

    let found = state
        .datastore
        .get_by_id(&id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(found.into_iter().collect()))
}

/// GET /api/getCoffeeStoresByLocation?latLong=&limit=: nearby coffee shops.
pub(super) async fn get_coffee_stores_by_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<StoreRecord>>, ApiError> {
    let rid = &req_id.0;

    let raw = query.lat_long.unwrap_or_default();
    let coordinates: Coordinates = raw
        .parse()
        .map_err(|e| ApiError::new(rid, "validation_error", format!("latLong: {e}")))?;
    let limit = normalize_nearby_limit(query.limit);

    let stores = state
        .places
        .search(coordinates, limit)
        .await
        .map_err(|e| map_places_error(rid.clone(), &e))?;

    Ok(Json(stores))
}

/// PUT /api/favouriteCoffeeStoreById: add one vote.
pub(super) async fn favourite_coffee_store_by_id(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<FavouriteRequest>,
) -> Result<Json<Vec<StoreRecord>>, ApiError> {
    let rid = &req_id.0;
    let id = require_id(rid, Some(&body.id))?;

    let updated = state
        .datastore
        .increment_vote(&id)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    match &updated {
        Some(store) => tracing::info!(id = %store.id, voting = store.voting, "coffee store favourited"),
        None => tracing::debug!(id = %id, "favourite for unknown coffee store ignored"),
    }

    Ok(Json(updated.into_iter().collect()))
}
