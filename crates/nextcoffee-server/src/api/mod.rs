mod coffee_stores;
mod pages;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use nextcoffee_db::Datastore;
use nextcoffee_places::PlacesClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};
use crate::pages::StaticPages;

#[derive(Clone)]
pub struct AppState {
    pub datastore: Datastore,
    pub places: PlacesClient,
    pub pages: Arc<StaticPages>,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
    backend: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &nextcoffee_db::DbError) -> ApiError {
    tracing::error!(error = %error, "datastore operation failed");
    ApiError::new(request_id, "internal_error", "datastore operation failed")
}

pub(super) fn map_places_error(
    request_id: String,
    error: &nextcoffee_places::PlacesError,
) -> ApiError {
    tracing::error!(error = %error, "places lookup failed");
    ApiError::new(request_id, "upstream_error", error.to_string())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index_props))
        .route("/coffee-store/{id}", get(pages::coffee_store_props))
        .route("/api/health", get(health))
        .route(
            "/api/createCoffeeStore",
            post(coffee_stores::create_coffee_store),
        )
        .route(
            "/api/getCoffeeStoreById",
            get(coffee_stores::get_coffee_store_by_id),
        )
        .route(
            "/api/getCoffeeStoresByLocation",
            get(coffee_stores::get_coffee_stores_by_location),
        )
        .route(
            "/api/favouriteCoffeeStoreById",
            put(coffee_stores::favourite_coffee_store_by_id),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let backend = state.datastore.backend_name();

    match state.datastore.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                database: "ok",
                backend,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, request_id = %req_id.0, "health check: datastore unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    database: "unavailable",
                    backend,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
