//! HTTP client for the Foursquare Places search endpoint.
//!
//! Wraps `reqwest` with API key handling, typed status errors, and
//! normalization into [`StoreRecord`]s. No retries; a failed search goes
//! straight back to the caller.

use std::time::Duration;

use nextcoffee_core::{Coordinates, StaticCity, StoreRecord};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::normalize::normalize_place;
use crate::types::PlacesSearchResponse;

const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v3/";
const SEARCH_QUERY: &str = "coffee";
const SEARCH_FIELDS: &str = "fsq_id,name,location,distance,photos";

/// Client for the places search API.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Creates a client pointed at the production places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`PlacesError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends to the versioned path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Searches for coffee shops around `coordinates`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::UnexpectedStatus`] on any non-2xx status.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search(
        &self,
        coordinates: Coordinates,
        limit: u32,
    ) -> Result<Vec<StoreRecord>, PlacesError> {
        let url = self.search_url(coordinates, limit)?;
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %coordinates, "places search failed");
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact(&url),
            });
        }

        let body = response.text().await?;
        let parsed: PlacesSearchResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("places search (ll={coordinates}, limit={limit})"),
                source: e,
            })?;

        let stores: Vec<StoreRecord> = parsed.results.into_iter().map(normalize_place).collect();
        tracing::debug!(count = stores.len(), %coordinates, "places search complete");
        Ok(stores)
    }

    /// Searches the fixed city used for first-paint content.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::search`].
    pub async fn search_city(&self, city: &StaticCity) -> Result<Vec<StoreRecord>, PlacesError> {
        self.search(city.coordinates, city.limit).await
    }

    fn search_url(&self, coordinates: Coordinates, limit: u32) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join("places/search")
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("query", SEARCH_QUERY)
            .append_pair("ll", &coordinates.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", SEARCH_FIELDS);
        Ok(url)
    }
}

/// The API key travels in a header, so the URL is safe to report as-is;
/// only the query string is dropped to keep error messages short.
fn redact(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
