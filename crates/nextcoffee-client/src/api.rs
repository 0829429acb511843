//! Typed access to the nextcoffee server: page props and the four API routes.

use std::time::Duration;

use nextcoffee_core::{Coordinates, StoreRecord};
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::ClientError;

const USER_AGENT: &str = concat!("nextcoffee-client/", env!("CARGO_PKG_VERSION"));

/// Props for the index page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexProps {
    pub city: String,
    pub coffee_stores: Vec<StoreRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoffeeStoreProps {
    #[serde(default)]
    coffee_store: StoreRecord,
}

#[derive(Debug, Serialize)]
struct FavouriteBody<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Network`] if the HTTP client cannot be built,
    /// or [`ClientError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// `GET /`: the fixed city's name and stores.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or decode failure.
    pub async fn index_props(&self) -> Result<IndexProps, ClientError> {
        let request = self.client.get(self.url("")?);
        self.send_json(request, "index props").await
    }

    /// `GET /coffee-store/{id}`: `None` when the page props are `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or decode failure.
    pub async fn coffee_store_props(&self, id: &str) -> Result<Option<StoreRecord>, ClientError> {
        let mut url = self.url("coffee-store")?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "cannot be a base".to_owned(),
            })?
            .push(id);

        let props: CoffeeStoreProps = self
            .send_json(self.client.get(url), "coffee store props")
            .await?;
        Ok(Some(props.coffee_store).filter(|s| !s.is_empty()))
    }

    /// `GET /api/getCoffeeStoresByLocation`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or decode failure.
    pub async fn stores_by_location(
        &self,
        coordinates: Coordinates,
        limit: u32,
    ) -> Result<Vec<StoreRecord>, ClientError> {
        let request = self
            .client
            .get(self.url("api/getCoffeeStoresByLocation")?)
            .query(&[
                ("latLong", coordinates.to_string()),
                ("limit", limit.to_string()),
            ]);
        self.send_json(request, "stores by location").await
    }

    /// `POST /api/createCoffeeStore`: returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or decode failure.
    pub async fn create_coffee_store(&self, store: &StoreRecord) -> Result<StoreRecord, ClientError> {
        let request = self
            .client
            .post(self.url("api/createCoffeeStore")?)
            .json(store);
        self.send_json(request, "create coffee store").await
    }

    /// `GET /api/getCoffeeStoreById`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or decode failure.
    pub async fn coffee_store_by_id(&self, id: &str) -> Result<Option<StoreRecord>, ClientError> {
        let request = self
            .client
            .get(self.url("api/getCoffeeStoreById")?)
            .query(&[("id", id)]);
        let rows: Vec<StoreRecord> = self.send_json(request, "coffee store by id").await?;
        Ok(rows.into_iter().next())
    }

    /// `PUT /api/favouriteCoffeeStoreById`: `None` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport, status, or decode failure.
    pub async fn favourite_coffee_store(&self, id: &str) -> Result<Option<StoreRecord>, ClientError> {
        let request = self
            .client
            .put(self.url("api/favouriteCoffeeStoreById")?)
            .json(&FavouriteBody { id });
        let rows: Vec<StoreRecord> = self.send_json(request, "favourite coffee store").await?;
        Ok(rows.into_iter().next())
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_owned());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
