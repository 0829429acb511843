//! Pre-rendered page props for `/` and `/coffee-store/{id}`.
//!
//! The fixed city's stores are fetched once at startup and every id in that
//! list gets its detail props up front. Ids outside the list fall back to
//! on-demand rendering: the city list is fetched again and the outcome for
//! that id is cached, found or not, so each id costs at most one upstream
//! search.

use std::collections::HashMap;

use nextcoffee_core::{StaticCity, StoreRecord};
use nextcoffee_places::{PlacesClient, PlacesError};
use tokio::sync::RwLock;

#[derive(Debug)]
pub struct StaticPages {
    city: StaticCity,
    index: RwLock<Option<Vec<StoreRecord>>>,
    /// `None` marks an id the city list did not contain.
    details: RwLock<HashMap<String, Option<StoreRecord>>>,
}

impl StaticPages {
    #[must_use]
    pub fn new(city: StaticCity) -> Self {
        Self {
            city,
            index: RwLock::new(None),
            details: RwLock::new(HashMap::new()),
        }
    }

    pub fn city_name(&self) -> &str {
        &self.city.name
    }

    /// Fetch the city list and render the index plus one detail page per id.
    ///
    /// Returns the number of detail pages rendered.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the city search fails; existing pages are
    /// kept in that case.
    pub async fn prerender(&self, places: &PlacesClient) -> Result<usize, PlacesError> {
        let stores = places.search_city(&self.city).await?;
        let rendered = self.remember(&stores).await;
        *self.index.write().await = Some(stores);
        Ok(rendered)
    }

    /// Props for the index page, rendering them first if startup could not.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if nothing is cached and the city search fails.
    pub async fn index(&self, places: &PlacesClient) -> Result<Vec<StoreRecord>, PlacesError> {
        if let Some(stores) = self.index.read().await.as_ref() {
            return Ok(stores.clone());
        }
        self.prerender(places).await?;
        Ok(self.index.read().await.clone().unwrap_or_default())
    }

    /// Props for a detail page; `None` when the city list has no such id.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if the id is not cached and the fallback city
    /// search fails.
    pub async fn coffee_store(
        &self,
        places: &PlacesClient,
        id: &str,
    ) -> Result<Option<StoreRecord>, PlacesError> {
        if let Some(page) = self.details.read().await.get(id) {
            return Ok(page.clone());
        }

        tracing::debug!(id, "rendering coffee store page on demand");
        let stores = places.search_city(&self.city).await?;
        let found = stores.iter().find(|s| s.id == id).cloned();
        self.remember(&stores).await;
        if found.is_none() {
            self.details.write().await.entry(id.to_owned()).or_insert(None);
        }
        Ok(found)
    }

    async fn remember(&self, stores: &[StoreRecord]) -> usize {
        let mut details = self.details.write().await;
        for store in stores.iter().filter(|s| !s.is_empty()) {
            details.insert(store.id.clone(), Some(store.clone()));
        }
        details.values().filter(|page| page.is_some()).count()
    }
}
