use nextcoffee_core::StoreRecord;

use crate::api::ApiClient;
use crate::context::{Action, StoreContext};
use crate::location::{LocationSource, LocationTracker, TrackOutcome};
use crate::view::ListingView;

/// Controller for the index page.
#[derive(Debug)]
pub struct ListingController<S> {
    api: ApiClient,
    ctx: StoreContext,
    tracker: LocationTracker<S>,
    nearby_limit: u32,
    city: String,
    city_stores: Vec<StoreRecord>,
    store_error: String,
}

impl<S: LocationSource> ListingController<S> {
    pub fn new(api: ApiClient, ctx: StoreContext, source: S, nearby_limit: u32) -> Self {
        Self {
            api,
            ctx,
            tracker: LocationTracker::new(source),
            nearby_limit,
            city: String::new(),
            city_stores: Vec::new(),
            store_error: String::new(),
        }
    }

    /// Load the fixed city's page props, then nearby stores if the session
    /// already knows where the user is.
    pub async fn mount(&mut self) {
        match self.api.index_props().await {
            Ok(props) => {
                self.city = props.city;
                self.city_stores = props.coffee_stores;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load index page props");
                self.store_error = e.to_string();
            }
        }

        if self.ctx.state().lat_long().is_some() {
            self.load_nearby().await;
        }
    }

    /// Locate the user; a new position triggers a nearby fetch.
    pub async fn find_my_cafe(&mut self) -> TrackOutcome {
        let outcome = self.tracker.track(&self.ctx).await;
        if matches!(outcome, TrackOutcome::Located(_)) {
            self.load_nearby().await;
        }
        outcome
    }

    /// Fetch stores around the session's coordinates into the context.
    /// Does nothing until coordinates are known.
    pub async fn load_nearby(&mut self) {
        let Some(lat_long) = self.ctx.state().lat_long() else {
            return;
        };

        match self.api.stores_by_location(lat_long, self.nearby_limit).await {
            Ok(stores) => {
                tracing::info!(count = stores.len(), %lat_long, "nearby coffee stores loaded");
                self.ctx.dispatch(Action::SetCoffeeStores(stores));
                self.store_error.clear();
            }
            Err(e) => {
                tracing::warn!(error = %e, %lat_long, "failed to load nearby coffee stores");
                self.store_error = e.to_string();
            }
        }
    }

    #[must_use]
    pub fn context(&self) -> &StoreContext {
        &self.ctx
    }

    #[must_use]
    pub fn view(&self) -> ListingView {
        let state = self.ctx.state();
        ListingView::build(
            self.tracker.is_finding_location(),
            &self.tracker.error_message(),
            &self.store_error,
            state.coffee_stores(),
            &self.city,
            &self.city_stores,
        )
    }
}
