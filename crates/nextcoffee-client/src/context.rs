//! Per-session store shared by the page controllers.
//!
//! The state is only ever changed through [`Action`]s; every completed
//! dispatch wakes the receivers returned by [`StoreContext::subscribe`].

use std::sync::Arc;

use nextcoffee_core::{Coordinates, StoreRecord};
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationState {
    coffee_stores: Vec<StoreRecord>,
    lat_long: Option<Coordinates>,
}

impl ApplicationState {
    #[must_use]
    pub fn coffee_stores(&self) -> &[StoreRecord] {
        &self.coffee_stores
    }

    #[must_use]
    pub fn lat_long(&self) -> Option<Coordinates> {
        self.lat_long
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetCoffeeStores(Vec<StoreRecord>),
    SetLatLong(Coordinates),
}

/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone)]
pub struct StoreContext {
    state: Arc<watch::Sender<ApplicationState>>,
}

impl Default for StoreContext {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreContext {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(ApplicationState::default());
        Self {
            state: Arc::new(state),
        }
    }

    pub fn dispatch(&self, action: Action) {
        self.state.send_modify(|state| match action {
            Action::SetCoffeeStores(stores) => {
                tracing::debug!(count = stores.len(), "SET_COFFEE_STORES");
                state.coffee_stores = stores;
            }
            Action::SetLatLong(coordinates) => {
                tracing::debug!(%coordinates, "SET_LAT_LONG");
                state.lat_long = Some(coordinates);
            }
        });
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ApplicationState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ApplicationState> {
        self.state.subscribe()
    }
}
