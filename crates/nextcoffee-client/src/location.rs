//! Single-shot geolocation behind the [`LocationSource`] trait.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use nextcoffee_core::Coordinates;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::context::{Action, StoreContext};

pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by your browser";
pub const UNAVAILABLE_MESSAGE: &str = "Unable to retrieve your location";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("geolocation is not supported")]
    Unsupported,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

impl LocationError {
    /// Message shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unsupported => UNSUPPORTED_MESSAGE,
            Self::PermissionDenied | Self::Unavailable(_) => UNAVAILABLE_MESSAGE,
        }
    }
}

/// Something that can report the current position once per call.
pub trait LocationSource: Send + Sync {
    fn current_position(&self) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

/// A position known up front, e.g. from a `--lat-long` argument.
#[derive(Debug, Clone, PartialEq)]
pub enum FixedLocation {
    Position(Coordinates),
    Denied,
    Unsupported,
}

impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        match self {
            Self::Position(coordinates) => Ok(*coordinates),
            Self::Denied => Err(LocationError::PermissionDenied),
            Self::Unsupported => Err(LocationError::Unsupported),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IpLookup {
    #[serde(default)]
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    message: String,
}

/// Approximate position from an ip-api.com style lookup.
#[derive(Debug, Clone)]
pub struct IpLocation {
    client: Client,
    url: String,
}

impl IpLocation {
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be built.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }
}

impl LocationSource for IpLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LocationError::Unavailable(format!(
                "lookup returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let lookup: IpLookup = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        match (lookup.status.as_str(), lookup.lat, lookup.lon) {
            ("success", Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Ok(Coordinates::new(lat, lon))
            }
            ("success", _, _) => Err(LocationError::Unavailable(
                "lookup returned no coordinates".to_owned(),
            )),
            _ => Err(LocationError::Unavailable(lookup.message)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    Located(Coordinates),
    Failed(LocationError),
    /// Another `track` call is still waiting on the source.
    AlreadyInFlight,
}

#[derive(Debug, Default)]
struct TrackerState {
    in_flight: bool,
    error_message: String,
}

/// Runs a [`LocationSource`] and publishes the result to a [`StoreContext`].
#[derive(Debug)]
pub struct LocationTracker<S> {
    source: S,
    state: Mutex<TrackerState>,
}

/// Clears the in-flight flag even if the `track` future is dropped.
struct InFlight<'a> {
    state: &'a Mutex<TrackerState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.state).in_flight = false;
    }
}

fn lock(state: &Mutex<TrackerState>) -> MutexGuard<'_, TrackerState> {
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl<S: LocationSource> LocationTracker<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(TrackerState::default()),
        }
    }

    /// Ask the source for a position once. Success dispatches `SetLatLong`
    /// and clears the error; failure records a message and leaves the
    /// coordinates alone.
    pub async fn track(&self, ctx: &StoreContext) -> TrackOutcome {
        let _guard = {
            let mut state = lock(&self.state);
            if state.in_flight {
                return TrackOutcome::AlreadyInFlight;
            }
            state.in_flight = true;
            InFlight { state: &self.state }
        };

        match self.source.current_position().await {
            Ok(coordinates) => {
                lock(&self.state).error_message.clear();
                ctx.dispatch(Action::SetLatLong(coordinates));
                TrackOutcome::Located(coordinates)
            }
            Err(e) => {
                tracing::warn!(error = %e, "location lookup failed");
                lock(&self.state).error_message = e.user_message().to_owned();
                TrackOutcome::Failed(e)
            }
        }
    }

    #[must_use]
    pub fn is_finding_location(&self) -> bool {
        lock(&self.state).in_flight
    }

    /// Empty when the last attempt succeeded or none has run.
    #[must_use]
    pub fn error_message(&self) -> String {
        lock(&self.state).error_message.clone()
    }
}
