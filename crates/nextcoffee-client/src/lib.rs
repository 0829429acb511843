//! Session-side logic for nextcoffee: location lookup, the per-session store,
//! and the listing and detail page controllers that talk to the server.

pub mod api;
pub mod context;
pub mod detail;
pub mod error;
pub mod listing;
pub mod location;
pub mod poll;
pub mod view;

pub use api::{ApiClient, IndexProps};
pub use context::{Action, ApplicationState, StoreContext};
pub use detail::{resolve_record, DetailController, Resolution};
pub use error::ClientError;
pub use listing::ListingController;
pub use location::{
    FixedLocation, IpLocation, LocationError, LocationSource, LocationTracker, TrackOutcome,
};
pub use poll::{PollLoop, SequenceGate};
pub use view::{Card, CardSection, DetailView, ListingView};
