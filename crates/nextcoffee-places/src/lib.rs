//! Client for the Foursquare Places search API, normalizing results into
//! [`nextcoffee_core::StoreRecord`]s.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use normalize::normalize_place;
pub use types::{Place, PlaceLocation, PlacePhoto, PlacesSearchResponse};
