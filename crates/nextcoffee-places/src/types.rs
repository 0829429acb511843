//! Raw response shapes from the places search endpoint.
//!
//! Every field is optional or defaulted: the API omits fields freely
//! depending on the `fields` parameter and the data it has for a venue.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacesSearchResponse {
    #[serde(default)]
    pub results: Vec<Place>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub fsq_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: PlaceLocation,
    /// Metres from the searched `ll`.
    pub distance: Option<f64>,
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceLocation {
    pub address: Option<String>,
    pub formatted_address: Option<String>,
    pub locality: Option<String>,
    #[serde(default)]
    pub neighborhood: Vec<String>,
}

/// Photo URLs are split around a size segment: `prefix + size + suffix`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacePhoto {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
}
