use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A latitude/longitude pair as reported by a location source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Renders the `"<lat>,<lng>"` form used by the `latLong` query parameter.
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordinatesError {
    #[error("expected \"<lat>,<lng>\", got \"{0}\"")]
    Malformed(String),

    #[error("coordinate component \"{0}\" is not a finite number")]
    NotFinite(String),
}

impl FromStr for Coordinates {
    type Err = CoordinatesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| CoordinatesError::Malformed(s.to_owned()))?;

        let parse = |part: &str| -> Result<f64, CoordinatesError> {
            let trimmed = part.trim();
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(CoordinatesError::NotFinite(trimmed.to_owned())),
            }
        };

        Ok(Self::new(parse(lat)?, parse(lng)?))
    }
}

/// A coffee shop as shown on listing cards and detail pages.
///
/// Every field falls back to its empty value when missing from a payload,
/// so partially-populated records from the places API or the datastore
/// always deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreRecord {
    /// Stable identifier assigned by the places API.
    pub id: String,
    pub name: String,
    pub address: String,
    pub neighbourhood: String,
    pub img_url: String,
    /// Distance from the searched coordinates, in metres.
    pub distance: f64,
    pub voting: i64,
}

impl StoreRecord {
    /// True when the record carries no identity, e.g. a page rendered for an
    /// unknown id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_display_uses_comma_pair() {
        assert_eq!(Coordinates::new(59.91, 10.75).to_string(), "59.91,10.75");
    }

    #[test]
    fn coordinates_parse_accepts_whitespace() {
        let parsed: Coordinates = " 59.91 , 10.75".parse().expect("parse");
        assert_eq!(parsed, Coordinates::new(59.91, 10.75));
    }

    #[test]
    fn coordinates_parse_rejects_missing_comma() {
        assert_eq!(
            "59.91".parse::<Coordinates>(),
            Err(CoordinatesError::Malformed("59.91".to_string()))
        );
    }

    #[test]
    fn coordinates_parse_rejects_non_numeric() {
        assert!(matches!(
            "north,10.75".parse::<Coordinates>(),
            Err(CoordinatesError::NotFinite(ref v)) if v == "north"
        ));
        assert!("NaN,1".parse::<Coordinates>().is_err());
    }

    #[test]
    fn store_record_uses_camel_case_and_defaults() {
        let record: StoreRecord =
            serde_json::from_str(r#"{"id":"abc","name":"Fuglen","imgUrl":"https://img"}"#)
                .expect("deserialize");
        assert_eq!(record.id, "abc");
        assert_eq!(record.img_url, "https://img");
        assert_eq!(record.address, "");
        assert_eq!(record.neighbourhood, "");
        assert!(record.distance.abs() < f64::EPSILON);
        assert_eq!(record.voting, 0);

        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["imgUrl"], "https://img");
        assert!(json.get("img_url").is_none());
    }

    #[test]
    fn empty_object_is_an_empty_record() {
        let record: StoreRecord = serde_json::from_str("{}").expect("deserialize");
        assert!(record.is_empty());
    }
}
