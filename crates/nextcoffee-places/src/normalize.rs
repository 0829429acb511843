use nextcoffee_core::StoreRecord;

use crate::types::{Place, PlacePhoto};

/// Size segment requested for card and detail images.
const PHOTO_SIZE: &str = "original";

/// Convert a raw place into a [`StoreRecord`].
///
/// Missing text fields become empty strings and a missing distance becomes
/// zero. Negative distances are clamped to zero. `voting` always starts at
/// zero; vote counts only ever come from the datastore.
#[must_use]
pub fn normalize_place(place: Place) -> StoreRecord {
    let location = place.location;

    let address = location
        .address
        .or(location.formatted_address)
        .unwrap_or_default();

    let neighbourhood = location
        .neighborhood
        .into_iter()
        .find(|n| !n.trim().is_empty())
        .or(location.locality)
        .unwrap_or_default();

    let img_url = place.photos.first().map(photo_url).unwrap_or_default();

    StoreRecord {
        id: place.fsq_id,
        name: place.name,
        address,
        neighbourhood,
        img_url,
        distance: place.distance.unwrap_or(0.0).max(0.0),
        voting: 0,
    }
}

fn photo_url(photo: &PlacePhoto) -> String {
    if photo.prefix.is_empty() {
        return String::new();
    }
    format!("{}{PHOTO_SIZE}{}", photo.prefix, photo.suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaceLocation;

    fn place() -> Place {
        Place {
            fsq_id: "4b0588f1f964a520b6d922e3".to_string(),
            name: "Tim Wendelboe".to_string(),
            location: PlaceLocation {
                address: Some("Grüners gate 1".to_string()),
                formatted_address: Some("Grüners gate 1, 0552 Oslo".to_string()),
                locality: Some("Oslo".to_string()),
                neighborhood: vec!["Grünerløkka".to_string()],
            },
            distance: Some(812.0),
            photos: vec![PlacePhoto {
                prefix: "https://fastly.4sqi.net/img/general/".to_string(),
                suffix: "/123_abc.jpg".to_string(),
            }],
        }
    }

    #[test]
    fn maps_all_fields() {
        let record = normalize_place(place());
        assert_eq!(record.id, "4b0588f1f964a520b6d922e3");
        assert_eq!(record.name, "Tim Wendelboe");
        assert_eq!(record.address, "Grüners gate 1");
        assert_eq!(record.neighbourhood, "Grünerløkka");
        assert_eq!(
            record.img_url,
            "https://fastly.4sqi.net/img/general/original/123_abc.jpg"
        );
        assert!((record.distance - 812.0).abs() < f64::EPSILON);
        assert_eq!(record.voting, 0);
    }

    #[test]
    fn falls_back_to_formatted_address_and_locality() {
        let mut p = place();
        p.location.address = None;
        p.location.neighborhood.clear();
        let record = normalize_place(p);
        assert_eq!(record.address, "Grüners gate 1, 0552 Oslo");
        assert_eq!(record.neighbourhood, "Oslo");
    }

    #[test]
    fn absent_fields_default_to_empty() {
        let record = normalize_place(Place::default());
        assert_eq!(record, StoreRecord::default());
    }

    #[test]
    fn negative_distance_is_clamped() {
        let mut p = place();
        p.distance = Some(-3.0);
        assert!(normalize_place(p).distance.abs() < f64::EPSILON);
    }
}
