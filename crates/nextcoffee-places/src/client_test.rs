use super::*;

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, "nextcoffee-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[test]
fn search_url_appends_to_versioned_path() {
    let client = test_client("https://api.foursquare.com/v3");
    let url = client
        .search_url(Coordinates::new(59.91, 10.75), 31)
        .expect("url");
    assert_eq!(
        url.as_str(),
        "https://api.foursquare.com/v3/places/search?query=coffee&ll=59.91%2C10.75&limit=31&fields=fsq_id%2Cname%2Clocation%2Cdistance%2Cphotos"
    );
}

#[test]
fn search_url_tolerates_trailing_slash() {
    let with = test_client("https://api.foursquare.com/v3/");
    let without = test_client("https://api.foursquare.com/v3");
    let coords = Coordinates::new(1.0, 2.0);
    assert_eq!(
        with.search_url(coords, 1).expect("url"),
        without.search_url(coords, 1).expect("url")
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = PlacesClient::with_base_url("k", 30, "ua", "not a url");
    assert!(matches!(result, Err(PlacesError::InvalidBaseUrl { .. })));
}

#[test]
fn redact_drops_query() {
    let url = Url::parse("https://api.example.com/v3/places/search?ll=1,2").expect("url");
    assert_eq!(redact(&url), "https://api.example.com/v3/places/search");
}

#[test]
fn debug_output_hides_api_key() {
    let client = test_client("https://api.foursquare.com/v3");
    assert!(!format!("{client:?}").contains("test-key"));
}
