//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use nextcoffee_core::{Coordinates, StaticCity};
use nextcoffee_places::{PlacesClient, PlacesError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 5, "nextcoffee-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn oslo_results() -> serde_json::Value {
    json!({
        "results": [
            {
                "fsq_id": "5a1b",
                "name": "Fuglen",
                "distance": 420,
                "location": {
                    "address": "Universitetsgata 2",
                    "locality": "Oslo",
                    "neighborhood": ["Sentrum"]
                },
                "photos": [{ "prefix": "https://img.example/", "suffix": "/fuglen.jpg" }]
            },
            {
                "fsq_id": "6c2d",
                "name": "Tim Wendelboe",
                "distance": 1820,
                "location": { "formatted_address": "Grüners gate 1, 0552 Oslo" }
            }
        ]
    })
}

#[tokio::test]
async fn search_returns_normalized_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places/search"))
        .and(query_param("query", "coffee"))
        .and(query_param("ll", "59.91,10.75"))
        .and(query_param("limit", "31"))
        .and(header("authorization", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oslo_results()))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let stores = client
        .search(Coordinates::new(59.91, 10.75), 31)
        .await
        .expect("search should succeed");

    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].id, "5a1b");
    assert_eq!(stores[0].name, "Fuglen");
    assert_eq!(stores[0].neighbourhood, "Sentrum");
    assert_eq!(stores[0].img_url, "https://img.example/original/fuglen.jpg");
    assert!((stores[0].distance - 420.0).abs() < f64::EPSILON);
    assert_eq!(stores[1].address, "Grüners gate 1, 0552 Oslo");
    assert_eq!(stores[1].neighbourhood, "");
    assert_eq!(stores[1].img_url, "");
}

#[tokio::test]
async fn search_city_uses_configured_coordinates_and_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places/search"))
        .and(query_param("ll", "59.91,10.75"))
        .and(query_param("limit", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oslo_results()))
        .expect(1)
        .mount(&server)
        .await;

    let city = StaticCity {
        name: "Oslo City".to_string(),
        coordinates: Coordinates::new(59.91, 10.75),
        limit: 6,
    };
    let stores = test_client(&server.uri())
        .search_city(&city)
        .await
        .expect("static search should succeed");
    assert_eq!(stores.len(), 2);
}

#[tokio::test]
async fn empty_results_yield_empty_vec() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let stores = test_client(&server.uri())
        .search(Coordinates::new(0.0, 0.0), 5)
        .await
        .expect("search should succeed");
    assert!(stores.is_empty());
}

#[tokio::test]
async fn non_success_status_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "bad key" })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(Coordinates::new(59.91, 10.75), 31)
        .await
        .expect_err("401 should fail");
    assert!(
        matches!(err, PlacesError::UnexpectedStatus { status: 401, .. }),
        "expected UnexpectedStatus(401), got {err:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/places/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search(Coordinates::new(59.91, 10.75), 31)
        .await
        .expect_err("html body should fail");
    assert!(matches!(err, PlacesError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_server_is_an_http_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let err = test_client(&uri)
        .search(Coordinates::new(59.91, 10.75), 31)
        .await
        .expect_err("closed port should fail");
    assert!(matches!(err, PlacesError::Http(_)), "got {err:?}");
}
