use nextcoffee_client::Resolution;
use nextcoffee_core::ClientConfig;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn client_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        api_url: server.uri(),
        timeout_secs: 5,
        poll_interval_ms: 2000,
        nearby_limit: 31,
        geolocation_url: format!("{}/ip", server.uri()),
    }
}

fn fuglen(voting: i64) -> serde_json::Value {
    json!({
        "id": "fuglen",
        "name": "Fuglen",
        "address": "Universitetsgata 2",
        "neighbourhood": "Sentrum",
        "imgUrl": "",
        "distance": 420,
        "voting": voting
    })
}

// -------------------------------------------------------------------------
// Argument parsing
// -------------------------------------------------------------------------

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["nextcoffee", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["nextcoffee", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["nextcoffee"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn nearby_parses_lat_long() {
    let cli = Cli::try_parse_from(["nextcoffee", "nearby", "--lat-long", "59.91,10.75"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby {
            lat_long: Some(c),
            ip: false
        }) if c == Coordinates::new(59.91, 10.75)
    ));
}

#[test]
fn nearby_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from(["nextcoffee", "nearby", "--lat-long", "-33.87,151.21"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Nearby { lat_long: Some(c), .. }) if c == Coordinates::new(-33.87, 151.21)
    ));
}

#[test]
fn nearby_rejects_malformed_lat_long() {
    let result = Cli::try_parse_from(["nextcoffee", "nearby", "--lat-long", "oslo"]);
    assert!(result.is_err());
}

#[test]
fn nearby_lat_long_conflicts_with_ip() {
    let result = Cli::try_parse_from(["nextcoffee", "nearby", "--lat-long", "1,2", "--ip"]);
    assert!(result.is_err());
}

#[test]
fn show_defaults() {
    let cli = Cli::try_parse_from(["nextcoffee", "show", "fuglen"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Show {
            ref id,
            lat_long: None,
            watch_secs: 0,
            vote: false
        }) if id == "fuglen"
    ));
}

#[test]
fn show_with_watch_and_vote() {
    let cli = Cli::try_parse_from([
        "nextcoffee",
        "show",
        "fuglen",
        "--watch-secs",
        "10",
        "--vote",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Show {
            watch_secs: 10,
            vote: true,
            ..
        })
    ));
}

#[test]
fn vote_requires_id() {
    assert!(Cli::try_parse_from(["nextcoffee", "vote"]).is_err());
}

// -------------------------------------------------------------------------
// Handlers against a mocked server
// -------------------------------------------------------------------------

#[tokio::test]
async fn nearby_without_position_lists_only_the_city() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": "Oslo City",
            "coffeeStores": [fuglen(0)]
        })))
        .mount(&server)
        .await;

    let view = stores::run_nearby(&client_config(&server), None, false)
        .await
        .expect("view");

    assert_eq!(view.sections.len(), 1);
    assert_eq!(view.sections[0].title, "Oslo City");
    assert!(view.location_error.is_empty());
}

#[tokio::test]
async fn nearby_by_ip_uses_the_geolocation_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": "Oslo City",
            "coffeeStores": []
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "lat": 59.91,
            "lon": 10.75
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/getCoffeeStoresByLocation"))
        .and(query_param("latLong", "59.91,10.75"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([fuglen(0)])))
        .expect(1)
        .mount(&server)
        .await;

    let view = stores::run_nearby(&client_config(&server), None, true)
        .await
        .expect("view");

    assert_eq!(view.sections.len(), 1);
    assert_eq!(view.sections[0].cards[0].href, "/coffee-store/fuglen");
}

#[tokio::test]
async fn open_detail_resolves_from_props() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coffee-store/fuglen"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "coffeeStore": fuglen(0) })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/createCoffeeStore"))
        .respond_with(ResponseTemplate::new(201).set_body_json(fuglen(0)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/getCoffeeStoreById"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([fuglen(3)])))
        .mount(&server)
        .await;

    let mut detail = stores::open_detail(&client_config(&server), "fuglen", None)
        .await
        .expect("detail");

    assert_eq!(detail.view().name, "Fuglen");
    detail.unmount();
}

#[tokio::test]
async fn open_detail_resolves_from_nearby_list_after_mount() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/coffee-store/fuglen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "coffeeStore": {} })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/getCoffeeStoresByLocation"))
        .and(query_param("latLong", "59.91,10.75"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([fuglen(0)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/createCoffeeStore"))
        .respond_with(ResponseTemplate::new(201).set_body_json(fuglen(0)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/getCoffeeStoreById"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([fuglen(0)])))
        .mount(&server)
        .await;

    let mut detail = stores::open_detail(
        &client_config(&server),
        "fuglen",
        Some(Coordinates::new(59.91, 10.75)),
    )
    .await
    .expect("detail");

    assert_eq!(detail.resolution(), Resolution::ResolvedFromState);
    assert_eq!(detail.view().name, "Fuglen");
    detail.unmount();
}

#[tokio::test]
async fn vote_reports_new_count() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/favouriteCoffeeStoreById"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([fuglen(5)])))
        .mount(&server)
        .await;

    let message = stores::run_vote(&client_config(&server), "fuglen")
        .await
        .expect("vote");
    assert_eq!(message, "Fuglen now has 5 vote(s)");
}

#[tokio::test]
async fn vote_for_unknown_store_explains_next_step() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/favouriteCoffeeStoreById"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let message = stores::run_vote(&client_config(&server), "ghost")
        .await
        .expect("vote");
    assert!(message.contains("nextcoffee show ghost"));
}
