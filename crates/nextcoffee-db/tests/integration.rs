//! Offline unit tests for nextcoffee-db pool configuration and row types.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use chrono::Utc;
use nextcoffee_core::{AppConfig, Coordinates, Environment, StaticCity, StoreRecord};
use nextcoffee_db::{CoffeeStoreRow, PoolConfig};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: Some("postgres://example".to_string()),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        places_api_key: "key".to_string(),
        places_base_url: "https://api.foursquare.com/v3".to_string(),
        places_timeout_secs: 30,
        user_agent: "ua".to_string(),
        static_city: StaticCity {
            name: "Oslo City".to_string(),
            coordinates: Coordinates::new(59.91, 10.75),
            limit: 6,
        },
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn coffee_store_row_converts_to_record() {
    let row = CoffeeStoreRow {
        id: "5a1b".to_string(),
        name: "Fuglen".to_string(),
        address: "Universitetsgata 2".to_string(),
        neighbourhood: "Sentrum".to_string(),
        img_url: "https://img.example/fuglen.jpg".to_string(),
        distance: 420.0,
        voting: 3,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let record = StoreRecord::from(row);
    assert_eq!(record.id, "5a1b");
    assert_eq!(record.neighbourhood, "Sentrum");
    assert_eq!(record.img_url, "https://img.example/fuglen.jpg");
    assert_eq!(record.voting, 3);
}
