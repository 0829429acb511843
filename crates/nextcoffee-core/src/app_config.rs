use std::net::SocketAddr;

use crate::stores::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// The fixed city whose coffee shops are pre-rendered on the index page.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticCity {
    pub name: String,
    pub coordinates: Coordinates,
    pub limit: u32,
}

/// Server configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// `None` only in development, where the server falls back to an
    /// in-memory datastore.
    pub database_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub places_api_key: String,
    pub places_base_url: String,
    pub places_timeout_secs: u64,
    pub user_agent: String,
    pub static_city: StaticCity,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("static_city", &self.static_city)
            .finish()
    }
}

/// Configuration for the client side: the CLI and the page controllers it
/// drives.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub nearby_limit: u32,
    pub geolocation_url: String,
}
