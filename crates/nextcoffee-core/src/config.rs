use std::env::VarError;
use std::str::FromStr;

use crate::app_config::{AppConfig, ClientConfig, Environment, StaticCity};
use crate::stores::Coordinates;
use crate::ConfigError;

/// Load server configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load server configuration from environment variables already in the process.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Load client configuration, reading `.env` first.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_client_config() -> Result<ClientConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_client_config_from_env()
}

/// Load client configuration from the process environment only.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_client_config_from_env() -> Result<ClientConfig, ConfigError> {
    build_client_config(|key| std::env::var(key))
}

/// Reads variables through a lookup closure so tests can use a plain map.
struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    fn require(&self, var: &str) -> Result<String, ConfigError> {
        (self.lookup)(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    }

    fn optional(&self, var: &str) -> Option<String> {
        (self.lookup)(var).ok().filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, var: &str, default: &str) -> String {
        (self.lookup)(var).unwrap_or_else(|_| default.to_string())
    }

    fn parse<T>(&self, var: &str, default: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.or_default(var, default);
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let vars = Env { lookup };

    let env = parse_environment(&vars.or_default("NEXTCOFFEE_ENV", "development"));

    let database_url = vars.optional("DATABASE_URL");
    if database_url.is_none() && env != Environment::Development {
        return Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    }

    let places_api_key = vars.require("FOURSQUARE_API_KEY")?;

    let static_city = StaticCity {
        name: vars.or_default("NEXTCOFFEE_STATIC_CITY", "Oslo City"),
        coordinates: vars.parse::<Coordinates>("NEXTCOFFEE_STATIC_LAT_LONG", "59.91,10.75")?,
        limit: vars.parse("NEXTCOFFEE_STATIC_LIMIT", "6")?,
    };

    Ok(AppConfig {
        database_url,
        env,
        bind_addr: vars.parse("NEXTCOFFEE_BIND_ADDR", "0.0.0.0:3000")?,
        log_level: vars.or_default("NEXTCOFFEE_LOG_LEVEL", "info"),
        db_max_connections: vars.parse("NEXTCOFFEE_DB_MAX_CONNECTIONS", "10")?,
        db_min_connections: vars.parse("NEXTCOFFEE_DB_MIN_CONNECTIONS", "1")?,
        db_acquire_timeout_secs: vars.parse("NEXTCOFFEE_DB_ACQUIRE_TIMEOUT_SECS", "10")?,
        places_api_key,
        places_base_url: vars.or_default(
            "NEXTCOFFEE_PLACES_BASE_URL",
            "https://api.foursquare.com/v3",
        ),
        places_timeout_secs: vars.parse("NEXTCOFFEE_PLACES_TIMEOUT_SECS", "30")?,
        user_agent: vars.or_default("NEXTCOFFEE_USER_AGENT", "nextcoffee/0.1 (coffee-finder)"),
        static_city,
    })
}

fn build_client_config<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let vars = Env { lookup };

    let poll_interval_ms: u64 = vars.parse("NEXTCOFFEE_POLL_INTERVAL_MS", "2000")?;
    if poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEXTCOFFEE_POLL_INTERVAL_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(ClientConfig {
        api_url: vars.or_default("NEXTCOFFEE_API_URL", "http://localhost:3000"),
        timeout_secs: vars.parse("NEXTCOFFEE_CLIENT_TIMEOUT_SECS", "30")?,
        poll_interval_ms,
        nearby_limit: vars.parse("NEXTCOFFEE_NEARBY_LIMIT", "31")?,
        geolocation_url: vars.or_default("NEXTCOFFEE_GEOLOCATION_URL", "http://ip-api.com/json"),
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
