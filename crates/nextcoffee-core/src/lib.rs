pub mod app_config;
pub mod config;
pub mod distance;
pub mod stores;

pub use app_config::{AppConfig, ClientConfig, Environment, StaticCity};
pub use config::{
    load_app_config, load_app_config_from_env, load_client_config, load_client_config_from_env,
};
pub use distance::format_distance;
pub use stores::{Coordinates, CoordinatesError, StoreRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
