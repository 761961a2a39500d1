pub mod app_config;
mod config;
pub mod distance;
pub mod postal_code;
pub mod types;

pub use app_config::{AppConfig, FailurePolicy};
pub use config::{load_app_config, load_app_config_from_env};
pub use distance::haversine_km;
pub use postal_code::PostalCode;
pub use types::{
    Coordinate, DateAvailability, DateWindow, Location, Place, PlaceFailure, PlaceResult,
    ScanReport,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid postal code \"{0}\": expected the form A1A 1A1")]
    InvalidPostalCode(String),

    #[error("invalid date window: {start} is after {end}")]
    InvalidDateWindow { start: String, end: String },
}
