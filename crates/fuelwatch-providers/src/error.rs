use fuelwatch_core::{FuelType, GeoError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The upstream answered but reported a failure (not-ok envelope,
    /// rejected credentials).
    #[error("{provider} error: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("{provider} requires `{setting}` to be configured")]
    MissingSetting {
        provider: &'static str,
        setting: &'static str,
    },

    #[error("{provider} does not support fuel type {fuel_type}")]
    UnsupportedFuelType {
        provider: &'static str,
        fuel_type: FuelType,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error(transparent)]
    Geo(#[from] GeoError),
}
