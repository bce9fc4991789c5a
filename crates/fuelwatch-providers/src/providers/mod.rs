//! Upstream adapters, one module per site.

pub(crate) mod autoblog;
pub(crate) mod gasbuddy;
mod html;
pub(crate) mod nsw;
pub(crate) mod spritpreisrechner;
pub(crate) mod tankerkoenig;
mod values;

use fuelwatch_core::{Coordinate, FuelType, ProviderConfig};

use crate::error::ProviderError;

pub use autoblog::Autoblog;
pub use gasbuddy::GasBuddy;
pub use nsw::Nsw;
pub use spritpreisrechner::Spritpreisrechner;
pub use tankerkoenig::Tankerkoenig;

fn require_origin(provider: &'static str, config: &ProviderConfig) -> Result<Coordinate, ProviderError> {
    config.origin().ok_or(ProviderError::MissingSetting {
        provider,
        setting: "lat/lng",
    })
}

fn require_zip(provider: &'static str, config: &ProviderConfig) -> Result<String, ProviderError> {
    config
        .zip
        .clone()
        .filter(|zip| !zip.is_empty())
        .ok_or(ProviderError::MissingSetting {
            provider,
            setting: "zip",
        })
}

fn require_api_key(provider: &'static str, config: &ProviderConfig) -> Result<String, ProviderError> {
    config
        .api_key
        .clone()
        .filter(|key| !key.is_empty())
        .ok_or(ProviderError::MissingSetting {
            provider,
            setting: "api_key",
        })
}

/// Fails on the first configured type the provider cannot serve.
fn check_types(
    provider: &'static str,
    config: &ProviderConfig,
    supported: &[FuelType],
) -> Result<(), ProviderError> {
    match config.types.iter().find(|t| !supported.contains(t)) {
        Some(&fuel_type) => Err(ProviderError::UnsupportedFuelType {
            provider,
            fuel_type,
        }),
        None => Ok(()),
    }
}
