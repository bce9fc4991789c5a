//! Maps a configured provider name to its adapter.

use fuelwatch_core::ProviderConfig;

use crate::error::ProviderError;
use crate::fetch::HttpSettings;
use crate::provider::Provider;
use crate::providers::{autoblog, gasbuddy, nsw, spritpreisrechner, tankerkoenig};
use crate::providers::{Autoblog, GasBuddy, Nsw, Spritpreisrechner, Tankerkoenig};

/// Every name [`build_provider`] accepts.
pub const PROVIDER_NAMES: [&str; 5] = [
    autoblog::NAME,
    gasbuddy::NAME,
    nsw::NAME,
    spritpreisrechner::NAME,
    tankerkoenig::NAME,
];

/// Builds the adapter named by `config.provider` (case-insensitive).
///
/// # Errors
///
/// Returns [`ProviderError::UnknownProvider`] for names outside
/// [`PROVIDER_NAMES`], or the adapter's own construction error.
pub fn build_provider(
    config: &ProviderConfig,
    http: &HttpSettings,
) -> Result<Box<dyn Provider>, ProviderError> {
    let config = config.clone();
    let provider: Box<dyn Provider> = match config.provider.to_ascii_lowercase().as_str() {
        autoblog::NAME => Box::new(Autoblog::new(config, http)?),
        gasbuddy::NAME => Box::new(GasBuddy::new(config, http)?),
        nsw::NAME => Box::new(Nsw::new(config, http)?),
        spritpreisrechner::NAME => Box::new(Spritpreisrechner::new(config, http)?),
        tankerkoenig::NAME => Box::new(Tankerkoenig::new(config, http)?),
        other => return Err(ProviderError::UnknownProvider(other.to_string())),
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use fuelwatch_core::FuelType;

    use super::*;

    fn config(provider: &str, types: Vec<FuelType>) -> ProviderConfig {
        let mut config = ProviderConfig::new(provider, types).unwrap();
        config.lat = Some(52.52);
        config.lng = Some(13.40);
        config.zip = Some("10001".to_string());
        config.api_key = Some("key".to_string());
        config.secret = Some("secret".to_string());
        config
    }

    #[test]
    fn builds_every_registered_provider() {
        let cases = [
            ("autoblog", FuelType::Regular),
            ("gasbuddy", FuelType::Regular),
            ("nsw", FuelType::Diesel),
            ("spritpreisrechner", FuelType::Diesel),
            ("tankerkoenig", FuelType::Diesel),
        ];
        for (name, fuel_type) in cases {
            let provider = build_provider(&config(name, vec![fuel_type]), &HttpSettings::default())
                .unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(provider.name(), name);
        }
        assert_eq!(PROVIDER_NAMES.len(), cases.len());
    }

    #[test]
    fn name_lookup_ignores_case() {
        let provider =
            build_provider(&config("GasBuddy", vec![FuelType::Premium]), &HttpSettings::default()).unwrap();
        assert_eq!(provider.name(), "gasbuddy");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = build_provider(&config("fuelo", vec![FuelType::Diesel]), &HttpSettings::default())
            .err()
            .unwrap();
        assert!(matches!(err, ProviderError::UnknownProvider(ref n) if n == "fuelo"));
    }

    #[test]
    fn adapter_validation_errors_surface() {
        let mut cfg = config("gasbuddy", vec![FuelType::Regular]);
        cfg.zip = None;
        let err = build_provider(&cfg, &HttpSettings::default()).err().unwrap();
        assert!(matches!(err, ProviderError::MissingSetting { setting: "zip", .. }));
    }
}
