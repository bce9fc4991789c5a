//! The per-provider YAML bundle handed to an adapter at construction.

use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, Coordinate, FuelType};

const DEFAULT_RADIUS: f64 = 5.0;

/// Validated provider settings.
///
/// `sort_by` is always one of `types`; a mismatching value in the file is
/// replaced by the first configured type when loading.
#[derive(Clone, PartialEq)]
pub struct ProviderConfig {
    pub provider: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Search radius in the provider's distance unit.
    pub radius: f64,
    pub zip: Option<String>,
    pub types: Vec<FuelType>,
    pub sort_by: FuelType,
    pub show_open_only: bool,
    pub api_key: Option<String>,
    pub secret: Option<String>,
    pub station_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProviderConfigFile {
    provider: String,
    lat: Option<f64>,
    lng: Option<f64>,
    #[serde(default = "default_radius")]
    radius: f64,
    zip: Option<String>,
    types: Vec<FuelType>,
    sort_by: Option<FuelType>,
    #[serde(default)]
    show_open_only: bool,
    api_key: Option<String>,
    secret: Option<String>,
    #[serde(default)]
    station_ids: Vec<String>,
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS
}

impl ProviderConfig {
    /// Minimal config for `provider` with the given fuel types, sorted by the
    /// first one. Every other field takes its file default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` when `types` is empty.
    pub fn new(provider: impl Into<String>, types: Vec<FuelType>) -> Result<Self, ConfigError> {
        let sort_by = *types
            .first()
            .ok_or_else(|| ConfigError::Validation("types must be non-empty".to_string()))?;
        Ok(Self {
            provider: provider.into(),
            lat: None,
            lng: None,
            radius: DEFAULT_RADIUS,
            zip: None,
            types,
            sort_by,
            show_open_only: false,
            api_key: None,
            secret: None,
            station_ids: Vec::new(),
        })
    }

    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML cannot be parsed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ProviderConfigFile =
            serde_yaml::from_str(content).map_err(ConfigError::ConfigFileParse)?;
        resolve(file)
    }

    /// Search origin, if both coordinates are configured.
    #[must_use]
    pub fn origin(&self) -> Option<Coordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }

    /// Replaces `api_key` / `secret` with the given values where present.
    #[must_use]
    pub fn with_credentials(mut self, api_key: Option<String>, secret: Option<String>) -> Self {
        if api_key.is_some() {
            self.api_key = api_key;
        }
        if secret.is_some() {
            self.secret = secret;
        }
        self
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("lat", &self.lat)
            .field("lng", &self.lng)
            .field("radius", &self.radius)
            .field("zip", &self.zip)
            .field("types", &self.types)
            .field("sort_by", &self.sort_by)
            .field("show_open_only", &self.show_open_only)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("secret", &self.secret.as_ref().map(|_| "[redacted]"))
            .field("station_ids", &self.station_ids)
            .finish()
    }
}

/// Load and validate the provider configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_provider_config(path: &Path) -> Result<ProviderConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ConfigFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    ProviderConfig::from_yaml_str(&content)
}

fn resolve(file: ProviderConfigFile) -> Result<ProviderConfig, ConfigError> {
    validate(&file)?;

    let first = file.types[0];
    let sort_by = match file.sort_by {
        Some(sort_by) if file.types.contains(&sort_by) => sort_by,
        Some(sort_by) => {
            tracing::warn!(
                sort_by = %sort_by,
                fallback = %first,
                "sort_by is not one of the configured types; falling back to the first type"
            );
            first
        }
        None => first,
    };

    Ok(ProviderConfig {
        provider: file.provider.trim().to_string(),
        lat: file.lat,
        lng: file.lng,
        radius: file.radius,
        zip: file.zip.map(|z| z.trim().to_string()),
        types: file.types,
        sort_by,
        show_open_only: file.show_open_only,
        api_key: file.api_key,
        secret: file.secret,
        station_ids: file.station_ids,
    })
}

fn validate(file: &ProviderConfigFile) -> Result<(), ConfigError> {
    if file.provider.trim().is_empty() {
        return Err(ConfigError::Validation(
            "provider must be non-empty".to_string(),
        ));
    }

    if file.types.is_empty() {
        return Err(ConfigError::Validation(
            "types must be non-empty".to_string(),
        ));
    }

    if !(file.radius.is_finite() && file.radius > 0.0) {
        return Err(ConfigError::Validation(format!(
            "radius must be positive, got {}",
            file.radius
        )));
    }

    match (file.lat, file.lng) {
        (Some(lat), Some(lng)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                return Err(ConfigError::Validation(format!(
                    "coordinates out of range: lat {lat}, lng {lng}"
                )));
            }
        }
        (None, None) => {}
        _ => {
            return Err(ConfigError::Validation(
                "lat and lng must be set together".to_string(),
            ));
        }
    }

    if file.station_ids.iter().any(|id| id.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "station_ids entries must be non-empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "provider_config_test.rs"]
mod tests;
