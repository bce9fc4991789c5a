//! Tankerkönig (Germany): JSON API with a radius search returning every fuel
//! type at once, plus per-station detail lookups for the watchlist.

use std::collections::HashSet;

use async_trait::async_trait;
use fuelwatch_core::{
    build_price_list, great_circle_distance_km, key_by_id, Coordinate, Currency, DistanceUnit,
    FuelType, PartialStation, PipelineOptions, Price, PriceList, ProviderConfig, Station,
};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use super::values::{deserialize_price, lenient_string, unknown_price};
use super::{check_types, require_api_key, require_origin};
use crate::error::ProviderError;
use crate::fetch::{join_url, parse_base_url, request_json, HttpSettings};
use crate::provider::Provider;

pub(crate) const NAME: &str = "tankerkoenig";
const DEFAULT_BASE_URL: &str = "https://creativecommons.tankerkoenig.de/json/";
const TYPES: [FuelType; 3] = [FuelType::Diesel, FuelType::E5, FuelType::E10];
/// Upstream cap on station ids per request.
pub(crate) const WATCHLIST_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
struct ListResponse {
    ok: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    stations: Vec<TkStation>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    ok: bool,
    #[serde(default)]
    message: Option<String>,
    station: Option<TkStation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TkStation {
    id: String,
    name: String,
    #[serde(default)]
    street: Value,
    #[serde(default)]
    house_number: Value,
    #[serde(default)]
    post_code: Value,
    #[serde(default)]
    place: Value,
    lat: f64,
    lng: f64,
    #[serde(default)]
    dist: Option<f64>,
    #[serde(default)]
    is_open: bool,
    #[serde(default = "unknown_price", deserialize_with = "deserialize_price")]
    diesel: Price,
    #[serde(default = "unknown_price", deserialize_with = "deserialize_price")]
    e5: Price,
    #[serde(default = "unknown_price", deserialize_with = "deserialize_price")]
    e10: Price,
}

impl TkStation {
    fn price(&self, fuel_type: FuelType) -> Price {
        match fuel_type {
            FuelType::Diesel => self.diesel,
            FuelType::E5 => self.e5,
            FuelType::E10 => self.e10,
            _ => Price::Unknown,
        }
    }
}

pub struct Tankerkoenig {
    client: Client,
    base_url: Url,
    config: ProviderConfig,
    api_key: String,
    origin: Coordinate,
}

impl Tankerkoenig {
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingSetting`] without `api_key` or origin,
    /// [`ProviderError::UnsupportedFuelType`] for types other than diesel, e5
    /// and e10.
    pub fn new(config: ProviderConfig, http: &HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(config, http, DEFAULT_BASE_URL)
    }

    /// Same as [`Tankerkoenig::new`] against a custom base URL (for tests).
    ///
    /// # Errors
    ///
    /// As [`Tankerkoenig::new`], plus [`ProviderError::InvalidBaseUrl`].
    pub fn with_base_url(
        config: ProviderConfig,
        http: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let api_key = require_api_key(NAME, &config)?;
        let origin = require_origin(NAME, &config)?;
        check_types(NAME, &config, &TYPES)?;

        Ok(Self {
            client: http.build_client()?,
            base_url: parse_base_url(base_url)?,
            config,
            api_key,
            origin,
        })
    }

    async fn fetch_radius(&self) -> Result<Vec<TkStation>, ProviderError> {
        let mut url = join_url(&self.base_url, "list.php")?;
        url.query_pairs_mut()
            .append_pair("lat", &self.origin.lat.to_string())
            .append_pair("lng", &self.origin.lng.to_string())
            .append_pair("rad", &self.config.radius.to_string())
            .append_pair("type", "all")
            .append_pair("sort", "dist")
            .append_pair("apikey", &self.api_key);

        let body: ListResponse = request_json(self.client.get(url), "tankerkoenig list.php").await?;
        if !body.ok {
            return Err(upstream_error(body.message));
        }
        Ok(body.stations)
    }

    async fn fetch_detail(&self, id: &str) -> Result<TkStation, ProviderError> {
        let mut url = join_url(&self.base_url, "detail.php")?;
        url.query_pairs_mut()
            .append_pair("id", id)
            .append_pair("apikey", &self.api_key);

        let context = format!("tankerkoenig detail.php(id={id})");
        let body: DetailResponse = request_json(self.client.get(url), &context).await?;
        if !body.ok {
            return Err(upstream_error(body.message));
        }
        body.station
            .ok_or_else(|| upstream_error(Some(format!("no station in detail response for {id}"))))
    }

    async fn fetch_watchlist(&self, found: &HashSet<String>) -> Result<Vec<TkStation>, ProviderError> {
        let ids = watchlist_ids(&self.config.station_ids, found);
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(provider = NAME, count = ids.len(), "fetching watchlist stations");
        futures::future::try_join_all(ids.into_iter().map(|id| self.fetch_detail(id))).await
    }

    fn to_partials(&self, station: TkStation) -> Vec<PartialStation> {
        let coordinates = Coordinate::new(station.lat, station.lng);
        let mut normalized = Station::new(
            station.id.clone(),
            station.name.trim(),
            format_address(&station),
        );
        normalized.coordinates = Some(coordinates);
        normalized.distance = station
            .dist
            .unwrap_or_else(|| great_circle_distance_km(self.origin, coordinates));
        normalized.is_open = station.is_open;

        self.config
            .types
            .iter()
            .map(|&t| PartialStation::new(normalized.clone(), t, station.price(t)))
            .collect()
    }
}

#[async_trait]
impl Provider for Tankerkoenig {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn get_data(&self) -> Result<PriceList, ProviderError> {
        let mut stations = self.fetch_radius().await?;
        let found: HashSet<String> = stations.iter().map(|s| s.id.clone()).collect();
        stations.extend(self.fetch_watchlist(&found).await?);

        let partials: Vec<PartialStation> = stations
            .into_iter()
            .flat_map(|s| self.to_partials(s))
            .collect();

        let options = PipelineOptions::new(&self.config, &TYPES, DistanceUnit::Kilometer, Currency::Eur);
        Ok(build_price_list(partials, key_by_id, &options))
    }
}

fn upstream_error(message: Option<String>) -> ProviderError {
    ProviderError::Upstream {
        provider: NAME,
        message: message.unwrap_or_else(|| "no fuel data".to_string()),
    }
}

/// Watchlist ids not already returned by the radius search, capped at
/// [`WATCHLIST_LIMIT`].
pub(crate) fn watchlist_ids<'a>(configured: &'a [String], found: &HashSet<String>) -> Vec<&'a str> {
    if configured.len() > WATCHLIST_LIMIT {
        tracing::warn!(
            provider = NAME,
            configured = configured.len(),
            limit = WATCHLIST_LIMIT,
            "station watchlist exceeds upstream limit; truncating"
        );
    }

    configured
        .iter()
        .take(WATCHLIST_LIMIT)
        .map(|id| id.trim())
        .filter(|id| !found.contains(*id))
        .collect()
}

/// `"01067 Dresden - Hauptstr. 12"`: postal code zero-padded to 5 digits.
fn format_address(station: &TkStation) -> String {
    let post_code = lenient_string(&station.post_code);
    let post_code = if !post_code.is_empty() && post_code.chars().all(|c| c.is_ascii_digit()) {
        format!("{post_code:0>5}")
    } else {
        post_code
    };
    let place = lenient_string(&station.place);
    let street = format!(
        "{} {}",
        lenient_string(&station.street),
        lenient_string(&station.house_number)
    );
    format!("{post_code} {place} - {}", street.trim())
}
