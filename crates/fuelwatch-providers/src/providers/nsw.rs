//! NSW FuelCheck (Australia): one JSON POST per fuel type, authorized with a
//! client-credentials bearer token that is renewed every six hours.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use fuelwatch_core::{
    build_price_list, key_by_id, Coordinate, Currency, DistanceUnit, FuelType, PartialStation,
    PipelineOptions, Price, PriceList, ProviderConfig, Station,
};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use super::values::{lenient_f64, lenient_string};
use super::{check_types, require_api_key, require_origin};
use crate::error::ProviderError;
use crate::fetch::{join_url, parse_base_url, request_json, HttpSettings};
use crate::provider::Provider;
use crate::token::TokenStore;

pub(crate) const NAME: &str = "nsw";
const DEFAULT_BASE_URL: &str = "https://api.onegov.nsw.gov.au/";
const TYPES: [FuelType; 3] = [FuelType::Diesel, FuelType::E5, FuelType::E10];
const TOKEN_REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);
/// `DD/MM/YYYY hh:mm:ss AM`, UTC.
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %I:%M:%S %p";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(rename = "Error")]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    stations: Vec<NswStation>,
    #[serde(default)]
    prices: Vec<NswPrice>,
}

#[derive(Debug, Deserialize)]
struct NswStation {
    code: Value,
    name: String,
    #[serde(default)]
    address: String,
    location: NswLocation,
}

#[derive(Debug, Deserialize)]
struct NswLocation {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    distance: Value,
}

#[derive(Debug, Deserialize)]
struct NswPrice {
    stationcode: Value,
    #[serde(default)]
    price: Value,
}

fn type_code(fuel_type: FuelType) -> &'static str {
    match fuel_type {
        FuelType::E5 => "P95",
        FuelType::E10 => "E10",
        _ => "DL",
    }
}

pub struct Nsw {
    client: Client,
    base_url: Url,
    config: ProviderConfig,
    api_key: String,
    secret: String,
    origin: Coordinate,
    token: TokenStore,
    transaction: AtomicU64,
}

impl Nsw {
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingSetting`] without `api_key`, `secret`
    /// or origin and [`ProviderError::UnsupportedFuelType`] for types other
    /// than diesel, e5 and e10.
    pub fn new(config: ProviderConfig, http: &HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(config, http, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// As [`Nsw::new`], plus [`ProviderError::InvalidBaseUrl`].
    pub fn with_base_url(
        config: ProviderConfig,
        http: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let api_key = require_api_key(NAME, &config)?;
        let secret = config
            .secret
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or(ProviderError::MissingSetting {
                provider: NAME,
                setting: "secret",
            })?;
        let origin = require_origin(NAME, &config)?;
        check_types(NAME, &config, &TYPES)?;

        Ok(Self {
            client: http.build_client()?,
            base_url: parse_base_url(base_url)?,
            config,
            api_key,
            secret,
            origin,
            token: TokenStore::new(),
            transaction: AtomicU64::new(1),
        })
    }

    async fn fetch_token(&self) -> Result<String, ProviderError> {
        let mut url = join_url(&self.base_url, "oauth/client_credential/accesstoken")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "client_credentials");

        let request = self
            .client
            .get(url)
            .basic_auth(&self.api_key, Some(&self.secret));
        let body: TokenResponse = request_json(request, "nsw access token").await?;

        if let Some(error) = body.error {
            return Err(ProviderError::Upstream {
                provider: NAME,
                message: format!("token refresh rejected: {}", lenient_string(&error)),
            });
        }
        body.access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ProviderError::Upstream {
                provider: NAME,
                message: "token response without access_token".to_string(),
            })
    }

    /// Current token; fetches one first if none was obtained yet.
    async fn bearer_token(&self) -> Result<String, ProviderError> {
        if let Some(token) = self.token.current().await {
            return Ok(token);
        }
        self.refresh_credentials().await?;
        self.token.current().await.ok_or_else(|| ProviderError::Upstream {
            provider: NAME,
            message: "no access token available".to_string(),
        })
    }

    async fn fetch_type(&self, fuel_type: FuelType, token: &str) -> Result<Vec<PartialStation>, ProviderError> {
        let url = join_url(&self.base_url, "FuelPriceCheck/v1/fuel/prices/nearby")?;
        let transaction_id = self.transaction.fetch_add(1, Ordering::Relaxed);
        let timestamp = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let body = serde_json::json!({
            "fueltype": type_code(fuel_type),
            "latitude": self.origin.lat,
            "longitude": self.origin.lng,
            "radius": self.config.radius,
            "sortby": "price",
            "sortascending": true,
        });

        let request = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .header("transactionid", transaction_id.to_string())
            .header("requesttimestamp", timestamp)
            .json(&body);
        let context = format!("nsw prices/nearby {fuel_type}");
        let response: NearbyResponse = request_json(request, &context).await?;

        tracing::debug!(
            provider = NAME,
            fuel_type = %fuel_type,
            stations = response.stations.len(),
            prices = response.prices.len(),
            "fetched nearby prices"
        );
        Ok(join_prices(response, fuel_type))
    }
}

#[async_trait]
impl Provider for Nsw {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn get_data(&self) -> Result<PriceList, ProviderError> {
        let token = self.bearer_token().await?;
        let responses = futures::future::try_join_all(
            self.config.types.iter().map(|&t| self.fetch_type(t, &token)),
        )
        .await?;
        let partials: Vec<PartialStation> = responses.into_iter().flatten().collect();

        let options = PipelineOptions::new(&self.config, &TYPES, DistanceUnit::Kilometer, Currency::Aud);
        Ok(build_price_list(partials, key_by_id, &options))
    }

    fn credential_refresh_interval(&self) -> Option<Duration> {
        Some(TOKEN_REFRESH_INTERVAL)
    }

    async fn refresh_credentials(&self) -> Result<(), ProviderError> {
        self.token.refresh_with(self.fetch_token()).await?;
        tracing::info!(provider = NAME, "access token refreshed");
        Ok(())
    }
}

/// Attaches each station's price (matched on station code) and produces one
/// partial per station.
fn join_prices(response: NearbyResponse, fuel_type: FuelType) -> Vec<PartialStation> {
    let prices: HashMap<String, Price> = response
        .prices
        .iter()
        .map(|p| {
            let price = lenient_f64(&p.price).map_or(Price::Unknown, Price::from_raw);
            (lenient_string(&p.stationcode), price)
        })
        .collect();

    response
        .stations
        .into_iter()
        .map(|s| {
            let code = lenient_string(&s.code);
            let price = prices.get(&code).copied().unwrap_or(Price::Unknown);
            let mut station = Station::new(code, s.name.trim(), s.address.trim());
            station.coordinates = Some(Coordinate::new(s.location.latitude, s.location.longitude));
            station.distance = lenient_f64(&s.location.distance).unwrap_or(0.0);
            PartialStation::new(station, fuel_type, price)
        })
        .collect()
}
