//! Spritpreisrechner (Austria): one form POST per fuel type over a bounding
//! box. The upstream returns no distance, so it is computed from the origin.

use async_trait::async_trait;
use fuelwatch_core::{
    build_price_list, key_by_id, BoundingBox, Coordinate, Currency, DistanceUnit,
    FuelType, GeoCursor, PartialStation, PipelineOptions, Price, PriceList, ProviderConfig, Station,
};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use super::values::{lenient_f64, lenient_string};
use super::{check_types, require_origin};
use crate::error::ProviderError;
use crate::fetch::{join_url, parse_base_url, request_json, HttpSettings};
use crate::provider::Provider;

pub(crate) const NAME: &str = "spritpreisrechner";
const DEFAULT_BASE_URL: &str = "http://www.spritpreisrechner.at/espritmap-app/";
const TYPES: [FuelType; 3] = [FuelType::Diesel, FuelType::E5, FuelType::Gas];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SprStation {
    gas_station_name: String,
    #[serde(default)]
    postal_code: Value,
    #[serde(default)]
    city: Value,
    #[serde(default)]
    address: Value,
    #[serde(default)]
    latitude: Value,
    #[serde(default)]
    longitude: Value,
    #[serde(default)]
    open: bool,
    #[serde(default)]
    sprit_price: Vec<SprPrice>,
}

#[derive(Debug, Deserialize)]
struct SprPrice {
    #[serde(default)]
    amount: Value,
}

fn type_code(fuel_type: FuelType) -> &'static str {
    match fuel_type {
        FuelType::Diesel => "DIE",
        FuelType::Gas => "GAS",
        _ => "SUP",
    }
}

pub struct Spritpreisrechner {
    client: Client,
    base_url: Url,
    config: ProviderConfig,
    cursor: GeoCursor,
    bbox: BoundingBox,
}

impl Spritpreisrechner {
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingSetting`] without an origin and
    /// [`ProviderError::UnsupportedFuelType`] for types other than diesel, e5
    /// and gas.
    pub fn new(config: ProviderConfig, http: &HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(config, http, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// As [`Spritpreisrechner::new`], plus [`ProviderError::InvalidBaseUrl`].
    pub fn with_base_url(
        config: ProviderConfig,
        http: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let cursor = GeoCursor::from_origin(require_origin(NAME, &config)?);
        check_types(NAME, &config, &TYPES)?;
        let bbox = cursor.bounding_box(config.radius)?;

        Ok(Self {
            client: http.build_client()?,
            base_url: parse_base_url(base_url)?,
            config,
            cursor,
            bbox,
        })
    }

    async fn fetch_type(&self, fuel_type: FuelType) -> Result<Vec<PartialStation>, ProviderError> {
        let url = join_url(&self.base_url, "GasStationServlet")?;
        let form = [("data", request_data(&self.bbox, fuel_type, self.config.show_open_only))];
        let context = format!("spritpreisrechner {fuel_type}");
        let stations: Vec<SprStation> = request_json(self.client.post(url).form(&form), &context).await?;

        tracing::debug!(provider = NAME, fuel_type = %fuel_type, count = stations.len(), "fetched stations");
        let mut partials = Vec::with_capacity(stations.len());
        for station in stations {
            if let Some(partial) = self.to_partial(station, fuel_type)? {
                partials.push(partial);
            }
        }
        Ok(partials)
    }

    fn to_partial(&self, station: SprStation, fuel_type: FuelType) -> Result<Option<PartialStation>, ProviderError> {
        let (Some(lat), Some(lng)) = (lenient_f64(&station.latitude), lenient_f64(&station.longitude)) else {
            tracing::debug!(provider = NAME, name = %station.gas_station_name, "skipping station without coordinates");
            return Ok(None);
        };
        let coordinates = Coordinate::new(lat, lng);
        let postal_code = lenient_string(&station.postal_code);
        let city = lenient_string(&station.city);
        let name = station.gas_station_name.trim();

        // The upstream has no station id.
        let id = format!("{name}|{postal_code}|{city}|{lat}|{lng}");
        let address = format!("{postal_code} {city} - {}", lenient_string(&station.address));
        let mut normalized = Station::new(id, name, address);
        normalized.coordinates = Some(coordinates);
        normalized.distance = self.cursor.distance_km(coordinates)?;
        normalized.is_open = station.open;

        Ok(Some(PartialStation::new(
            normalized,
            fuel_type,
            highest_amount(&station.sprit_price),
        )))
    }
}

#[async_trait]
impl Provider for Spritpreisrechner {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn get_data(&self) -> Result<PriceList, ProviderError> {
        let responses =
            futures::future::try_join_all(self.config.types.iter().map(|&t| self.fetch_type(t))).await?;
        let partials: Vec<PartialStation> = responses.into_iter().flatten().collect();

        let options = PipelineOptions::new(&self.config, &TYPES, DistanceUnit::Kilometer, Currency::Eur)
            .with_radius_filter(self.config.radius);
        Ok(build_price_list(partials, key_by_id, &options))
    }
}

/// JSON array the servlet expects in its `data` form field:
/// `[open-flag, type, top-left lng, top-left lat, bottom-right lng, bottom-right lat]`.
/// The open flag is `""` to list open stations only and `"checked"` for all.
fn request_data(bbox: &BoundingBox, fuel_type: FuelType, show_open_only: bool) -> String {
    let open_flag = if show_open_only { "" } else { "checked" };
    serde_json::json!([
        open_flag,
        type_code(fuel_type),
        bbox.top_left.lng,
        bbox.top_left.lat,
        bbox.bottom_right.lng,
        bbox.bottom_right.lat,
    ])
    .to_string()
}

/// The upstream lists several amounts per station; the highest one counts.
fn highest_amount(prices: &[SprPrice]) -> Price {
    prices
        .iter()
        .filter_map(|p| lenient_f64(&p.amount))
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
        .map_or(Price::Unknown, Price::Known)
}
