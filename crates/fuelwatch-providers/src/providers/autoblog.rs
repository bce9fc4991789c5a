//! Autoblog (US): HTML listings by ZIP. Each fuel type is read twice (default
//! order and sorted by price) over up to two pages of ten entries, so cheap
//! stations beyond the first pages are still found.

use std::sync::LazyLock;

use async_trait::async_trait;
use fuelwatch_core::{
    build_price_list, Currency, DistanceUnit, FuelType, PartialStation, PipelineOptions, Price,
    PriceList, ProviderConfig, Station,
};
use reqwest::{Client, Url};
use scraper::{Html, Selector};

use super::html::{first_attr, first_text, selector};
use super::{check_types, require_zip};
use crate::error::ProviderError;
use crate::fetch::{fetch_html, join_url, parse_base_url, HttpSettings};
use crate::pagination::fetch_paginated;
use crate::provider::Provider;

pub(crate) const NAME: &str = "autoblog";
const DEFAULT_BASE_URL: &str = "https://www.autoblog.com/";
const TYPES: [FuelType; 4] = [
    FuelType::Regular,
    FuelType::Midgrade,
    FuelType::Premium,
    FuelType::Diesel,
];
const PAGE_SIZE: usize = 10;
const MAX_PAGES: u32 = 2;

static STATION_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li.shop ul.details"));
static NAME_SEL: LazyLock<Selector> = LazyLock::new(|| selector("li.name h4"));
static ADDRESS: LazyLock<Selector> = LazyLock::new(|| selector("li.name address"));
static PRICE: LazyLock<Selector> = LazyLock::new(|| selector("li.price data.price"));
static DISTANCE: LazyLock<Selector> = LazyLock::new(|| selector("li.dist data.distance"));

pub struct Autoblog {
    client: Client,
    base_url: Url,
    config: ProviderConfig,
    zip: String,
}

impl Autoblog {
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingSetting`] without `zip` and
    /// [`ProviderError::UnsupportedFuelType`] for types other than regular,
    /// midgrade, premium and diesel.
    pub fn new(config: ProviderConfig, http: &HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(config, http, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// As [`Autoblog::new`], plus [`ProviderError::InvalidBaseUrl`].
    pub fn with_base_url(
        config: ProviderConfig,
        http: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        let zip = require_zip(NAME, &config)?;
        check_types(NAME, &config, &TYPES)?;

        Ok(Self {
            client: http.build_client()?,
            base_url: parse_base_url(base_url)?,
            config,
            zip,
        })
    }

    async fn fetch_listing(&self, fuel_type: FuelType, path: String) -> Vec<PartialStation> {
        let path = path.as_str();
        fetch_paginated(path, PAGE_SIZE, MAX_PAGES, move |page| async move {
            let url = join_url(&self.base_url, &format!("{path}/pg-{page}"))?;
            let html = fetch_html(&self.client, &url).await?;
            Ok(parse_listing(&html, fuel_type))
        })
        .await
    }
}

#[async_trait]
impl Provider for Autoblog {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn get_data(&self) -> Result<PriceList, ProviderError> {
        let listings = self.config.types.iter().flat_map(|&t| {
            listing_paths(&self.zip, t)
                .into_iter()
                .map(move |path| self.fetch_listing(t, path))
        });
        let partials: Vec<PartialStation> = futures::future::join_all(listings)
            .await
            .into_iter()
            .flatten()
            .collect();

        let options = PipelineOptions::new(&self.config, &TYPES, DistanceUnit::Mile, Currency::Usd)
            .with_radius_filter(self.config.radius);
        Ok(build_price_list(partials, station_key, &options))
    }
}

/// Listing has no station id; name and address identify a station.
fn station_key(partial: &PartialStation) -> String {
    format!("{}-{}", partial.station.name, partial.station.address)
}

/// Default and price-sorted listing paths for one fuel type.
pub(crate) fn listing_paths(zip: &str, fuel_type: FuelType) -> [String; 2] {
    let suffix = match fuel_type {
        FuelType::Regular => "",
        FuelType::Midgrade => "/mid-grade",
        FuelType::Premium => "/premium",
        _ => "/diesel",
    };
    let base = format!("{zip}-gas-prices{suffix}");
    [base.clone(), format!("{base}/sort-price")]
}

pub(crate) fn parse_listing(html: &str, fuel_type: FuelType) -> Vec<PartialStation> {
    let document = Html::parse_document(html);

    document
        .select(&STATION_ITEM)
        .filter_map(|item| {
            let name = first_text(item, &NAME_SEL).filter(|n| !n.is_empty())?;
            let address = first_text(item, &ADDRESS).unwrap_or_default();
            let price = first_attr(item, &PRICE, "value")
                .and_then(|v| v.parse::<f64>().ok())
                .map_or(Price::Unknown, Price::from_raw);
            let distance = first_attr(item, &DISTANCE, "value")
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(0.0);

            let id = format!("{name}-{address}");
            let mut station = Station::new(id, name, address);
            station.distance = distance;
            Some(PartialStation::new(station, fuel_type, price))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, address: &str, price: &str, distance: &str) -> String {
        format!(
            r#"<li class="shop"><ul class="details">
  <li class="name"><h4>{name}</h4><address>{address}</address></li>
  <li class="price"><data class="price" value="{price}">${price}</data></li>
  <li class="dist"><data class="distance" value="{distance}">{distance} mi</data></li>
</ul></li>"#
        )
    }

    #[test]
    fn listing_paths_use_type_suffix() {
        assert_eq!(
            listing_paths("10001", FuelType::Regular),
            ["10001-gas-prices".to_string(), "10001-gas-prices/sort-price".to_string()]
        );
        assert_eq!(listing_paths("10001", FuelType::Midgrade)[0], "10001-gas-prices/mid-grade");
        assert_eq!(
            listing_paths("10001", FuelType::Diesel)[1],
            "10001-gas-prices/diesel/sort-price"
        );
    }

    #[test]
    fn parses_listing_items() {
        let html = format!(
            "<ul>{}{}</ul>",
            item("Exxon", "100 Broadway, New York, NY", "3.59", "0.4"),
            item("Sunoco", "20 Hudson St, New York, NY", "", "1.8")
        );
        let partials = parse_listing(&html, FuelType::Premium);
        assert_eq!(partials.len(), 2);
        assert_eq!(partials[0].station.name, "Exxon");
        assert_eq!(partials[0].price, Price::Known(3.59));
        assert!((partials[0].station.distance - 0.4).abs() < 1e-9);
        assert_eq!(partials[1].price, Price::Unknown);
        assert_eq!(station_key(&partials[1]), "Sunoco-20 Hudson St, New York, NY");
    }
}
