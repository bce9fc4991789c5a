//! GasBuddy (US): HTML search results by ZIP, one page per fuel type. The
//! page has no distances, so both orders come out by price.

use std::sync::LazyLock;

use async_trait::async_trait;
use fuelwatch_core::{
    build_price_list, key_by_id, Currency, DistanceUnit, FuelType, PartialStation,
    PipelineOptions, Price, PriceList, ProviderConfig, Station,
};
use reqwest::{Client, Url};
use scraper::{Html, Selector};

use super::html::{first_text, selector, text_with_breaks};
use super::{check_types, require_zip};
use crate::error::ProviderError;
use crate::fetch::{fetch_html, join_url, parse_base_url, HttpSettings};
use crate::provider::Provider;

pub(crate) const NAME: &str = "gasbuddy";
const DEFAULT_BASE_URL: &str = "https://www.gasbuddy.com/";
const TYPES: [FuelType; 6] = [
    FuelType::Regular,
    FuelType::Midgrade,
    FuelType::Premium,
    FuelType::Diesel,
    FuelType::E85,
    FuelType::Unl88,
];

static STATION_ITEM: LazyLock<Selector> =
    LazyLock::new(|| selector("[class*=GenericStationListItem-module__stationListItem___]"));
static STATION_LINK: LazyLock<Selector> =
    LazyLock::new(|| selector("[class*=header__header3___] a[href*=station]"));
static ADDRESS: LazyLock<Selector> =
    LazyLock::new(|| selector("[class*=StationDisplay-module__address___]"));
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| selector("[class*=StationDisplayPrice-module__price___]"));

fn fuel_code(fuel_type: FuelType) -> &'static str {
    match fuel_type {
        FuelType::Midgrade => "2",
        FuelType::Premium => "3",
        FuelType::Diesel => "4",
        FuelType::E85 => "5",
        FuelType::Unl88 => "12",
        _ => "1",
    }
}

pub struct GasBuddy {
    client: Client,
    base_url: Url,
    config: ProviderConfig,
    zip: String,
}

impl GasBuddy {
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingSetting`] without `zip` and
    /// [`ProviderError::UnsupportedFuelType`] for types GasBuddy does not list.
    pub fn new(config: ProviderConfig, http: &HttpSettings) -> Result<Self, ProviderError> {
        Self::with_base_url(config, http, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// As [`GasBuddy::new`], plus [`ProviderError::InvalidBaseUrl`].
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

    fn search_url(&self, fuel_type: FuelType) -> Result<Url, ProviderError> {
        let mut url = join_url(&self.base_url, "home")?;
        url.query_pairs_mut()
            .append_pair("search", &self.zip)
            .append_pair("fuel", fuel_code(fuel_type))
            .append_pair("maxAge", "0")
            .append_pair("method", "all");
        Ok(url)
    }

    async fn fetch_type(&self, fuel_type: FuelType) -> Result<Vec<PartialStation>, ProviderError> {
        let url = self.search_url(fuel_type)?;
        let html = fetch_html(&self.client, &url).await?;
        let partials = parse_stations(&html, fuel_type);
        tracing::debug!(provider = NAME, fuel_type = %fuel_type, count = partials.len(), "parsed stations");
        Ok(partials)
    }
}

#[async_trait]
impl Provider for GasBuddy {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn get_data(&self) -> Result<PriceList, ProviderError> {
        let responses =
            futures::future::try_join_all(self.config.types.iter().map(|&t| self.fetch_type(t))).await?;
        let partials: Vec<PartialStation> = responses.into_iter().flatten().collect();

        let options = PipelineOptions::new(&self.config, &TYPES, DistanceUnit::Mile, Currency::Usd)
            .without_distance();
        Ok(build_price_list(partials, key_by_id, &options))
    }
}

/// Parses one search-result page. Entries without a station link are
/// skipped; a missing or unparsable price (`---`) becomes `Unknown`.
pub(crate) fn parse_stations(html: &str, fuel_type: FuelType) -> Vec<PartialStation> {
    let document = Html::parse_document(html);

    document
        .select(&STATION_ITEM)
        .filter_map(|item| {
            let link = item.select(&STATION_LINK).next()?;
            let href = link.value().attr("href")?;
            let id = href.trim().trim_start_matches("/station/").trim_end_matches('/');
            if id.is_empty() {
                return None;
            }
            let name = first_text(item, &STATION_LINK).unwrap_or_default();
            let address = item.select(&ADDRESS).next().map(text_with_breaks).unwrap_or_default();
            let price = first_text(item, &PRICE).map_or(Price::Unknown, |raw| parse_price(&raw));

            Some(PartialStation::new(Station::new(id, name, address), fuel_type, price))
        })
        .collect()
}

fn parse_price(raw: &str) -> Price {
    raw.trim()
        .trim_start_matches('$')
        .parse::<f64>()
        .map_or(Price::Unknown, Price::from_raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<div class="GenericStationListItem-module__stationListItem___3Jmn4">
  <h3 class="header__header3___1b1oq"><a href="/station/12345">Shell</a></h3>
  <div class="StationDisplay-module__address___2_c7v">350 5th Ave<br>New York, NY</div>
  <span class="text__xl___2MXGo StationDisplayPrice-module__price___3rARL">$3.45</span>
</div>
<div class="GenericStationListItem-module__stationListItem___3Jmn4">
  <h3 class="header__header3___1b1oq"><a href="/station/67890">Mobil</a></h3>
  <div class="StationDisplay-module__address___2_c7v">1 W 34th St<br>New York, NY</div>
  <span class="StationDisplayPrice-module__price___3rARL">---</span>
</div>
<div class="GenericStationListItem-module__stationListItem___3Jmn4">
  <h3 class="header__header3___1b1oq">Sponsored</h3>
</div>
</body></html>"#;

    #[test]
    fn parses_station_items() {
        let partials = parse_stations(PAGE, FuelType::Regular);
        assert_eq!(partials.len(), 2);

        let shell = &partials[0];
        assert_eq!(shell.station.id, "12345");
        assert_eq!(shell.station.name, "Shell");
        assert_eq!(shell.station.address, "350 5th Ave New York, NY");
        assert_eq!(shell.price, Price::Known(3.45));
        assert_eq!(shell.fuel_type, FuelType::Regular);
        assert!(shell.station.distance.abs() < f64::EPSILON);
        assert!(shell.station.coordinates.is_none());
    }

    #[test]
    fn dashes_mean_unknown_price() {
        let partials = parse_stations(PAGE, FuelType::Diesel);
        assert_eq!(partials[1].price, Price::Unknown);
    }

    #[test]
    fn page_without_items_is_empty() {
        assert!(parse_stations("<html><body>No results</body></html>", FuelType::Regular).is_empty());
    }
}
