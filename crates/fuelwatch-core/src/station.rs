//! Normalized station records and the `PriceList` handed to the display.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Coordinate, FuelType, Price};

/// A fuel station after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Provider-specific stable key; also the merge key unless the adapter
    /// supplies a different one.
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
    /// Distance from the configured origin in the list's [`DistanceUnit`];
    /// `0` when the provider cannot tell.
    pub distance: f64,
    pub is_open: bool,
    pub prices: BTreeMap<FuelType, Price>,
}

impl Station {
    /// Creates a station with no prices, open, at distance `0`.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            coordinates: None,
            distance: 0.0,
            is_open: true,
            prices: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn price(&self, fuel_type: FuelType) -> Option<&Price> {
        self.prices.get(&fuel_type)
    }
}

/// One station observation carrying the price of a single fuel type.
///
/// Upstreams are queried per fuel type, so the same physical station shows
/// up once per type; the merge step folds these back together.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialStation {
    pub station: Station,
    pub fuel_type: FuelType,
    pub price: Price,
}

impl PartialStation {
    #[must_use]
    pub fn new(station: Station, fuel_type: FuelType, price: Price) -> Self {
        Self {
            station,
            fuel_type,
            price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Kilometer,
    Mile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Currency {
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "AUD")]
    Aud,
}

/// Result of one poll cycle.
///
/// `by_price` and `by_distance` hold the same stations in different orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceList {
    /// Every fuel type the provider is able to return.
    pub types: Vec<FuelType>,
    pub unit: DistanceUnit,
    pub currency: Currency,
    pub by_price: Vec<Station>,
    pub by_distance: Vec<Station>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_list_serializes_camel_case() {
        let mut station = Station::new("1", "Aral", "10115 Berlin - Hauptstr. 1");
        station.prices.insert(FuelType::Diesel, Price::Known(1.659));
        station.prices.insert(FuelType::E5, Price::Above(1.899));

        let list = PriceList {
            types: vec![FuelType::Diesel, FuelType::E5, FuelType::E10],
            unit: DistanceUnit::Kilometer,
            currency: Currency::Eur,
            by_price: vec![station.clone()],
            by_distance: vec![station],
        };

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["unit"], "kilometer");
        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["types"][2], "e10");
        assert_eq!(json["byPrice"][0]["isOpen"], true);
        assert_eq!(json["byPrice"][0]["prices"]["diesel"], 1.659);
        assert_eq!(json["byDistance"][0]["prices"]["e5"], ">1.899");
        assert!(json["byPrice"][0].get("coordinates").is_none());
    }
}
