//! Merge, fill, filter and sort: turns per-type partial records into a
//! [`PriceList`].
//!
//! The steps run in a fixed order. Merging finishes before filling starts, so
//! the maxima used for placeholders cover every partial of the poll.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{Currency, DistanceUnit, FuelType, PartialStation, Price, PriceList, ProviderConfig, Station};

/// Output of [`merge_prices`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergedStations {
    /// One entry per key, in first-seen order.
    pub stations: Vec<Station>,
    /// Highest `Known` price seen per fuel type.
    pub max_prices_by_type: HashMap<FuelType, f64>,
}

/// How a provider's stations are post-processed.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Configured fuel types; every station ends up with a price for each.
    pub types: Vec<FuelType>,
    pub sort_by: FuelType,
    pub show_open_only: bool,
    /// Drop stations farther away than this, when set.
    pub max_radius: Option<f64>,
    /// When `false`, `by_distance` repeats the `by_price` order.
    pub distance_sortable: bool,
    /// Every type the provider can return; copied into `PriceList::types`.
    pub provider_types: Vec<FuelType>,
    pub unit: DistanceUnit,
    pub currency: Currency,
}

impl PipelineOptions {
    #[must_use]
    pub fn new(
        config: &ProviderConfig,
        provider_types: &[FuelType],
        unit: DistanceUnit,
        currency: Currency,
    ) -> Self {
        Self {
            types: config.types.clone(),
            sort_by: config.sort_by,
            show_open_only: config.show_open_only,
            max_radius: None,
            distance_sortable: true,
            provider_types: provider_types.to_vec(),
            unit,
            currency,
        }
    }

    #[must_use]
    pub fn with_radius_filter(mut self, radius: f64) -> Self {
        self.max_radius = Some(radius);
        self
    }

    #[must_use]
    pub fn without_distance(mut self) -> Self {
        self.distance_sortable = false;
        self
    }
}

/// Key function for upstreams with a stable station id.
#[must_use]
pub fn key_by_id(partial: &PartialStation) -> String {
    partial.station.id.clone()
}

/// Folds partials sharing a key into one station.
///
/// The first partial of a key provides the station record; later ones only
/// contribute their price. An `Unknown` price never replaces a `Known` one.
pub fn merge_prices<F>(partials: Vec<PartialStation>, key_fn: F) -> MergedStations
where
    F: Fn(&PartialStation) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut stations: Vec<Station> = Vec::new();
    let mut max_prices_by_type: HashMap<FuelType, f64> = HashMap::new();

    for partial in partials {
        let key = key_fn(&partial);
        let PartialStation {
            station,
            fuel_type,
            price,
        } = partial;

        if let Price::Known(value) = price {
            max_prices_by_type
                .entry(fuel_type)
                .and_modify(|max| {
                    if value > *max {
                        *max = value;
                    }
                })
                .or_insert(value);
        }

        match index.get(&key) {
            Some(&slot) => {
                let existing = &mut stations[slot];
                let keep_existing = price.is_unknown()
                    && existing.price(fuel_type).is_some_and(Price::is_known);
                if !keep_existing {
                    existing.prices.insert(fuel_type, price);
                }
            }
            None => {
                let mut station = station;
                station.prices.insert(fuel_type, price);
                index.insert(key, stations.len());
                stations.push(station);
            }
        }
    }

    MergedStations {
        stations,
        max_prices_by_type,
    }
}

/// Replaces absent or `Unknown` prices of the configured types with
/// `Above(max)` or, when no station reported the type, `Unavailable`.
///
/// Running it twice changes nothing.
pub fn fill_missing_prices(
    stations: &mut [Station],
    types: &[FuelType],
    max_prices_by_type: &HashMap<FuelType, f64>,
) {
    for station in stations {
        for &fuel_type in types {
            let slot = station.prices.entry(fuel_type).or_insert(Price::Unknown);
            if slot.is_unknown() {
                *slot = max_prices_by_type
                    .get(&fuel_type)
                    .map_or(Price::Unavailable, |&max| Price::Above(max));
            }
        }
    }
}

/// Applies the no-data, open and radius filters.
#[must_use]
pub fn retain_stations(stations: Vec<Station>, options: &PipelineOptions) -> Vec<Station> {
    stations
        .into_iter()
        .filter(|station| {
            options
                .types
                .iter()
                .any(|&t| station.price(t).is_some_and(Price::is_known))
        })
        .filter(|station| !options.show_open_only || station.is_open)
        .filter(|station| options.max_radius.map_or(true, |r| station.distance <= r))
        .collect()
}

/// Stable ascending sort on `distance`.
pub fn sort_by_distance(stations: &mut [Station]) {
    stations.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// Stable ascending sort on the `Known` price of `fuel_type`; everything else
/// goes last.
pub fn sort_by_price(stations: &mut [Station], fuel_type: FuelType) {
    stations.sort_by(|a, b| {
        let pa = a.price(fuel_type).and_then(Price::known);
        let pb = b.price(fuel_type).and_then(Price::known);
        match (pa, pb) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

/// Runs merge, fill, filter and both sorts.
pub fn build_price_list<F>(
    partials: Vec<PartialStation>,
    key_fn: F,
    options: &PipelineOptions,
) -> PriceList
where
    F: Fn(&PartialStation) -> String,
{
    let partial_count = partials.len();
    let MergedStations {
        mut stations,
        max_prices_by_type,
    } = merge_prices(partials, key_fn);
    let merged_count = stations.len();

    fill_missing_prices(&mut stations, &options.types, &max_prices_by_type);
    let mut by_price = retain_stations(stations, options);

    // Distance ties keep input order, so sort a copy taken before the price sort.
    let by_distance = if options.distance_sortable {
        let mut by_distance = by_price.clone();
        sort_by_distance(&mut by_distance);
        Some(by_distance)
    } else {
        None
    };

    sort_by_price(&mut by_price, options.sort_by);
    let by_distance = by_distance.unwrap_or_else(|| by_price.clone());

    tracing::debug!(
        partials = partial_count,
        merged = merged_count,
        retained = by_price.len(),
        "built price list"
    );

    PriceList {
        types: options.provider_types.clone(),
        unit: options.unit,
        currency: options.currency,
        by_price,
        by_distance,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
