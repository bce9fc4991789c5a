use super::*;

fn station(id: &str, distance: f64) -> Station {
    let mut s = Station::new(id, format!("Station {id}"), format!("{id} Main St"));
    s.distance = distance;
    s
}

fn partial(id: &str, fuel_type: FuelType, price: Price) -> PartialStation {
    PartialStation::new(station(id, 0.0), fuel_type, price)
}

fn priced(id: &str, distance: f64, prices: &[(FuelType, Price)]) -> Station {
    let mut s = station(id, distance);
    s.prices.extend(prices.iter().copied());
    s
}

fn options(types: &[FuelType], sort_by: FuelType) -> PipelineOptions {
    PipelineOptions {
        types: types.to_vec(),
        sort_by,
        show_open_only: false,
        max_radius: None,
        distance_sortable: true,
        provider_types: vec![FuelType::Diesel, FuelType::E5, FuelType::E10],
        unit: DistanceUnit::Kilometer,
        currency: Currency::Eur,
    }
}

fn ids(stations: &[Station]) -> Vec<&str> {
    stations.iter().map(|s| s.id.as_str()).collect()
}

#[test]
fn merge_folds_partials_by_key() {
    let merged = merge_prices(
        vec![
            partial("A", FuelType::Diesel, Price::Known(1.50)),
            partial("A", FuelType::E5, Price::Known(1.70)),
            partial("B", FuelType::Diesel, Price::Known(1.60)),
        ],
        key_by_id,
    );

    assert_eq!(ids(&merged.stations), vec!["A", "B"]);
    assert_eq!(merged.stations[0].price(FuelType::Diesel), Some(&Price::Known(1.50)));
    assert_eq!(merged.stations[0].price(FuelType::E5), Some(&Price::Known(1.70)));
    assert_eq!(merged.stations[1].price(FuelType::Diesel), Some(&Price::Known(1.60)));
    assert_eq!(merged.stations[1].price(FuelType::E5), None);
    assert_eq!(merged.max_prices_by_type.get(&FuelType::Diesel), Some(&1.60));
    assert_eq!(merged.max_prices_by_type.get(&FuelType::E5), Some(&1.70));
}

#[test]
fn merge_keeps_first_station_record() {
    let mut later = station("A", 9.0);
    later.name = "Renamed".to_string();
    let merged = merge_prices(
        vec![
            PartialStation::new(station("A", 1.0), FuelType::Diesel, Price::Known(1.5)),
            PartialStation::new(later, FuelType::E5, Price::Known(1.7)),
        ],
        key_by_id,
    );
    assert_eq!(merged.stations.len(), 1);
    assert_eq!(merged.stations[0].name, "Station A");
    assert!((merged.stations[0].distance - 1.0).abs() < f64::EPSILON);
}

#[test]
fn merge_does_not_overwrite_known_with_unknown() {
    let merged = merge_prices(
        vec![
            partial("A", FuelType::Diesel, Price::Known(1.50)),
            partial("A", FuelType::Diesel, Price::Unknown),
        ],
        key_by_id,
    );
    assert_eq!(merged.stations[0].price(FuelType::Diesel), Some(&Price::Known(1.50)));
}

#[test]
fn merge_later_known_replaces_earlier_value() {
    let merged = merge_prices(
        vec![
            partial("A", FuelType::Diesel, Price::Unknown),
            partial("A", FuelType::Diesel, Price::Known(1.45)),
        ],
        key_by_id,
    );
    assert_eq!(merged.stations[0].price(FuelType::Diesel), Some(&Price::Known(1.45)));
}

#[test]
fn merge_max_ignores_unknown_prices() {
    let merged = merge_prices(
        vec![
            partial("A", FuelType::E10, Price::Unknown),
            partial("B", FuelType::E10, Price::Known(1.61)),
            partial("C", FuelType::E10, Price::Known(1.59)),
            partial("D", FuelType::Diesel, Price::Unknown),
        ],
        key_by_id,
    );
    assert_eq!(merged.max_prices_by_type.get(&FuelType::E10), Some(&1.61));
    assert!(!merged.max_prices_by_type.contains_key(&FuelType::Diesel));
}

#[test]
fn merge_uses_supplied_key_function() {
    let by_name = |p: &PartialStation| format!("{}|{}", p.station.name, p.station.address);
    let mut other_id = station("X", 0.0);
    other_id.name = "Station A".to_string();
    other_id.address = "A Main St".to_string();
    let merged = merge_prices(
        vec![
            partial("A", FuelType::Diesel, Price::Known(1.5)),
            PartialStation::new(other_id, FuelType::E5, Price::Known(1.7)),
        ],
        by_name,
    );
    assert_eq!(merged.stations.len(), 1);
    assert_eq!(merged.stations[0].price(FuelType::E5), Some(&Price::Known(1.7)));
}

#[test]
fn fill_uses_max_of_type() {
    let mut merged = merge_prices(
        vec![
            partial("A", FuelType::Diesel, Price::Known(1.50)),
            partial("A", FuelType::E5, Price::Known(1.70)),
            partial("B", FuelType::Diesel, Price::Known(1.60)),
        ],
        key_by_id,
    );
    fill_missing_prices(
        &mut merged.stations,
        &[FuelType::Diesel, FuelType::E5],
        &merged.max_prices_by_type,
    );

    let b = &merged.stations[1];
    assert_eq!(b.price(FuelType::E5), Some(&Price::Above(1.70)));
    let json = serde_json::to_value(b).unwrap();
    assert_eq!(json["prices"]["e5"], ">1.7");
}

#[test]
fn fill_marks_unreported_type_unavailable() {
    let mut stations = vec![priced("A", 0.0, &[(FuelType::Diesel, Price::Known(1.5))])];
    let max = HashMap::from([(FuelType::Diesel, 1.5)]);
    fill_missing_prices(&mut stations, &[FuelType::Diesel, FuelType::E10], &max);
    assert_eq!(stations[0].price(FuelType::E10), Some(&Price::Unavailable));
}

#[test]
fn fill_is_idempotent() {
    let mut stations = vec![
        priced("A", 0.0, &[(FuelType::Diesel, Price::Known(1.5))]),
        priced("B", 0.0, &[(FuelType::Diesel, Price::Unknown)]),
    ];
    let types = [FuelType::Diesel, FuelType::E5];
    let max = HashMap::from([(FuelType::Diesel, 1.5)]);

    fill_missing_prices(&mut stations, &types, &max);
    let once = stations.clone();
    fill_missing_prices(&mut stations, &types, &max);
    assert_eq!(stations, once);
    assert_eq!(stations[1].price(FuelType::Diesel), Some(&Price::Above(1.5)));
}

#[test]
fn fill_covers_every_configured_type() {
    let mut stations = vec![station("A", 0.0), station("B", 0.0)];
    let types = [FuelType::Regular, FuelType::Premium, FuelType::Diesel];
    fill_missing_prices(&mut stations, &types, &HashMap::new());
    for s in &stations {
        for t in types {
            assert!(s.price(t).is_some(), "{} lacks {t}", s.id);
        }
    }
}

#[test]
fn sort_by_price_puts_placeholders_last() {
    let mut stations = vec![
        priced("1", 0.0, &[(FuelType::Diesel, Price::Known(1.50))]),
        priced("2", 0.0, &[(FuelType::Diesel, Price::Above(1.60))]),
        priced("3", 0.0, &[(FuelType::Diesel, Price::Known(1.40))]),
    ];
    sort_by_price(&mut stations, FuelType::Diesel);
    assert_eq!(ids(&stations), vec!["3", "1", "2"]);
}

#[test]
fn sort_by_price_is_stable_among_placeholders() {
    let mut stations = vec![
        priced("a", 0.0, &[(FuelType::E5, Price::Unavailable)]),
        priced("b", 0.0, &[(FuelType::E5, Price::Above(1.9))]),
        priced("c", 0.0, &[(FuelType::E5, Price::Known(1.8))]),
        priced("d", 0.0, &[]),
    ];
    sort_by_price(&mut stations, FuelType::E5);
    assert_eq!(ids(&stations), vec!["c", "a", "b", "d"]);
}

#[test]
fn sort_by_distance_is_stable() {
    let mut stations = vec![
        station("far", 4.2),
        station("tie-1", 1.0),
        station("near", 0.3),
        station("tie-2", 1.0),
    ];
    sort_by_distance(&mut stations);
    assert_eq!(ids(&stations), vec!["near", "tie-1", "tie-2", "far"]);
}

#[test]
fn radius_filter_drops_distant_stations() {
    let stations = vec![
        priced("s3", 3.0, &[(FuelType::E5, Price::Known(1.7))]),
        priced("s7", 7.0, &[(FuelType::E5, Price::Known(1.6))]),
        priced("s1", 1.0, &[(FuelType::E5, Price::Known(1.8))]),
    ];
    let opts = options(&[FuelType::E5], FuelType::E5).with_radius_filter(5.0);
    let mut kept = retain_stations(stations, &opts);
    sort_by_distance(&mut kept);
    assert_eq!(ids(&kept), vec!["s1", "s3"]);
}

#[test]
fn no_data_filter_drops_station_without_known_price() {
    let stations = vec![
        priced("empty", 0.0, &[(FuelType::Diesel, Price::Unknown), (FuelType::E5, Price::Unknown)]),
        priced("ok", 0.0, &[(FuelType::Diesel, Price::Known(1.5)), (FuelType::E5, Price::Unknown)]),
    ];
    let kept = retain_stations(stations, &options(&[FuelType::Diesel, FuelType::E5], FuelType::Diesel));
    assert_eq!(ids(&kept), vec!["ok"]);
}

#[test]
fn open_filter_applies_only_when_enabled() {
    let mut closed = priced("closed", 0.0, &[(FuelType::Diesel, Price::Known(1.5))]);
    closed.is_open = false;
    let open = priced("open", 0.0, &[(FuelType::Diesel, Price::Known(1.6))]);

    let mut opts = options(&[FuelType::Diesel], FuelType::Diesel);
    let kept = retain_stations(vec![closed.clone(), open.clone()], &opts);
    assert_eq!(kept.len(), 2);

    opts.show_open_only = true;
    let kept = retain_stations(vec![closed, open], &opts);
    assert_eq!(ids(&kept), vec!["open"]);
}

#[test]
fn build_price_list_orders_share_the_same_stations() {
    let partials = vec![
        PartialStation::new(station("A", 2.5), FuelType::Diesel, Price::Known(1.55)),
        PartialStation::new(station("B", 0.8), FuelType::Diesel, Price::Known(1.62)),
        PartialStation::new(station("C", 1.7), FuelType::Diesel, Price::Unknown),
        PartialStation::new(station("C", 1.7), FuelType::E5, Price::Known(1.79)),
        PartialStation::new(station("A", 2.5), FuelType::E5, Price::Known(1.74)),
    ];
    let list = build_price_list(
        partials,
        key_by_id,
        &options(&[FuelType::Diesel, FuelType::E5], FuelType::Diesel),
    );

    assert_eq!(ids(&list.by_price), vec!["A", "B", "C"]);
    assert_eq!(ids(&list.by_distance), vec!["B", "C", "A"]);
    assert_eq!(list.by_price[1].price(FuelType::E5), Some(&Price::Above(1.79)));
    assert_eq!(list.by_price[2].price(FuelType::Diesel), Some(&Price::Above(1.62)));

    let mut a: Vec<&str> = ids(&list.by_price);
    let mut b: Vec<&str> = ids(&list.by_distance);
    a.sort_unstable();
    b.sort_unstable();
    assert_eq!(a, b);
    assert_eq!(list.types, vec![FuelType::Diesel, FuelType::E5, FuelType::E10]);
}

#[test]
fn build_price_list_distance_ties_keep_input_order() {
    let partials = vec![
        PartialStation::new(station("first", 1.0), FuelType::Diesel, Price::Known(1.70)),
        PartialStation::new(station("second", 1.0), FuelType::Diesel, Price::Known(1.50)),
        PartialStation::new(station("near", 0.4), FuelType::Diesel, Price::Known(1.60)),
    ];
    let list = build_price_list(partials, key_by_id, &options(&[FuelType::Diesel], FuelType::Diesel));

    assert_eq!(ids(&list.by_price), vec!["second", "near", "first"]);
    assert_eq!(ids(&list.by_distance), vec!["near", "first", "second"]);
}

#[test]
fn build_price_list_without_distance_repeats_price_order() {
    let partials = vec![
        PartialStation::new(station("A", 0.0), FuelType::Regular, Price::Known(3.45)),
        PartialStation::new(station("B", 0.0), FuelType::Regular, Price::Known(3.19)),
    ];
    let opts = options(&[FuelType::Regular], FuelType::Regular).without_distance();
    let list = build_price_list(partials, key_by_id, &opts);
    assert_eq!(ids(&list.by_price), vec!["B", "A"]);
    assert_eq!(list.by_distance, list.by_price);
}

#[test]
fn build_price_list_handles_empty_input() {
    let list = build_price_list(
        Vec::new(),
        key_by_id,
        &options(&[FuelType::Diesel], FuelType::Diesel),
    );
    assert!(list.by_price.is_empty());
    assert!(list.by_distance.is_empty());
}

#[test]
fn options_follow_provider_config() {
    let mut config = ProviderConfig::new("tankerkoenig", vec![FuelType::E5, FuelType::Diesel]).unwrap();
    config.show_open_only = true;
    let opts = PipelineOptions::new(
        &config,
        &[FuelType::Diesel, FuelType::E5, FuelType::E10],
        DistanceUnit::Kilometer,
        Currency::Eur,
    );
    assert_eq!(opts.sort_by, FuelType::E5);
    assert!(opts.show_open_only);
    assert!(opts.max_radius.is_none());
    assert!(opts.distance_sortable);
}
