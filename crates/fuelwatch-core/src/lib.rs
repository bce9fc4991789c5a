pub mod app_config;
pub mod config;
pub mod error;
pub mod fuel;
pub mod geo;
pub mod pipeline;
pub mod price;
pub mod provider_config;
pub mod station;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, GeoError};
pub use fuel::FuelType;
pub use geo::{destination_point, great_circle_distance_km, BoundingBox, Coordinate, GeoCursor};
pub use pipeline::{build_price_list, key_by_id, MergedStations, PipelineOptions};
pub use price::Price;
pub use provider_config::{load_provider_config, ProviderConfig};
pub use station::{Currency, DistanceUnit, PartialStation, PriceList, Station};
