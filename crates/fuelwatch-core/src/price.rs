//! Tagged price values.
//!
//! Upstreams disagree on how a missing price looks (`-1`, `0`, `false`,
//! absent key). Adapters map every such value to [`Price::Unknown`] through
//! [`Price::from_raw`]; the filling step later replaces `Unknown` with one of
//! the placeholder variants.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    /// A genuine positive price.
    Known(f64),
    /// No price obtained yet.
    Unknown,
    /// More expensive than any observed price of this type.
    Above(f64),
    /// No station reported this type at all.
    Unavailable,
}

impl Price {
    /// Maps a raw upstream number to a price. Zero, negative and non-finite
    /// values are all treated as unknown.
    #[must_use]
    pub fn from_raw(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Price::Known(value)
        } else {
            Price::Unknown
        }
    }

    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Price::Unknown, Price::from_raw)
    }

    #[must_use]
    pub fn known(&self) -> Option<f64> {
        match self {
            Price::Known(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Price::Known(_))
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Price::Unknown)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Known(v) => serializer.serialize_f64(*v),
            Price::Above(max) => serializer.serialize_str(&format!(">{max}")),
            Price::Unknown | Price::Unavailable => serializer.serialize_none(),
        }
    }
}
