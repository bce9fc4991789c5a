//! Recognised fuel categories.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A fuel category a provider can report prices for.
///
/// Serialized lowercase (`"diesel"`, `"e5"`, ...). Parsing is
/// case-insensitive and accepts `mid-grade` as an alias of `midgrade`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Diesel,
    E5,
    E10,
    Regular,
    #[serde(alias = "mid-grade")]
    Midgrade,
    Premium,
    Gas,
    E85,
    Unl88,
}

impl FuelType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::Diesel => "diesel",
            FuelType::E5 => "e5",
            FuelType::E10 => "e10",
            FuelType::Regular => "regular",
            FuelType::Midgrade => "midgrade",
            FuelType::Premium => "premium",
            FuelType::Gas => "gas",
            FuelType::E85 => "e85",
            FuelType::Unl88 => "unl88",
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FuelType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diesel" => Ok(FuelType::Diesel),
            "e5" => Ok(FuelType::E5),
            "e10" => Ok(FuelType::E10),
            "regular" => Ok(FuelType::Regular),
            "midgrade" | "mid-grade" => Ok(FuelType::Midgrade),
            "premium" => Ok(FuelType::Premium),
            "gas" => Ok(FuelType::Gas),
            "e85" => Ok(FuelType::E85),
            "unl88" => Ok(FuelType::Unl88),
            other => Err(ConfigError::UnknownFuelType(other.to_string())),
        }
    }
}
