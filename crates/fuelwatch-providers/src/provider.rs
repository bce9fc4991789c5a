use std::time::Duration;

use async_trait::async_trait;
use fuelwatch_core::PriceList;

use crate::error::ProviderError;

/// A fuel-price upstream.
///
/// Implementations own their configuration; every call to
/// [`get_data`](Provider::get_data) builds a fresh [`PriceList`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// Registry name, e.g. `"tankerkoenig"`.
    fn name(&self) -> &'static str;

    /// Fetches, merges, fills, filters and sorts one snapshot.
    async fn get_data(&self) -> Result<PriceList, ProviderError>;

    /// How often [`refresh_credentials`](Provider::refresh_credentials)
    /// should run, for providers holding short-lived credentials.
    fn credential_refresh_interval(&self) -> Option<Duration> {
        None
    }

    /// Renews short-lived credentials. Failures keep the previous ones.
    async fn refresh_credentials(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
