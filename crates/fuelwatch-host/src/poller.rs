//! Runs one provider poll at a time and forwards results to the display.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use fuelwatch_core::PriceList;
use fuelwatch_providers::Provider;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A fresh `PriceList` was sent to the display.
    Delivered,
    /// The provider failed; nothing was sent.
    Failed,
    /// The previous poll had not finished yet.
    Skipped,
    /// The display side is gone.
    ChannelClosed,
}

pub struct Poller {
    provider: Arc<dyn Provider>,
    tx: mpsc::Sender<PriceList>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the poll ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Poller {
    pub fn new(provider: Arc<dyn Provider>, tx: mpsc::Sender<PriceList>) -> Self {
        Self {
            provider,
            tx,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn credential_refresh_interval(&self) -> Option<Duration> {
        self.provider.credential_refresh_interval()
    }

    /// Polls the provider once. Errors are logged, never retried; the last
    /// delivered list stays current downstream.
    pub async fn poll_once(&self) -> PollOutcome {
        let provider = self.provider.name();
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!(provider, "previous poll still in flight; skipping");
            return PollOutcome::Skipped;
        }
        let _guard = InFlight(&self.in_flight);

        match self.provider.get_data().await {
            Ok(list) => {
                tracing::info!(provider, stations = list.by_price.len(), "poll complete");
                if self.tx.send(list).await.is_err() {
                    tracing::warn!(provider, "display channel closed; dropping price list");
                    return PollOutcome::ChannelClosed;
                }
                PollOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(provider, error = %e, "poll failed");
                PollOutcome::Failed
            }
        }
    }

    /// Renews provider credentials; a failure is logged and the provider
    /// keeps its previous credentials.
    pub async fn refresh_credentials(&self) {
        let provider = self.provider.name();
        if let Err(e) = self.provider.refresh_credentials().await {
            tracing::error!(provider, error = %e, "credential refresh failed; keeping previous credentials");
        }
    }
}
