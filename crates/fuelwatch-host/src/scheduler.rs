//! Background job scheduler.
//!
//! Registers the periodic provider poll and, for providers holding
//! short-lived credentials, a credential refresh job.

use std::sync::Arc;
use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::poller::Poller;

/// Builds and starts the scheduler.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it stops every job.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    poller: Arc<Poller>,
    update_interval: Duration,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_poll_job(&scheduler, Arc::clone(&poller), update_interval).await?;
    if let Some(every) = poller.credential_refresh_interval() {
        register_refresh_job(&scheduler, poller, every).await?;
    }

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_poll_job(
    scheduler: &JobScheduler,
    poller: Arc<Poller>,
    every: Duration,
) -> Result<(), JobSchedulerError> {
    tracing::info!(
        provider = poller.provider_name(),
        interval_secs = every.as_secs(),
        "scheduler: registering poll job"
    );

    let job = Job::new_repeated_async(every, move |_uuid, _lock| {
        let poller = Arc::clone(&poller);
        Box::pin(async move {
            let outcome = poller.poll_once().await;
            tracing::debug!(?outcome, "scheduler: poll finished");
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

async fn register_refresh_job(
    scheduler: &JobScheduler,
    poller: Arc<Poller>,
    every: Duration,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_repeated_async(every, move |_uuid, _lock| {
        let poller = Arc::clone(&poller);
        Box::pin(async move {
            tracing::info!(
                provider = poller.provider_name(),
                "scheduler: refreshing credentials"
            );
            poller.refresh_credentials().await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
