mod display;
mod poller;
mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use fuelwatch_core::{load_app_config, load_provider_config};
use fuelwatch_providers::{build_provider, HttpSettings, Provider};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::poller::{PollOutcome, Poller};

#[derive(Debug, Parser)]
#[command(name = "fuelwatch", about = "Fuel price poller for a smart-mirror display")]
struct Cli {
    /// Provider config file; overrides FUELWATCH_PROVIDER_CONFIG.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Poll once, print the result and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app = load_app_config()?;
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(app.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let path = cli.config.unwrap_or_else(|| app.provider_config_path.clone());
    let provider_config = load_provider_config(&path)
        .with_context(|| format!("loading provider config {}", path.display()))?
        .with_credentials(app.api_key.clone(), app.api_secret.clone());

    let http = HttpSettings {
        timeout_secs: app.request_timeout_secs,
        user_agent: app.user_agent.clone(),
    };
    let provider: Arc<dyn Provider> = match build_provider(&provider_config, &http) {
        Ok(p) => Arc::from(p),
        Err(e) => {
            tracing::error!(error = %e, provider = %provider_config.provider, "failed to start provider");
            return Err(e.into());
        }
    };
    tracing::info!(
        provider = provider.name(),
        types = ?provider_config.types,
        interval_secs = app.update_interval_secs,
        "fuelwatch starting"
    );

    let (tx, rx) = mpsc::channel(4);
    let display = tokio::spawn(display::run(rx, std::io::stdout()));
    let poller = Arc::new(Poller::new(provider, tx));

    if poller.credential_refresh_interval().is_some() {
        poller.refresh_credentials().await;
    }

    if cli.once {
        let outcome = poller.poll_once().await;
        drop(poller);
        display.await?;
        if outcome != PollOutcome::Delivered {
            anyhow::bail!("poll did not produce a price list ({outcome:?})");
        }
        return Ok(());
    }

    poller.poll_once().await;
    let mut scheduler = scheduler::build_scheduler(Arc::clone(&poller), app.update_interval()).await?;

    shutdown_signal().await;
    scheduler.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, stopping scheduler");
}
