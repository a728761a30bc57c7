//! # alerthub-gateway — device bridge
//!
//! Composition root that connects the detector unit to the status service.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialise `tracing` with the configured filter
//! - Probe the status service (informational only)
//! - Start the blocking device reader and the async delivery loop
//! - On SIGINT/SIGTERM, stop the reader and give buffered events a grace
//!   period to be delivered
//!
//! ## Dependency rule
//! Wiring only — no domain logic belongs here.

mod config;
mod supervisor;

use alerthub_adapter_http_client::HttpUpdateSink;
use alerthub_adapter_serial::{DeviceReader, transport};
use alerthub_app::gateway::Gateway;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::supervisor::ShutdownLimits;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let sink = HttpUpdateSink::new(config.api.clone())?;
    match sink.probe().await {
        Ok(()) => tracing::info!(url = %config.api.base_url, "status service reachable"),
        Err(err) => tracing::warn!(
            %err,
            url = %config.api.base_url,
            "status service not reachable yet, updates will fail until it is"
        ),
    }

    let (tx, rx) = mpsc::channel(config.gateway.queue_capacity);
    let source = transport::from_config(&config.transport);
    tracing::info!(device = %source.describe(), "starting device reader");
    let reader = DeviceReader::start(source, &config.transport, tx);

    let gateway = Gateway::new(config.sensors.clone(), sink);
    let limits = ShutdownLimits {
        grace: config.shutdown_grace(),
        reader_timeout: config.transport.read_timeout() + config.shutdown_grace(),
    };

    match supervisor::supervise(gateway, rx, reader, shutdown_signal(), limits).await {
        Ok(_) => {
            tracing::info!("alerthub-gateway stopped");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(%err, "failed to listen for SIGTERM");
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
}
