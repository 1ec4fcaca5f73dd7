//! Daemon running the block scanner and the REST service side by side.

use std::sync::Arc;

use clap::Parser as _;
use eth_parser::Parser;
use rest_service::RestService;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::EnvFilter;

mod config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // a missing .env file is not an error
    dotenvy::dotenv().ok();
    color_eyre::install()?;
    init_logging();

    let config = config::Cli::parse().into_config()?;
    tracing::debug!(?config, "configuration loaded");
    run(config).await
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(ErrorLayer::default())
        .init();
}

async fn run(config: config::Config) -> eyre::Result<()> {
    let parser = Arc::new(Parser::new(&config.eth_parser)?);
    let cancel = CancellationToken::new();

    let scanner = parser.block_scanner(cancel.clone());
    let rest = RestService::new(&config.rest_service, Arc::clone(&parser));
    let rest_shutdown = rest.shutdown_sender();

    let mut components = JoinSet::new();
    components.spawn(scanner.process());
    components.spawn(rest.process());

    let mut outcome = Ok(());
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!("received interrupt, shutting down");
        }
        Some(joined) = components.join_next() => {
            tracing::warn!("component stopped unexpectedly, shutting down the rest");
            outcome = joined?;
        }
    }

    cancel.cancel();
    // the REST service may already be gone
    rest_shutdown.send(Ok(())).await.ok();

    while let Some(joined) = components.join_next().await {
        if let Err(error) = joined? {
            tracing::error!(?error, "component failed");
            if outcome.is_ok() {
                outcome = Err(error);
            }
        }
    }

    tracing::info!("shutdown complete");
    outcome
}
