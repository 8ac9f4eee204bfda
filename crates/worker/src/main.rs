use clap::Parser;
use nftgen_worker::cli::Cli;
use nftgen_worker::config::{LogFormat, WorkerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nftgen_worker=debug,nftgen_pipeline=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    match LogFormat::from_env() {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    let cli = Cli::parse();
    let config = WorkerConfig::from_env()?;
    nftgen_worker::commands::run(cli, config).await
}
