//! Gaffer - fantasy-league penalty-card pipeline - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Fantasy-league penalty-card pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via GAFFER_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    gaffer_telemetry::init_logging()?;

    info!("Starting gaffer v{}", env!("CARGO_PKG_VERSION"));

    let config = match args.config.or_else(|| std::env::var("GAFFER_CONFIG").ok()) {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            gaffer_app::AppConfig::from_file(&path)?
        }
        None => gaffer_app::AppConfig::load()?,
    };
    info!(provider = %config.provider_base_url, workers = config.workers, "Configuration loaded");

    let app = gaffer_app::Application::new(config).await?;
    app.run().await?;

    Ok(())
}
