//! nft-rarity - rank a CW721 collection by trait rarity
//!
//! Writes `{contract}_nft.csv` to the output directory. Any error aborts the
//! run with a non-zero exit status.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use nft_rarity::adapters::cli::CliApp;
use nft_rarity::adapters::fcd::{FcdClient, FcdConfig};
use nft_rarity::application::RarityPipeline;
use nft_rarity::config::{load_config, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let app = CliApp::parse();

    let mut config = match &app.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    config.endpoint.base_url = config.endpoint.get_base_url();
    app.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    init_logging(app.log_level(&config.logging.level));

    let ctx = config
        .pipeline_context(&app.contract, app.resume, app.trait_summary)
        .context("Invalid configuration")?;

    let client = FcdClient::with_config(FcdConfig {
        base_url: config.endpoint.base_url.clone(),
        timeout: Duration::from_secs(config.endpoint.timeout_secs),
    })
    .context("Failed to create FCD client")?;
    tracing::info!("Querying {} through {}", app.contract, client.base_url());

    let summary = RarityPipeline::new(client, ctx)
        .run()
        .await
        .with_context(|| format!("Rarity run failed for contract {}", app.contract))?;

    println!(
        "Ranked {} tokens -> {}",
        summary.table.len(),
        summary.table_path.display()
    );
    if let Some(path) = summary.trait_summary_path {
        println!("Trait summary -> {}", path.display());
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
