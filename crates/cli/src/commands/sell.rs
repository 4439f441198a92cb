//! Sell CLI command.
//!
//! Loads the inventory of the logged-in account and lists every marketable
//! item at the current highest buy order.

use anyhow::{Context, Result};
use clap::Args;
use steam_seller_community::{
    SteamCommunityClient, SteamCommunityConfig, SteamSession, SteamSessionConfig,
};
use steam_seller_core::{
    ConfigLoader, InventorySource, PipelineOptions, ReportFormatter, SellPipeline,
};

/// Arguments for the sell command.
#[derive(Args, Debug, Clone)]
pub struct SellArgs {
    /// Config file path
    #[arg(short, long, default_value = ConfigLoader::DEFAULT_PATH)]
    pub config: String,

    /// Look up prices and print the plan without placing listings
    #[arg(long)]
    pub dry_run: bool,

    /// Optional log file path (logs to file instead of stderr)
    #[arg(long)]
    pub log_file: Option<String>,
}

/// Runs the sell command.
///
/// # Errors
/// Returns an error if configuration or session setup fails, or if the
/// pipeline aborts on a marketplace error.
pub async fn run_sell(args: SellArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)?;
    let schedule = config.wallet.fee_schedule()?;

    let session = SteamSession::from_env(SteamSessionConfig::default())
        .context("failed to read Steam session from environment")?;
    let client_config = SteamCommunityConfig::from(&config.community);
    let client = SteamCommunityClient::new(client_config, session)?;

    tracing::info!(
        steam_id = client.steam_id(),
        app_id = config.inventory.app_id,
        context_id = config.inventory.context_id,
        "Loading inventory"
    );
    let items = client
        .inventory(
            config.inventory.app_id,
            config.inventory.context_id,
            config.inventory.tradable_only,
        )
        .await
        .context("failed to load inventory")?;

    let options = PipelineOptions {
        dry_run: args.dry_run,
    };
    let pipeline = SellPipeline::new(schedule, config.wallet.currency, client)
        .with_options(options);
    let report = pipeline.run(items).await.context("sell run aborted")?;

    println!("{}", ReportFormatter::format(&report));
    Ok(())
}
