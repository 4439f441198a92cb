//! Fees CLI command.
//!
//! Shows the fees Steam adds on top of a payout.

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use steam_seller_core::{ConfigLoader, ReportFormatter};

/// Arguments for the fees command.
#[derive(Args, Debug, Clone)]
pub struct FeesArgs {
    /// Amount the seller receives, in cents
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub received: i64,

    /// Publisher fee rate (e.g. 0.10). Defaults to the wallet setting.
    #[arg(long)]
    pub publisher_fee: Option<Decimal>,

    /// Config file path
    #[arg(short, long, default_value = ConfigLoader::DEFAULT_PATH)]
    pub config: String,
}

/// Runs the fees command.
///
/// # Errors
/// Returns an error if the configuration or publisher rate is invalid.
pub fn run_fees(args: FeesArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)?;
    let schedule = config.wallet.fee_schedule()?;
    let publisher = super::publisher_fee(&schedule, args.publisher_fee)?;

    let breakdown = schedule.decompose(args.received, publisher);
    print!(
        "{}",
        ReportFormatter::format_breakdown(&breakdown, config.wallet.currency)
    );
    Ok(())
}
