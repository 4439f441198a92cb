//! Quote CLI command.
//!
//! Solves for what the seller receives when a buyer pays a given price.

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use steam_seller_core::{ConfigLoader, ReportFormatter};

/// Arguments for the quote command.
#[derive(Args, Debug, Clone)]
pub struct QuoteArgs {
    /// Price the buyer pays, in cents
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub buyer_price: i64,

    /// Publisher fee rate (e.g. 0.10). Defaults to the wallet setting.
    #[arg(long)]
    pub publisher_fee: Option<Decimal>,

    /// Config file path
    #[arg(short, long, default_value = ConfigLoader::DEFAULT_PATH)]
    pub config: String,
}

/// Runs the quote command.
///
/// # Errors
/// Returns an error if the configuration or publisher rate is invalid.
pub fn run_quote(args: QuoteArgs) -> Result<()> {
    let config = ConfigLoader::load_from(&args.config)?;
    let schedule = config.wallet.fee_schedule()?;
    let publisher = super::publisher_fee(&schedule, args.publisher_fee)?;

    let solution = schedule.solve(args.buyer_price, publisher);
    if !solution.matches_target() {
        tracing::warn!(
            buyer_price = args.buyer_price,
            closest = solution.breakdown.buyer_paid_amount,
            "no payout makes the buyer pay exactly this price"
        );
    }

    print!(
        "{}",
        ReportFormatter::format_solution(&solution, config.wallet.currency)
    );
    Ok(())
}
