//! CLI commands for the Steam market seller.

pub mod fees;
pub mod quote;
pub mod sell;

pub use fees::{run_fees, FeesArgs};
pub use quote::{run_quote, QuoteArgs};
pub use sell::{run_sell, SellArgs};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use steam_seller_core::FeeSchedule;

/// Picks the publisher rate for a one-off calculation: the flag if given,
/// otherwise the wallet default.
fn publisher_fee(schedule: &FeeSchedule, requested: Option<Decimal>) -> Result<Decimal> {
    match requested {
        Some(rate) => {
            FeeSchedule::check_publisher_fee(rate).context("invalid --publisher-fee")?;
            Ok(rate)
        }
        None => Ok(schedule.default_publisher_fee_percent()),
    }
}
