//! Sequential lookup and sell pipeline.
//!
//! For every marketable item: look up the highest buy order, solve for the
//! amount the seller receives at that buyer price, then list the profitable
//! items from the highest payout down. Marketplace calls are awaited one at a
//! time; no two are ever in flight together.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::{info, warn};

use crate::currency::Currency;
use crate::error::MarketError;
use crate::fees::FeeSchedule;
use crate::solver::PriceSolution;
use crate::traits::MarketplaceClient;
use crate::types::{InventoryItem, ListingConfirmation, ListingRequest};

/// Knobs for a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Plan listings without submitting them.
    pub dry_run: bool,
}

/// A listing that went through the sell phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedListing {
    pub request: ListingRequest,
    /// `None` on dry runs.
    pub confirmation: Option<ListingConfirmation>,
}

/// What a pipeline run did, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Wallet currency the prices are in.
    pub currency: Currency,
    /// Number of items looked up on the market.
    pub looked_up: usize,
    /// Listings in the order they were submitted.
    pub listed: Vec<SubmittedListing>,
    /// Items skipped because the market had no listings for them.
    pub no_listings: Vec<String>,
    /// Items whose payout at the highest buy order was zero.
    pub unprofitable: Vec<String>,
    /// Items whose price could not be solved exactly.
    pub approximate: Vec<String>,
    /// Items skipped because they carry a negative publisher fee.
    pub invalid_fee: Vec<String>,
    /// True if nothing was submitted.
    pub dry_run: bool,
}

impl PipelineReport {
    /// Sum of what the seller receives across all listings, in cents.
    #[must_use]
    pub fn total_received(&self) -> i64 {
        self.listed
            .iter()
            .map(|l| l.request.price() * i64::from(l.request.quantity))
            .sum()
    }
}

struct PricedItem {
    item: InventoryItem,
    solution: PriceSolution,
}

/// Drives the fee solver across an inventory against a marketplace client.
pub struct SellPipeline<M>
where
    M: MarketplaceClient,
{
    schedule: FeeSchedule,
    currency: Currency,
    client: M,
    options: PipelineOptions,
}

impl<M> SellPipeline<M>
where
    M: MarketplaceClient,
{
    pub fn new(schedule: FeeSchedule, currency: Currency, client: M) -> Self {
        Self {
            schedule,
            currency,
            client,
            options: PipelineOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn client(&self) -> &M {
        &self.client
    }

    /// Runs lookup, planning and selling over `inventory`.
    ///
    /// # Errors
    ///
    /// Returns the first lookup error other than "no listings", or the first
    /// submission error. Remaining work is abandoned.
    pub async fn run(&self, inventory: Vec<InventoryItem>) -> Result<PipelineReport, MarketError> {
        let mut report = PipelineReport {
            currency: self.currency,
            dry_run: self.options.dry_run,
            ..PipelineReport::default()
        };

        let priced = self.look_up(inventory, &mut report).await?;
        let plan = self.plan(priced, &mut report);
        self.sell(plan, &mut report).await?;

        Ok(report)
    }

    async fn look_up(
        &self,
        inventory: Vec<InventoryItem>,
        report: &mut PipelineReport,
    ) -> Result<Vec<PricedItem>, MarketError> {
        info!("Looking up market info");

        let mut priced = Vec::new();
        for item in inventory.into_iter().filter(|item| item.marketable) {
            let Some(publisher_fee) = self.publisher_fee_for(&item) else {
                report.invalid_fee.push(item.market_hash_name);
                continue;
            };

            info!("Looking up market info for {}", item.market_hash_name);
            report.looked_up += 1;

            let buyer_price = match self
                .client
                .highest_buy_order(item.app_id, &item.market_hash_name, self.currency)
                .await
            {
                Ok(price) => price,
                Err(e) if e.is_no_listings() => {
                    warn!("Skipping {}: {}", item.market_hash_name, e);
                    report.no_listings.push(item.market_hash_name);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let solution = self.schedule.solve(buyer_price, publisher_fee);

            if !solution.matches_target() {
                warn!(
                    "Price for {} is approximate: buy order {} but listing at {}",
                    item.market_hash_name,
                    self.currency.format_cents(buyer_price),
                    self.currency
                        .format_cents(solution.breakdown.buyer_paid_amount)
                );
                report.approximate.push(item.market_hash_name.clone());
            }

            info!(
                "Looked up market info for {}: buy order {}, you receive {}",
                item.market_hash_name,
                self.currency.format_cents(buyer_price),
                self.currency.format_cents(solution.received_amount())
            );
            priced.push(PricedItem { item, solution });
        }

        Ok(priced)
    }

    fn publisher_fee_for(&self, item: &InventoryItem) -> Option<Decimal> {
        match item.publisher_fee_percent {
            Some(rate) => match FeeSchedule::check_publisher_fee(rate) {
                Ok(()) => Some(rate),
                Err(e) => {
                    warn!("Skipping {}: {}", item.market_hash_name, e);
                    None
                }
            },
            None => Some(self.schedule.default_publisher_fee_percent()),
        }
    }

    fn plan(&self, priced: Vec<PricedItem>, report: &mut PipelineReport) -> Vec<ListingRequest> {
        let (mut sellable, unprofitable): (Vec<_>, Vec<_>) = priced
            .into_iter()
            .partition(|p| p.solution.received_amount() > 0);

        report
            .unprofitable
            .extend(unprofitable.into_iter().map(|p| p.item.market_hash_name));

        // Stable: equal payouts keep inventory order.
        sellable.sort_by_key(|p| Reverse(p.solution.received_amount()));

        sellable
            .into_iter()
            .map(|p| ListingRequest {
                quantity: p.item.amount,
                item: p.item,
                breakdown: p.solution.breakdown,
                outcome: p.solution.outcome,
            })
            .collect()
    }

    async fn sell(
        &self,
        plan: Vec<ListingRequest>,
        report: &mut PipelineReport,
    ) -> Result<(), MarketError> {
        info!("Selling items");

        for request in plan {
            if self.options.dry_run {
                info!(
                    "[dry run] Would place a sell order for {}x {} at {} each",
                    request.quantity,
                    request.item.name,
                    self.currency.format_cents(request.price())
                );
                report.listed.push(SubmittedListing {
                    request,
                    confirmation: None,
                });
                continue;
            }

            let confirmation = self.client.submit_sell_listing(&request).await?;
            info!(
                "Placed a sell order for {}x {} at {} each",
                request.quantity,
                request.item.name,
                self.currency.format_cents(request.price())
            );
            if confirmation.requires_confirmation {
                info!("Listing for {} awaits confirmation", request.item.name);
            }
            report.listed.push(SubmittedListing {
                request,
                confirmation: Some(confirmation),
            });
        }

        info!("Done placing sell offers!");
        Ok(())
    }
}
