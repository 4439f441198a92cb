//! Inventory items and listing requests.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fees::FeeBreakdown;
use crate::solver::SolveOutcome;

/// An item held in the seller's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Steam app id (753 for community items).
    pub app_id: u32,

    /// Inventory context id (6 for community items).
    pub context_id: u64,

    /// Asset id of this stack.
    pub asset_id: String,

    /// Name used by the market to identify the item type.
    pub market_hash_name: String,

    /// Display name.
    pub name: String,

    /// Stack size.
    pub amount: u32,

    /// Whether the item may be listed on the market.
    pub marketable: bool,

    /// Whether the item may be traded.
    pub tradable: bool,

    /// Publisher royalty rate, when it differs from the wallet default.
    pub publisher_fee_percent: Option<Decimal>,
}

/// A sell order ready to be submitted. Consumed by the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRequest {
    /// Item being listed.
    pub item: InventoryItem,

    /// Units to list.
    pub quantity: u32,

    /// Fee split at the listing price.
    pub breakdown: FeeBreakdown,

    /// How the price was solved.
    pub outcome: SolveOutcome,
}

impl ListingRequest {
    /// Amount the seller receives per unit. This is the price the sell
    /// endpoint expects.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.breakdown.received_amount
    }

    /// Amount a buyer pays per unit.
    #[must_use]
    pub fn buyer_price(&self) -> i64 {
        self.breakdown.buyer_paid_amount
    }
}

/// Marketplace acknowledgement of a submitted listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfirmation {
    /// The listing still has to be confirmed by the account holder.
    pub requires_confirmation: bool,

    /// Confirmation must happen in the mobile authenticator.
    pub needs_mobile_confirmation: bool,

    /// Confirmation was sent by email.
    pub needs_email_confirmation: bool,

    /// Email domain the confirmation was sent to.
    pub email_domain: Option<String>,
}
