use crate::currency::Currency;
use crate::error::MarketError;
use crate::types::{InventoryItem, ListingConfirmation, ListingRequest};
use async_trait::async_trait;

#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn inventory(
        &self,
        app_id: u32,
        context_id: u64,
        tradable_only: bool,
    ) -> Result<Vec<InventoryItem>, MarketError>;
}

#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    /// Highest buy order for the item, in cents the buyer pays.
    ///
    /// Fails with [`MarketError::NoListings`] when the item has no buy orders.
    async fn highest_buy_order(
        &self,
        app_id: u32,
        market_hash_name: &str,
        currency: Currency,
    ) -> Result<i64, MarketError>;

    async fn submit_sell_listing(
        &self,
        request: &ListingRequest,
    ) -> Result<ListingConfirmation, MarketError>;
}
