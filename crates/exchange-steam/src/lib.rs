//! Steam Community integration for the Steam market seller.
//!
//! This crate provides:
//! - A rate-limited client for the inventory, market listing page, order
//!   histogram and sell endpoints
//! - Cookie-session handling with secrets kept out of logs
//! - Implementations of the seller's `InventorySource` and
//!   `MarketplaceClient` traits
//!
//! # Example
//!
//! ```ignore
//! use steam_seller_community::{SteamCommunityClient, SteamCommunityConfig, SteamSession};
//! use steam_seller_core::{FeeSchedule, InventorySource, SellPipeline, Currency};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = SteamSession::from_env(Default::default())?;
//!     let client = SteamCommunityClient::new(SteamCommunityConfig::default(), session)?;
//!
//!     let items = client.inventory(753, 6, true).await?;
//!     let pipeline = SellPipeline::new(FeeSchedule::default(), Currency::Eur, client);
//!     let report = pipeline.run(items).await?;
//!     println!("listed {} items", report.listed.len());
//!     Ok(())
//! }
//! ```
//!
//! # Authentication
//!
//! Steam Community uses the browser session of a logged-in account.
//! Set the following environment variables:
//!
//! - `STEAM_ID`: the account's 64-bit SteamID
//! - `STEAM_SESSION_ID`: value of the `sessionid` cookie
//! - `STEAM_LOGIN_SECURE`: value of the `steamLoginSecure` cookie
//!
//! # Endpoints
//!
//! - `GET /inventory/{steam_id}/{app_id}/{context_id}` - Inventory pages
//! - `GET /market/listings/{app_id}/{market_hash_name}` - Listing page, for the item name id
//! - `GET /market/itemordershistogram` - Buy and sell order summary
//! - `POST /market/sellitem/` - Place a sell order

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use auth::{SteamSession, SteamSessionConfig};
pub use client::{
    SteamCommunityClient, SteamCommunityConfig, INVENTORY_PAGE_SIZE, STEAM_COMMUNITY_URL,
};
pub use error::{CommunityError, Result};
