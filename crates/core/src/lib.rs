//! Fee-inclusive pricing for Steam Community Market listings.
//!
//! The core is a pair of pure functions over a [`FeeSchedule`]:
//! [`FeeSchedule::decompose`] turns the amount a seller receives into what the
//! buyer pays, and [`FeeSchedule::solve`] inverts it to the cent. The
//! [`SellPipeline`] drives them over an inventory through the
//! [`MarketplaceClient`] collaborator.

pub mod config;
pub mod config_loader;
pub mod currency;
pub mod error;
pub mod fees;
pub mod pipeline;
pub mod report_formatter;
pub mod solver;
pub mod traits;
pub mod types;

pub use config::{AppConfig, CommunityConfig, InventoryConfig, WalletConfig, STEAM_COMMUNITY_URL};
pub use config_loader::ConfigLoader;
pub use currency::Currency;
pub use error::{ConfigError, MarketError};
pub use fees::{FeeBreakdown, FeeSchedule};
pub use pipeline::{PipelineOptions, PipelineReport, SellPipeline, SubmittedListing};
pub use report_formatter::ReportFormatter;
pub use solver::{PriceSolution, SolveOutcome, MAX_SOLVER_ITERATIONS};
pub use traits::{InventorySource, MarketplaceClient};
pub use types::{InventoryItem, ListingConfirmation, ListingRequest};
