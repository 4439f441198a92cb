use crate::currency::Currency;
use crate::error::ConfigError;
use crate::fees::{
    FeeSchedule, DEFAULT_FEE_BASE, DEFAULT_FEE_MINIMUM, DEFAULT_FEE_PERCENT,
    DEFAULT_PUBLISHER_FEE_PERCENT,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Steam Community base URL.
pub const STEAM_COMMUNITY_URL: &str = "https://steamcommunity.com";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub wallet: WalletConfig,
    pub community: CommunityConfig,
    pub inventory: InventoryConfig,
}

/// Wallet fee settings, in cents and fractions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    pub fee_base: i64,
    pub fee_percent: Decimal,
    pub fee_minimum: i64,
    pub publisher_fee_percent_default: Decimal,
    pub currency: Currency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    pub base_url: String,
    pub requests_per_minute: NonZeroU32,
    pub timeout_secs: u64,
    pub country: String,
    pub language: String,
}

/// Which inventory to sell from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub app_id: u32,
    pub context_id: u64,
    pub tradable_only: bool,
}

impl WalletConfig {
    /// Builds the validated fee schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if any fee setting is negative or a rate exceeds 1.
    pub fn fee_schedule(&self) -> Result<FeeSchedule, ConfigError> {
        FeeSchedule::new(
            self.fee_base,
            self.fee_percent,
            self.fee_minimum,
            self.publisher_fee_percent_default,
        )
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            fee_base: DEFAULT_FEE_BASE,
            fee_percent: DEFAULT_FEE_PERCENT,
            fee_minimum: DEFAULT_FEE_MINIMUM,
            publisher_fee_percent_default: DEFAULT_PUBLISHER_FEE_PERCENT,
            currency: Currency::Eur,
        }
    }
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            base_url: STEAM_COMMUNITY_URL.to_string(),
            requests_per_minute: NonZeroU32::new(20).unwrap_or(NonZeroU32::MIN),
            timeout_secs: 30,
            country: "US".to_string(),
            language: "english".to_string(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        // Steam community items: trading cards, backgrounds, emoticons, gems
        Self {
            app_id: 753,
            context_id: 6,
            tradable_only: true,
        }
    }
}
