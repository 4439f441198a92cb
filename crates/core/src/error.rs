//! Error types shared by the fee engine and the sell pipeline.
//!
//! Configuration problems are rejected when the fee schedule is built.
//! Marketplace failures come back from the collaborators and are either
//! tolerated (no listings) or abort the run.

use rust_decimal::Decimal;
use thiserror::Error;

/// Malformed fee schedule or wallet settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A cent amount that must not be negative was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount {
        /// Name of the offending setting.
        field: &'static str,
        /// Value that was supplied.
        value: i64,
    },

    /// A fee rate was negative.
    #[error("{field} must be a non-negative fraction, got {value}")]
    NegativePercent {
        /// Name of the offending setting.
        field: &'static str,
        /// Value that was supplied.
        value: Decimal,
    },

    /// The wallet currency code is not a known Steam currency.
    #[error("unknown wallet currency code: {0}")]
    UnknownCurrency(u32),
}

/// Errors returned by the inventory and marketplace collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// The item has no listings or buy orders. Recoverable: the item is skipped.
    #[error("There are no listings for this item: {market_hash_name}")]
    NoListings {
        /// Market hash name of the item that was looked up.
        market_hash_name: String,
    },

    /// API request failed.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Error message from the marketplace.
        message: String,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// The marketplace refused the listing.
    #[error("listing rejected: {0}")]
    Rejected(String),

    /// Session missing or expired.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Response could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MarketError {
    /// Creates a no-listings error for an item.
    pub fn no_listings(market_hash_name: impl Into<String>) -> Self {
        Self::NoListings {
            market_hash_name: market_hash_name.into(),
        }
    }

    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Returns true if the lookup failed only because the item has no listings.
    #[must_use]
    pub fn is_no_listings(&self) -> bool {
        matches!(self, Self::NoListings { .. })
    }
}
