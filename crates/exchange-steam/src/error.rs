//! Error types for the Steam Community client.
//!
//! Provides typed errors for session handling, HTTP communication, page
//! parsing, and listing submission.

use steam_seller_core::MarketError;
use thiserror::Error;

/// Errors that can occur when talking to Steam Community.
#[derive(Debug, Error)]
pub enum CommunityError {
    /// Session cookies missing, malformed, or rejected.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// API request failed.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body or error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// The market has no listings or buy orders for the item.
    #[error("There are no listings for this item: {market_hash_name}")]
    NoListings {
        /// Market hash name that was looked up.
        market_hash_name: String,
    },

    /// A page did not have the expected structure.
    #[error("unexpected page content: {0}")]
    Parse(String),

    /// Steam refused the sell order.
    #[error("listing rejected: {0}")]
    ListingRejected(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl CommunityError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a rate limit error.
    pub fn rate_limit(retry_after_secs: u64) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// Creates a no-listings error.
    pub fn no_listings(market_hash_name: impl Into<String>) -> Self {
        Self::NoListings {
            market_hash_name: market_hash_name.into(),
        }
    }
}

impl From<reqwest::Error> for CommunityError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CommunityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<CommunityError> for MarketError {
    fn from(err: CommunityError) -> Self {
        match err {
            CommunityError::NoListings { market_hash_name } => {
                MarketError::NoListings { market_hash_name }
            }
            CommunityError::Api {
                status_code,
                message,
            } => MarketError::Api {
                status_code,
                message,
            },
            CommunityError::RateLimit { retry_after_secs } => {
                MarketError::RateLimit { retry_after_secs }
            }
            CommunityError::Network(msg) => MarketError::Network(msg),
            CommunityError::Timeout(msg) => MarketError::Timeout(msg),
            CommunityError::ListingRejected(msg) => MarketError::Rejected(msg),
            CommunityError::Authentication(msg) | CommunityError::Configuration(msg) => {
                MarketError::Authentication(msg)
            }
            CommunityError::Parse(msg)
            | CommunityError::Serialization(msg)
            | CommunityError::InvalidRequest(msg) => MarketError::Serialization(msg),
        }
    }
}

/// Result type alias for Steam Community operations.
pub type Result<T> = std::result::Result<T, CommunityError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Error Construction Tests ====================

    #[test]
    fn test_api_error_construction() {
        let err = CommunityError::api(400, "bad request");
        assert!(matches!(
            err,
            CommunityError::Api {
                status_code: 400,
                ..
            }
        ));
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("bad request"));
    }

    #[test]
    fn test_no_listings_message_matches_steam_wording() {
        let err = CommunityError::no_listings("753-Gems");
        assert!(err.to_string().starts_with("There are no listings"));
    }

    // ==================== Conversion Tests ====================

    #[test]
    fn test_no_listings_converts_to_recoverable_market_error() {
        let err: MarketError = CommunityError::no_listings("753-Gems").into();
        assert!(err.is_no_listings());
    }

    #[test]
    fn test_fatal_errors_convert_to_fatal_market_errors() {
        let err: MarketError = CommunityError::api(500, "oops").into();
        assert!(!err.is_no_listings());
        assert!(matches!(err, MarketError::Api { status_code: 500, .. }));

        let err: MarketError = CommunityError::ListingRejected("nope".to_string()).into();
        assert_eq!(err, MarketError::Rejected("nope".to_string()));

        let err: MarketError = CommunityError::Parse("no item_nameid".to_string()).into();
        assert!(matches!(err, MarketError::Serialization(_)));
    }
}
