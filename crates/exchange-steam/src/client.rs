//! Steam Community client with rate limiting.
//!
//! Covers the four endpoints the seller needs: the inventory, the market
//! listing page (to learn an item's `item_nameid`), the order histogram
//! (for the highest buy order) and the sell form.
//!
//! # Example
//!
//! ```ignore
//! use steam_seller_community::{SteamCommunityClient, SteamCommunityConfig, SteamSession};
//! use steam_seller_core::Currency;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = SteamSession::from_env(Default::default())?;
//!     let client = SteamCommunityClient::new(SteamCommunityConfig::default(), session)?;
//!
//!     let items = client.get_inventory(753, 6, true).await?;
//!     for item in &items {
//!         let bid = client.get_highest_buy_order(753, &item.market_hash_name, Currency::Eur).await?;
//!         println!("{} {}", item.name, bid);
//!     }
//!     Ok(())
//! }
//! ```

use crate::auth::SteamSession;
use crate::error::{CommunityError, Result};
use crate::types::{RawInventoryPage, RawOrderHistogram, RawSellResponse};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use parking_lot::Mutex;
use regex::Regex;
use reqwest::header::{COOKIE, REFERER};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use steam_seller_core::{
    CommunityConfig, Currency, InventoryItem, InventorySource, ListingConfirmation,
    ListingRequest, MarketError, MarketplaceClient,
};

pub use steam_seller_core::STEAM_COMMUNITY_URL;

// =============================================================================
// Constants
// =============================================================================

/// Items requested per inventory page.
pub const INVENTORY_PAGE_SIZE: u32 = 2000;

/// Text Steam renders on the listing page of an item nobody is selling.
const NO_LISTINGS_MARKER: &str = "There are no listings for this item.";

/// The listing page boots its order book widget with the item's name id.
const ITEM_NAME_ID_PATTERN: &str = r"Market_LoadOrderSpread\(\s*(\d+)\s*\)";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Steam Community client.
#[derive(Debug, Clone)]
pub struct SteamCommunityConfig {
    /// Base URL for all requests.
    pub base_url: String,

    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Two-letter country code sent with histogram requests.
    pub country: String,

    /// Steam language name, e.g. `english`.
    pub language: String,

    /// Items per inventory page.
    pub page_size: u32,
}

impl Default for SteamCommunityConfig {
    fn default() -> Self {
        Self::from(&CommunityConfig::default())
    }
}

impl From<&CommunityConfig> for SteamCommunityConfig {
    fn from(config: &CommunityConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            requests_per_minute: config.requests_per_minute,
            timeout_secs: config.timeout_secs,
            country: config.country.clone(),
            language: config.language.clone(),
            page_size: INVENTORY_PAGE_SIZE,
        }
    }
}

impl SteamCommunityConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Sets the inventory page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

// =============================================================================
// SteamCommunityClient
// =============================================================================

/// Steam Community client.
///
/// All requests share one rate limiter and carry the session cookies.
/// Item name ids never change, so they are cached for the client's lifetime.
pub struct SteamCommunityClient {
    /// Configuration.
    config: SteamCommunityConfig,

    /// HTTP client.
    http: Client,

    /// Rate limiter.
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,

    /// Logged-in session.
    session: SteamSession,

    /// `(app_id, market_hash_name)` to `item_nameid`.
    name_ids: Mutex<HashMap<(u32, String), u64>>,

    name_id_pattern: Regex,
}

impl std::fmt::Debug for SteamCommunityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteamCommunityClient")
            .field("base_url", &self.config.base_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SteamCommunityClient {
    /// Creates a new client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: SteamCommunityConfig, session: SteamSession) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CommunityError::Network(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let name_id_pattern = Regex::new(ITEM_NAME_ID_PATTERN)
            .map_err(|e| CommunityError::Configuration(format!("bad name id pattern: {e}")))?;

        Ok(Self {
            config,
            http,
            rate_limiter,
            session,
            name_ids: Mutex::new(HashMap::new()),
            name_id_pattern,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the session's SteamID.
    #[must_use]
    pub fn steam_id(&self) -> u64 {
        self.session.steam_id()
    }

    /// Validates an asset id. Steam asset ids are decimal integers.
    fn validate_asset_id(asset_id: &str) -> Result<&str> {
        if asset_id.is_empty() {
            return Err(CommunityError::InvalidRequest(
                "asset id cannot be empty".to_string(),
            ));
        }

        if asset_id.len() > 20 || !asset_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(CommunityError::InvalidRequest(format!(
                "invalid asset id: {asset_id}"
            )));
        }

        Ok(asset_id)
    }

    /// Validates a market hash name before it is placed in a URL path.
    fn validate_market_hash_name(name: &str) -> Result<&str> {
        if name.trim().is_empty() {
            return Err(CommunityError::InvalidRequest(
                "market hash name cannot be empty".to_string(),
            ));
        }

        if name.len() > 256 || name.chars().any(char::is_control) {
            return Err(CommunityError::InvalidRequest(format!(
                "invalid market hash name: {name:?}"
            )));
        }

        Ok(name)
    }

    /// Waits for the rate limiter and attaches the session cookies.
    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        self.rate_limiter.until_ready().await;
        Ok(builder.header(COOKIE, self.session.cookie_header()?))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("GET {}", url);

        let request = self
            .authorized(self.http.get(&url).query(query))
            .await?
            .header("Accept", "application/json");
        let response = Self::check_status(request.send().await?).await?;

        Ok(response.json::<T>().await?)
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("GET {}", url);

        let request = self.authorized(self.http.get(&url)).await?;
        let response = Self::check_status(request.send().await?).await?;

        Ok(response.text().await?)
    }

    /// Maps rate limiting, rejected sessions and other failures to errors.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(CommunityError::rate_limit(retry_after));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CommunityError::Authentication(format!(
                "Steam refused the session ({status})"
            )));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CommunityError::api(status.as_u16(), text));
        }

        Ok(response)
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Fetches one inventory page, starting after `start_assetid`.
    ///
    /// # Errors
    /// Returns error if the request fails or Steam reports failure.
    pub async fn get_inventory_page(
        &self,
        app_id: u32,
        context_id: u64,
        start_assetid: Option<&str>,
    ) -> Result<RawInventoryPage> {
        let path = format!(
            "/inventory/{}/{}/{}",
            self.session.steam_id(),
            app_id,
            context_id
        );

        let mut query = vec![
            ("l", self.config.language.clone()),
            ("count", self.config.page_size.to_string()),
        ];
        if let Some(start) = start_assetid {
            query.push(("start_assetid", Self::validate_asset_id(start)?.to_string()));
        }

        let page: RawInventoryPage = self.get_json(&path, &query).await?;
        if !page.success {
            return Err(CommunityError::api(
                StatusCode::OK.as_u16(),
                "inventory request was not successful",
            ));
        }

        Ok(page)
    }

    /// Fetches the whole inventory for an app and context, following pages.
    ///
    /// # Errors
    /// Returns error if any page fails.
    pub async fn get_inventory(
        &self,
        app_id: u32,
        context_id: u64,
        tradable_only: bool,
    ) -> Result<Vec<InventoryItem>> {
        let mut items = Vec::new();
        let mut start: Option<String> = None;

        loop {
            let page = self
                .get_inventory_page(app_id, context_id, start.as_deref())
                .await?;
            let more_items = page.more_items;
            let last_assetid = page.last_assetid.clone();

            items.extend(page.into_items(tradable_only));

            match (more_items, last_assetid) {
                (true, Some(last)) if start.as_deref() != Some(last.as_str()) => {
                    start = Some(last);
                }
                (true, _) => {
                    tracing::warn!(app_id, context_id, "inventory paging stalled, stopping early");
                    break;
                }
                (false, _) => break,
            }
        }

        tracing::debug!(app_id, context_id, count = items.len(), "inventory loaded");
        Ok(items)
    }

    // =========================================================================
    // Market
    // =========================================================================

    /// Looks up the market's numeric id for an item, from its listing page.
    ///
    /// # Errors
    /// Returns [`CommunityError::NoListings`] if the market has no page for
    /// the item, or [`CommunityError::Parse`] if the id cannot be found.
    pub async fn get_item_name_id(&self, app_id: u32, market_hash_name: &str) -> Result<u64> {
        let name = Self::validate_market_hash_name(market_hash_name)?;

        let key = (app_id, name.to_string());
        let cached = self.name_ids.lock().get(&key).copied();
        if let Some(id) = cached {
            return Ok(id);
        }

        let path = format!("/market/listings/{}/{}", app_id, urlencoding::encode(name));
        let page = self.get_text(&path).await?;

        if page.contains(NO_LISTINGS_MARKER) {
            return Err(CommunityError::no_listings(name));
        }

        let id = self
            .name_id_pattern
            .captures(&page)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .ok_or_else(|| {
                CommunityError::Parse(format!("no item_nameid on listing page of {name}"))
            })?;

        self.name_ids.lock().insert(key, id);
        Ok(id)
    }

    /// Fetches the buy/sell order summary for an item.
    ///
    /// # Errors
    /// Returns error if the request fails or Steam reports failure.
    pub async fn get_order_histogram(
        &self,
        item_name_id: u64,
        currency: Currency,
    ) -> Result<RawOrderHistogram> {
        let query = [
            ("country", self.config.country.clone()),
            ("language", self.config.language.clone()),
            ("currency", currency.code().to_string()),
            ("item_nameid", item_name_id.to_string()),
            ("two_factor", "0".to_string()),
        ];

        let histogram: RawOrderHistogram = self
            .get_json("/market/itemordershistogram", &query)
            .await?;
        if !histogram.success {
            return Err(CommunityError::api(
                StatusCode::OK.as_u16(),
                "order histogram request was not successful",
            ));
        }

        Ok(histogram)
    }

    /// Highest buy order for an item, in cents of `currency`.
    ///
    /// # Errors
    /// Returns [`CommunityError::NoListings`] when nobody is buying.
    pub async fn get_highest_buy_order(
        &self,
        app_id: u32,
        market_hash_name: &str,
        currency: Currency,
    ) -> Result<i64> {
        let item_name_id = self.get_item_name_id(app_id, market_hash_name).await?;
        let histogram = self.get_order_histogram(item_name_id, currency).await?;

        let Some(raw) = histogram.highest_buy_order else {
            return Err(CommunityError::no_listings(market_hash_name));
        };

        raw.trim().parse::<i64>().map_err(|_| {
            CommunityError::Parse(format!("highest_buy_order is not a cent amount: {raw}"))
        })
    }

    /// Places a sell order. `price` is what the seller receives per unit, in
    /// cents; Steam adds the fees on top.
    ///
    /// # Errors
    /// Returns [`CommunityError::ListingRejected`] if Steam refuses the order.
    pub async fn sell_item(
        &self,
        app_id: u32,
        context_id: u64,
        asset_id: &str,
        amount: u32,
        price: i64,
    ) -> Result<ListingConfirmation> {
        let asset_id = Self::validate_asset_id(asset_id)?;
        if amount == 0 {
            return Err(CommunityError::InvalidRequest(
                "amount must be at least 1".to_string(),
            ));
        }
        if price <= 0 {
            return Err(CommunityError::InvalidRequest(format!(
                "price must be positive: {price}"
            )));
        }

        let url = format!("{}/market/sellitem/", self.config.base_url);
        let referer = format!(
            "{}/profiles/{}/inventory/",
            self.config.base_url,
            self.session.steam_id()
        );
        let form = [
            ("sessionid", self.session.session_id().to_string()),
            ("appid", app_id.to_string()),
            ("contextid", context_id.to_string()),
            ("assetid", asset_id.to_string()),
            ("amount", amount.to_string()),
            ("price", price.to_string()),
        ];

        tracing::debug!("POST {} asset={} price={}", url, asset_id, price);

        let request = self
            .authorized(self.http.post(&url).header(REFERER, referer).form(&form))
            .await?;
        let response = request.send().await?;

        // Steam answers a refused listing with a 5xx status and a JSON
        // message, so server errors are judged by their body.
        let status = response.status();
        let response = if status.is_server_error() {
            response
        } else {
            Self::check_status(response).await?
        };

        let text = response.text().await?;
        match serde_json::from_str::<RawSellResponse>(&text) {
            Ok(raw) if raw.success => Ok(raw.into()),
            Ok(raw) => Err(CommunityError::ListingRejected(
                raw.message
                    .unwrap_or_else(|| "Steam did not accept the listing".to_string()),
            )),
            Err(_) if !status.is_success() => Err(CommunityError::api(status.as_u16(), text)),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Seller Traits
// =============================================================================

#[async_trait]
impl InventorySource for SteamCommunityClient {
    async fn inventory(
        &self,
        app_id: u32,
        context_id: u64,
        tradable_only: bool,
    ) -> std::result::Result<Vec<InventoryItem>, MarketError> {
        Ok(self.get_inventory(app_id, context_id, tradable_only).await?)
    }
}

#[async_trait]
impl MarketplaceClient for SteamCommunityClient {
    async fn highest_buy_order(
        &self,
        app_id: u32,
        market_hash_name: &str,
        currency: Currency,
    ) -> std::result::Result<i64, MarketError> {
        Ok(self
            .get_highest_buy_order(app_id, market_hash_name, currency)
            .await?)
    }

    async fn submit_sell_listing(
        &self,
        request: &ListingRequest,
    ) -> std::result::Result<ListingConfirmation, MarketError> {
        let item = &request.item;
        Ok(self
            .sell_item(
                item.app_id,
                item.context_id,
                &item.asset_id,
                request.quantity,
                request.price(),
            )
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nonzero_ext::nonzero;
    use rust_decimal::Decimal;
    use serde_json::json;
    use steam_seller_core::{FeeSchedule, SolveOutcome};
    use wiremock::matchers::{
        body_string_contains, header, method, path, query_param, query_param_is_missing,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const STEAM_ID: u64 = 76_561_198_000_000_000;

    fn client(server: &MockServer) -> SteamCommunityClient {
        let session = SteamSession::new(STEAM_ID, "abc123", "secure-token").unwrap();
        let config = SteamCommunityConfig::default()
            .with_base_url(server.uri())
            .with_rate_limit(nonzero!(6000u32));
        SteamCommunityClient::new(config, session).unwrap()
    }

    fn listing_page(name_id: u64) -> String {
        format!(
            "<html><script>\n\tMarket_LoadOrderSpread( {name_id} );\t// initial load\n</script></html>"
        )
    }

    fn inventory_item(asset_id: &str) -> InventoryItem {
        InventoryItem {
            app_id: 753,
            context_id: 6,
            asset_id: asset_id.to_string(),
            market_hash_name: "753-Sack of Gems".to_string(),
            name: "Sack of Gems".to_string(),
            amount: 2,
            marketable: true,
            tradable: true,
            publisher_fee_percent: None,
        }
    }

    // ==================== Config Tests ====================

    #[test]
    fn test_client_config_default() {
        let config = SteamCommunityConfig::default();
        assert_eq!(config.base_url, STEAM_COMMUNITY_URL);
        assert_eq!(config.requests_per_minute.get(), 20);
        assert_eq!(config.page_size, INVENTORY_PAGE_SIZE);
    }

    #[test]
    fn test_client_config_default_matches_app_config() {
        let community = CommunityConfig::default();
        let config = SteamCommunityConfig::default();
        assert_eq!(config.base_url, community.base_url);
        assert_eq!(config.requests_per_minute, community.requests_per_minute);
        assert_eq!(config.timeout_secs, community.timeout_secs);
        assert_eq!(config.country, community.country);
        assert_eq!(config.language, community.language);
    }

    #[test]
    fn test_client_config_from_community_config() {
        let community = CommunityConfig {
            base_url: "https://steamcommunity.example/".to_string(),
            country: "DE".to_string(),
            ..CommunityConfig::default()
        };
        let config = SteamCommunityConfig::from(&community);
        assert_eq!(config.base_url, "https://steamcommunity.example");
        assert_eq!(config.country, "DE");
        assert_eq!(config.language, "english");
    }

    #[test]
    fn test_client_config_builder() {
        let config = SteamCommunityConfig::default()
            .with_base_url("https://custom.url")
            .with_rate_limit(nonzero!(120u32))
            .with_timeout_secs(60)
            .with_page_size(0);

        assert_eq!(config.base_url, "https://custom.url");
        assert_eq!(config.requests_per_minute.get(), 120);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.page_size, 1);
    }

    // ==================== Input Validation Tests ====================

    #[test]
    fn test_validate_asset_id() {
        assert!(SteamCommunityClient::validate_asset_id("27348501923").is_ok());
        assert!(SteamCommunityClient::validate_asset_id("").is_err());
        assert!(SteamCommunityClient::validate_asset_id("../1").is_err());
        assert!(SteamCommunityClient::validate_asset_id("12a").is_err());
        assert!(SteamCommunityClient::validate_asset_id(&"1".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_market_hash_name() {
        assert!(SteamCommunityClient::validate_market_hash_name("440-Mann Co. Card").is_ok());
        assert!(
            SteamCommunityClient::validate_market_hash_name("AK-47 | Redline (Field-Tested)")
                .is_ok()
        );
        assert!(SteamCommunityClient::validate_market_hash_name("  ").is_err());
        assert!(SteamCommunityClient::validate_market_hash_name("a\nb").is_err());
    }

    #[test]
    fn test_debug_hides_cookies() {
        let session = SteamSession::new(STEAM_ID, "abc123", "secure-token").unwrap();
        let client = SteamCommunityClient::new(SteamCommunityConfig::default(), session).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secure-token"));
        assert!(debug.contains("steamcommunity.com"));
    }

    // ==================== Inventory Tests ====================

    #[tokio::test]
    async fn test_inventory_follows_pages() {
        let server = MockServer::start().await;
        let inventory_path = format!("/inventory/{STEAM_ID}/753/6");

        Mock::given(method("GET"))
            .and(path(inventory_path.as_str()))
            .and(query_param_is_missing("start_assetid"))
            .and(query_param("l", "english"))
            .and(header("Cookie", "sessionid=abc123; steamLoginSecure=secure-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "assets": [
                    {"appid": 753, "contextid": "6", "assetid": "1001", "classid": "10", "instanceid": "0", "amount": "1"}
                ],
                "descriptions": [
                    {"classid": "10", "instanceid": "0", "market_hash_name": "440-Mann Co. Card", "name": "Mann Co. Card", "marketable": 1, "tradable": 1}
                ],
                "more_items": 1,
                "last_assetid": "1001",
                "total_inventory_count": 2,
                "success": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(inventory_path.as_str()))
            .and(query_param("start_assetid", "1001"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "assets": [
                    {"appid": 753, "contextid": "6", "assetid": "1002", "classid": "20", "instanceid": "0", "amount": "4"}
                ],
                "descriptions": [
                    {"classid": "20", "instanceid": "0", "market_hash_name": "753-Sack of Gems", "name": "Sack of Gems", "marketable": 1, "tradable": 1}
                ],
                "total_inventory_count": 2,
                "success": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let items = client(&server).inventory(753, 6, true).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].asset_id, "1001");
        assert_eq!(items[1].market_hash_name, "753-Sack of Gems");
        assert_eq!(items[1].amount, 4);
    }

    #[tokio::test]
    async fn test_inventory_rejected_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = client(&server).get_inventory(753, 6, true).await.unwrap_err();
        assert!(matches!(err, CommunityError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).inventory(753, 6, true).await.unwrap_err();
        assert_eq!(
            err,
            MarketError::RateLimit {
                retry_after_secs: 120
            }
        );
    }

    // ==================== Market Tests ====================

    #[tokio::test]
    async fn test_highest_buy_order_caches_name_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/market/listings/440/440-Mann%20Co.%20Card"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(176_043_071)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/market/itemordershistogram"))
            .and(query_param("item_nameid", "176043071"))
            .and(query_param("currency", "3"))
            .and(query_param("country", "US"))
            .and(query_param("two_factor", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": 1,
                "highest_buy_order": "500",
                "lowest_sell_order": "530"
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client(&server);
        for _ in 0..2 {
            let bid = client
                .highest_buy_order(440, "440-Mann Co. Card", Currency::Eur)
                .await
                .unwrap();
            assert_eq!(bid, 500);
        }
    }

    #[tokio::test]
    async fn test_listing_page_without_listings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/market/listings/753/753-Gems"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<div class=\"market_listing_table_message\">There are no listings for this item.</div>",
            ))
            .mount(&server)
            .await;

        let err = client(&server)
            .highest_buy_order(753, "753-Gems", Currency::Eur)
            .await
            .unwrap_err();
        assert!(err.is_no_listings());
    }

    #[tokio::test]
    async fn test_no_buy_orders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/market/listings/753/753-Gems"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(42)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/market/itemordershistogram"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": 1,
                "highest_buy_order": null
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .highest_buy_order(753, "753-Gems", Currency::Eur)
            .await
            .unwrap_err();
        assert_eq!(err, MarketError::no_listings("753-Gems"));
    }

    #[tokio::test]
    async fn test_listing_page_without_name_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/market/listings/753/753-Gems"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .get_item_name_id(753, "753-Gems")
            .await
            .unwrap_err();
        assert!(matches!(err, CommunityError::Parse(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .highest_buy_order(753, "753-Gems", Currency::Eur)
            .await
            .unwrap_err();
        assert!(!err.is_no_listings());
        assert!(matches!(err, MarketError::Api { status_code: 500, .. }));
    }

    // ==================== Sell Tests ====================

    #[tokio::test]
    async fn test_submit_sell_listing() {
        let server = MockServer::start().await;
        let referer = format!("{}/profiles/{STEAM_ID}/inventory/", server.uri());

        Mock::given(method("POST"))
            .and(path("/market/sellitem/"))
            .and(header("Referer", referer.as_str()))
            .and(body_string_contains("sessionid=abc123"))
            .and(body_string_contains("assetid=2001"))
            .and(body_string_contains("amount=2"))
            .and(body_string_contains("price=477"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "requires_confirmation": 1,
                "needs_mobile_confirmation": true,
                "needs_email_confirmation": false,
                "email_domain": "example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let solution = FeeSchedule::default().solve(500, Decimal::ZERO);
        assert_eq!(solution.outcome, SolveOutcome::Exact);
        let request = ListingRequest {
            item: inventory_item("2001"),
            quantity: 2,
            breakdown: solution.breakdown,
            outcome: solution.outcome,
        };

        let confirmation = client(&server).submit_sell_listing(&request).await.unwrap();

        assert!(confirmation.requires_confirmation);
        assert!(confirmation.needs_mobile_confirmation);
        assert_eq!(confirmation.email_domain.as_deref(), Some("example.com"));
    }

    #[tokio::test]
    async fn test_rejected_listing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/market/sellitem/"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({
                "success": false,
                "message": "You already have a listing for this item pending confirmation."
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .sell_item(753, 6, "2001", 1, 100)
            .await
            .unwrap_err();
        match err {
            CommunityError::ListingRejected(message) => {
                assert!(message.contains("pending confirmation"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sell_gateway_error_without_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/market/sellitem/"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client(&server)
            .sell_item(753, 6, "2001", 1, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, CommunityError::Api { status_code: 502, .. }));
    }

    #[tokio::test]
    async fn test_sell_rejects_bad_input_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server);
        assert!(client.sell_item(753, 6, "2001", 1, 0).await.is_err());
        assert!(client.sell_item(753, 6, "2001", 0, 100).await.is_err());
        assert!(client.sell_item(753, 6, "../2001", 1, 100).await.is_err());
    }
}
