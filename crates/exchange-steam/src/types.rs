//! Raw Steam Community response shapes and their conversion into the
//! seller's domain types.
//!
//! Steam encodes most identifiers and counts as strings and most flags as
//! `0`/`1`, sometimes as JSON booleans. The raw types accept both.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::str::FromStr;
use steam_seller_core::{InventoryItem, ListingConfirmation};

// =============================================================================
// Inventory
// =============================================================================

/// One page of `GET /inventory/{steam_id}/{app_id}/{context_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInventoryPage {
    #[serde(default)]
    pub assets: Vec<RawAsset>,
    #[serde(default)]
    pub descriptions: Vec<RawDescription>,
    #[serde(default, deserialize_with = "flag")]
    pub more_items: bool,
    pub last_assetid: Option<String>,
    pub total_inventory_count: Option<u64>,
    #[serde(default, deserialize_with = "flag")]
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAsset {
    pub appid: u32,
    pub contextid: String,
    pub assetid: String,
    pub classid: String,
    #[serde(default = "zero_instance")]
    pub instanceid: String,
    #[serde(default = "one")]
    pub amount: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDescription {
    pub classid: String,
    #[serde(default = "zero_instance")]
    pub instanceid: String,
    #[serde(default)]
    pub market_hash_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "flag")]
    pub marketable: bool,
    #[serde(default, deserialize_with = "flag")]
    pub tradable: bool,
    /// Per-item publisher fee override, present only for some games.
    #[serde(default)]
    pub market_fee: Option<RawFee>,
}

/// Steam sends `market_fee` as a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawFee {
    Number(f64),
    Text(String),
}

impl RawFee {
    fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Decimal::try_from(*n).ok(),
            Self::Text(s) => Decimal::from_str(s.trim()).ok(),
        }
    }
}

fn zero_instance() -> String {
    "0".to_string()
}

fn one() -> String {
    "1".to_string()
}

impl RawInventoryPage {
    /// Joins assets with their descriptions.
    ///
    /// Assets whose description is missing, or whose ids do not parse, are
    /// dropped with a warning rather than failing the page.
    pub fn into_items(self, tradable_only: bool) -> Vec<InventoryItem> {
        let descriptions: HashMap<(String, String), RawDescription> = self
            .descriptions
            .into_iter()
            .map(|d| ((d.classid.clone(), d.instanceid.clone()), d))
            .collect();

        self.assets
            .into_iter()
            .filter_map(|asset| {
                let key = (asset.classid.clone(), asset.instanceid.clone());
                let Some(description) = descriptions.get(&key) else {
                    tracing::warn!(asset_id = %asset.assetid, "asset has no description, skipping");
                    return None;
                };
                if tradable_only && !description.tradable {
                    return None;
                }

                let (Ok(context_id), Ok(amount)) =
                    (asset.contextid.parse::<u64>(), asset.amount.parse::<u32>())
                else {
                    tracing::warn!(asset_id = %asset.assetid, "asset has malformed ids, skipping");
                    return None;
                };

                Some(InventoryItem {
                    app_id: asset.appid,
                    context_id,
                    asset_id: asset.assetid,
                    market_hash_name: description.market_hash_name.clone(),
                    name: description.name.clone(),
                    amount,
                    marketable: description.marketable,
                    tradable: description.tradable,
                    publisher_fee_percent: description
                        .market_fee
                        .as_ref()
                        .and_then(RawFee::to_decimal),
                })
            })
            .collect()
    }
}

// =============================================================================
// Market
// =============================================================================

/// Response of `GET /market/itemordershistogram`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOrderHistogram {
    #[serde(default, deserialize_with = "flag")]
    pub success: bool,
    /// Highest buy order in cents, as a string; `null` when nobody is buying.
    pub highest_buy_order: Option<String>,
    pub lowest_sell_order: Option<String>,
}

/// Response of `POST /market/sellitem/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSellResponse {
    #[serde(default, deserialize_with = "flag")]
    pub success: bool,
    pub message: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub requires_confirmation: bool,
    #[serde(default, deserialize_with = "flag")]
    pub needs_mobile_confirmation: bool,
    #[serde(default, deserialize_with = "flag")]
    pub needs_email_confirmation: bool,
    pub email_domain: Option<String>,
}

impl From<RawSellResponse> for ListingConfirmation {
    fn from(raw: RawSellResponse) -> Self {
        Self {
            requires_confirmation: raw.requires_confirmation,
            needs_mobile_confirmation: raw.needs_mobile_confirmation,
            needs_email_confirmation: raw.needs_email_confirmation,
            email_domain: raw.email_domain.filter(|d| !d.is_empty()),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Accepts `true`/`false`, `0`/`1`, `"0"`/`"1"` and `null`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        Some(Flag::Text(s)) => !matches!(s.as_str(), "" | "0" | "false"),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn page() -> RawInventoryPage {
        serde_json::from_value(json!({
            "assets": [
                {"appid": 753, "contextid": "6", "assetid": "1001", "classid": "10", "instanceid": "0", "amount": "1"},
                {"appid": 753, "contextid": "6", "assetid": "1002", "classid": "20", "instanceid": "0", "amount": "3"},
                {"appid": 753, "contextid": "6", "assetid": "1003", "classid": "30", "instanceid": "7", "amount": "1"},
                {"appid": 753, "contextid": "6", "assetid": "1004", "classid": "99", "instanceid": "0", "amount": "1"}
            ],
            "descriptions": [
                {"classid": "10", "instanceid": "0", "market_hash_name": "440-Mann Co. Card", "name": "Mann Co. Card", "marketable": 1, "tradable": 1},
                {"classid": "20", "instanceid": "0", "market_hash_name": "753-Sack of Gems", "name": "Sack of Gems", "marketable": 1, "tradable": 0},
                {"classid": "30", "instanceid": "7", "market_hash_name": "570-Hat", "name": "Hat", "marketable": true, "tradable": true, "market_fee": "0.15"}
            ],
            "more_items": 1,
            "last_assetid": "1004",
            "total_inventory_count": 8,
            "success": 1
        }))
        .unwrap()
    }

    #[test]
    fn test_inventory_page_flags() {
        let page = page();
        assert!(page.success);
        assert!(page.more_items);
        assert_eq!(page.last_assetid.as_deref(), Some("1004"));
    }

    #[test]
    fn test_into_items_joins_descriptions() {
        let items = page().into_items(false);

        // 1004 has no description
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].market_hash_name, "440-Mann Co. Card");
        assert_eq!(items[0].context_id, 6);
        assert!(items[0].marketable);
        assert_eq!(items[1].amount, 3);
        assert!(!items[1].tradable);
        assert_eq!(items[2].publisher_fee_percent, Some(dec!(0.15)));
        assert_eq!(items[0].publisher_fee_percent, None);
    }

    #[test]
    fn test_into_items_tradable_only() {
        let items = page().into_items(true);
        let ids: Vec<&str> = items.iter().map(|i| i.asset_id.as_str()).collect();
        assert_eq!(ids, vec!["1001", "1003"]);
    }

    #[test]
    fn test_empty_inventory_page() {
        let page: RawInventoryPage =
            serde_json::from_value(json!({"total_inventory_count": 0, "success": 1})).unwrap();
        assert!(!page.more_items);
        assert!(page.into_items(true).is_empty());
    }

    #[test]
    fn test_numeric_market_fee() {
        let description: RawDescription = serde_json::from_value(json!({
            "classid": "1", "market_fee": 0.05
        }))
        .unwrap();
        assert_eq!(
            description.market_fee.as_ref().and_then(RawFee::to_decimal),
            Some(dec!(0.05))
        );
    }

    #[test]
    fn test_histogram_without_buy_orders() {
        let histogram: RawOrderHistogram = serde_json::from_value(json!({
            "success": 1,
            "highest_buy_order": null,
            "lowest_sell_order": "25"
        }))
        .unwrap();
        assert!(histogram.success);
        assert!(histogram.highest_buy_order.is_none());
    }

    #[test]
    fn test_sell_response_into_confirmation() {
        let raw: RawSellResponse = serde_json::from_value(json!({
            "success": true,
            "requires_confirmation": 1,
            "needs_mobile_confirmation": true,
            "needs_email_confirmation": false,
            "email_domain": ""
        }))
        .unwrap();
        let confirmation = ListingConfirmation::from(raw);
        assert!(confirmation.requires_confirmation);
        assert!(confirmation.needs_mobile_confirmation);
        assert!(!confirmation.needs_email_confirmation);
        assert_eq!(confirmation.email_domain, None);
    }

    #[test]
    fn test_failed_sell_response() {
        let raw: RawSellResponse = serde_json::from_value(json!({
            "success": false,
            "message": "You already have a listing for this item pending confirmation."
        }))
        .unwrap();
        assert!(!raw.success);
        assert!(!raw.requires_confirmation);
        assert!(raw.message.unwrap().contains("pending confirmation"));
    }
}
