//! Wire formats for Steam Web API responses, before descriptions are attached.

use crate::enums::TradeOfferState;
use crate::serialize::{self, from_int_to_bool, option_str_to_number, option_string_0_as_none};
use crate::time::ServerTime;
use crate::types::{AppId, Amount, AssetId, ClassId, ContextId, InstanceId, TradeOfferId};
use serde::Deserialize;

/// An asset as it appears in offers and inventories, identified only by its class.
#[derive(Deserialize, Debug, Clone)]
pub struct RawAsset {
    pub appid: AppId,
    #[serde(with = "serialize::string")]
    pub contextid: ContextId,
    #[serde(with = "serialize::string")]
    pub assetid: AssetId,
    #[serde(with = "serialize::string")]
    pub classid: ClassId,
    #[serde(default)]
    #[serde(deserialize_with = "option_string_0_as_none")]
    pub instanceid: InstanceId,
    #[serde(with = "serialize::string")]
    pub amount: Amount,
}

/// A tag on an item description.
#[derive(Deserialize, Debug, Clone)]
pub struct RawTag {
    pub category: String,
    pub internal_name: String,
}

/// The description of a class of items.
#[derive(Deserialize, Debug, Clone)]
pub struct RawDescription {
    #[serde(default)]
    pub appid: AppId,
    #[serde(with = "serialize::string")]
    pub classid: ClassId,
    #[serde(default)]
    #[serde(deserialize_with = "option_string_0_as_none")]
    pub instanceid: InstanceId,
    #[serde(default)]
    #[serde(deserialize_with = "from_int_to_bool")]
    pub tradable: bool,
    #[serde(default)]
    #[serde(deserialize_with = "from_int_to_bool")]
    pub marketable: bool,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

impl RawDescription {
    /// The key descriptions are looked up under.
    pub fn class(&self) -> (ClassId, InstanceId) {
        (self.classid, self.instanceid)
    }
}

/// A trade offer before its items are combined with their descriptions.
#[derive(Deserialize, Debug, Clone)]
pub struct RawTradeOffer {
    #[serde(with = "serialize::string")]
    pub tradeofferid: TradeOfferId,
    pub accountid_other: u32,
    #[serde(default)]
    pub message: Option<String>,
    pub trade_offer_state: TradeOfferState,
    #[serde(default)]
    pub items_to_give: Vec<RawAsset>,
    #[serde(default)]
    pub items_to_receive: Vec<RawAsset>,
    pub is_our_offer: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expiration_time: ServerTime,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time_created: ServerTime,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub time_updated: ServerTime,
    #[serde(default)]
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub escrow_end_date: Option<ServerTime>,
}

#[derive(Deserialize, Debug)]
pub struct GetTradeOffersResponseBody {
    #[serde(default)]
    pub trade_offers_received: Vec<RawTradeOffer>,
    #[serde(default)]
    pub trade_offers_sent: Vec<RawTradeOffer>,
    #[serde(default)]
    pub descriptions: Vec<RawDescription>,
    #[serde(default)]
    pub next_cursor: Option<u32>,
}

#[derive(Deserialize, Debug)]
pub struct GetTradeOffersResponse {
    pub response: GetTradeOffersResponseBody,
}

#[derive(Deserialize, Debug)]
pub struct GetInventoryResponse {
    #[serde(default)]
    #[serde(deserialize_with = "from_int_to_bool")]
    pub success: bool,
    #[serde(default)]
    #[serde(deserialize_with = "from_int_to_bool")]
    pub more_items: bool,
    #[serde(default)]
    pub assets: Vec<RawAsset>,
    #[serde(default)]
    pub descriptions: Vec<RawDescription>,
    #[serde(default)]
    #[serde(deserialize_with = "option_str_to_number")]
    pub last_assetid: Option<u64>,
}

/// The response after sending a new trade offer.
#[derive(Deserialize, Debug)]
pub struct SentOffer {
    #[serde(with = "serialize::string")]
    pub tradeofferid: TradeOfferId,
    #[serde(default)]
    pub needs_mobile_confirmation: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_raw_trade_offer() {
        let offer: RawTradeOffer = serde_json::from_str(r#"{
            "tradeofferid": "6271878669",
            "accountid_other": 49884316,
            "message": "one card for one card",
            "expiration_time": 1657543518,
            "trade_offer_state": 2,
            "items_to_receive": [{
                "appid": 753,
                "contextid": "6",
                "assetid": "12572817136",
                "classid": "4935217984",
                "instanceid": "0",
                "amount": "1"
            }],
            "items_to_give": [{
                "appid": 753,
                "contextid": "6",
                "assetid": "12393594195",
                "classid": "4935223037",
                "instanceid": "0",
                "amount": "1"
            }],
            "is_our_offer": false,
            "time_created": 1656333918,
            "time_updated": 1656333918,
            "from_real_time_trade": false,
            "escrow_end_date": 0,
            "confirmation_method": 0
        }"#).unwrap();

        assert_eq!(offer.tradeofferid, 6271878669);
        assert_eq!(offer.trade_offer_state, TradeOfferState::Active);
        assert_eq!(offer.items_to_give[0].classid, 4935223037);
        assert_eq!(offer.items_to_give[0].instanceid, None);
        assert!(!offer.is_our_offer);
    }

    #[test]
    fn parses_inventory_response() {
        let response: GetInventoryResponse = serde_json::from_str(r#"{
            "success": 1,
            "more_items": 1,
            "assets": [{
                "appid": 753,
                "contextid": "6",
                "assetid": "11152148507",
                "classid": "4935217984",
                "instanceid": "0",
                "amount": "3"
            }],
            "descriptions": [{
                "appid": 753,
                "classid": "4935217984",
                "instanceid": "0",
                "tradable": 1,
                "marketable": 1,
                "tags": [
                    {"category": "Game", "internal_name": "app_632360"},
                    {"category": "item_class", "internal_name": "item_class_2"},
                    {"category": "cardborder", "internal_name": "cardborder_0"},
                    {"category": "droprate", "internal_name": "droprate_0"}
                ]
            }],
            "last_assetid": "11152148507",
            "total_inventory_count": 166
        }"#).unwrap();

        assert!(response.success);
        assert!(response.more_items);
        assert_eq!(response.assets[0].amount, 3);
        assert_eq!(response.last_assetid, Some(11152148507));
        assert_eq!(response.descriptions[0].tags.len(), 4);
    }
}
