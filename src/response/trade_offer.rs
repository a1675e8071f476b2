use std::fmt;
use super::asset::Asset;
use crate::enums::{AssetType, TradeOfferState};
use crate::time::ServerTime;
use crate::types::TradeOfferId;
use std::collections::HashSet;
use steamid_ng::SteamID;

/// A trade offer received from or sent to another user.
#[derive(Debug, Clone)]
pub struct TradeOffer {
    /// The ID for this offer.
    pub tradeofferid: TradeOfferId,
    /// The [`SteamID`] of our partner. A partner of `0` means the offer comes from the Steam
    /// system itself.
    pub partner: SteamID,
    /// The message included in the offer.
    pub message: Option<String>,
    /// The items we would give in this offer.
    pub items_to_give: Vec<Asset>,
    /// The items we would receive in this offer.
    pub items_to_receive: Vec<Asset>,
    /// Whether this offer was created by us.
    pub is_our_offer: bool,
    /// The time the offer expires.
    pub expiration_time: ServerTime,
    /// The time the offer was created.
    pub time_created: ServerTime,
    /// The time the offer was last acted on.
    pub time_updated: ServerTime,
    /// The state of the offer.
    pub trade_offer_state: TradeOfferState,
    /// The time the items become available if this offer is held in escrow.
    pub escrow_end_date: ServerTime,
}

impl fmt::Display for TradeOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", u64::from(self.partner), self.tradeofferid)
    }
}

impl TradeOffer {
    /// Iterates over the items on both sides of the offer.
    pub fn items(&self) -> impl Iterator<Item = &Asset> {
        self.items_to_give.iter().chain(self.items_to_receive.iter())
    }

    /// The total amount of items we would give.
    pub fn given_amount(&self) -> u64 {
        self.items_to_give
            .iter()
            .map(|item| u64::from(item.amount))
            .sum()
    }

    /// The total amount of items we would receive.
    pub fn received_amount(&self) -> u64 {
        self.items_to_receive
            .iter()
            .map(|item| u64::from(item.amount))
            .sum()
    }

    /// The types of the items we would receive.
    pub fn received_item_types(&self) -> HashSet<AssetType> {
        self.items_to_receive
            .iter()
            .map(|item| item.r#type)
            .collect()
    }
}
