use crate::enums::{AssetType, TradeResult};
use crate::response::TradeOffer;
use crate::types::TradeOfferId;
use std::collections::HashSet;

/// The outcome of handling a single trade offer.
#[derive(Debug, Clone)]
pub struct ParseTradeResult {
    /// The ID of the offer this verdict belongs to.
    pub tradeofferid: TradeOfferId,
    /// The verdict.
    pub result: TradeResult,
    /// The types of the items the offer would give us.
    pub received_item_types: HashSet<AssetType>,
}

impl ParseTradeResult {
    pub(super) fn new(offer: &TradeOffer, result: TradeResult) -> Self {
        Self {
            tradeofferid: offer.tradeofferid,
            result,
            received_item_types: offer.received_item_types(),
        }
    }
}
