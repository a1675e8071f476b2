use super::ParseTradeResult;
use crate::response::TradeOffer;
use async_trait::async_trait;

/// Callbacks into the surrounding application. All methods default to doing nothing.
#[async_trait]
pub trait TradeOfferHooks: Send + Sync {
    /// Called for an offer about to be ignored or rejected. Return `true` to accept the offer
    /// regardless of the evaluation.
    async fn on_trade_offer(&self, offer: &TradeOffer) -> bool {
        let _ = offer;

        false
    }

    /// Called at the end of a pass with the outcome of every offer that was decided.
    async fn on_trade_offer_results(&self, results: &[ParseTradeResult]) {
        let _ = results;
    }
}
