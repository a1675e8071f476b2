use crate::types::TradeOfferId;
use std::collections::HashSet;
use std::sync::Mutex;

/// The IDs of offers already decided in this session. Shared by every concurrently evaluated
/// offer within a pass, so all operations take `&self`.
#[derive(Debug, Default)]
pub struct HandledOfferSet {
    tradeofferids: Mutex<HashSet<TradeOfferId>>,
}

impl HandledOfferSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an offer as handled. Returns whether it was newly inserted.
    pub fn insert(&self, tradeofferid: TradeOfferId) -> bool {
        self.tradeofferids.lock().unwrap().insert(tradeofferid)
    }

    /// Forgets an offer so a later pass may handle it again.
    pub fn remove(&self, tradeofferid: TradeOfferId) -> bool {
        self.tradeofferids.lock().unwrap().remove(&tradeofferid)
    }

    pub fn contains(&self, tradeofferid: TradeOfferId) -> bool {
        self.tradeofferids.lock().unwrap().contains(&tradeofferid)
    }

    pub fn clear(&self) {
        self.tradeofferids.lock().unwrap().clear();
    }

    /// Keeps only the offers still present in `tradeofferids`.
    pub fn retain_only(&self, tradeofferids: &HashSet<TradeOfferId>) {
        self.tradeofferids
            .lock()
            .unwrap()
            .retain(|tradeofferid| tradeofferids.contains(tradeofferid));
    }

    /// Forgets every one of the given offers.
    pub fn remove_all(&self, tradeofferids: &[TradeOfferId]) {
        let mut handled = self.tradeofferids.lock().unwrap();

        for tradeofferid in tradeofferids {
            handled.remove(tradeofferid);
        }
    }
}
