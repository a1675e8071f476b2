//! Models data received from Steam.

pub mod asset;
pub mod trade_offer;
pub mod accepted_offer;

pub use asset::Asset;
pub use trade_offer::TradeOffer;
pub use accepted_offer::AcceptedOffer;
