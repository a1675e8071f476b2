mod client;
mod config;
mod helpers;
mod matcher;
mod response;
mod serialize;

pub mod api;
pub mod enums;
pub mod error;
pub mod mobile_api;
pub mod sets;
pub mod time;
pub mod types;

pub use api::SteamTradeOfferAPI;
pub use client::{BotRegistry, SingleBot, TradingClient};
pub use config::BotConfig;
pub use matcher::{
    HandledOfferSet,
    ParseTradeResult,
    TradeMatcher,
    TradeMatcherBuilder,
    TradeOfferHooks,
    MAX_ITEMS_PER_TRADE,
    MAX_TRADES_PER_ACCOUNT,
};
pub use response::{AcceptedOffer, Asset, TradeOffer};
pub use time::ServerTime;

pub use steamid_ng::SteamID;
