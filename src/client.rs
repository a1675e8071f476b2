//! Contracts for the services the matcher drives. The engine only depends on these traits;
//! [`crate::api::SteamTradeOfferAPI`] provides the implementation backed by the Steam Web API.

use crate::enums::AssetType;
use crate::error::Error;
use crate::response::{AcceptedOffer, Asset, TradeOffer};
use crate::types::TradeOfferId;
use std::collections::HashSet;
use async_trait::async_trait;
use steamid_ng::SteamID;

/// Lists, responds to and confirms trade offers on behalf of the account.
#[async_trait]
pub trait TradingClient: Send + Sync {
    /// Gets the currently active trade offers sent to us.
    async fn get_active_trade_offers(&self) -> Result<Vec<TradeOffer>, Error>;

    /// Accepts an offer.
    async fn accept_trade_offer(
        &self,
        tradeofferid: TradeOfferId,
        partner: SteamID,
    ) -> Result<AcceptedOffer, Error>;

    /// Declines an offer.
    async fn decline_trade_offer(&self, tradeofferid: TradeOfferId) -> Result<(), Error>;

    /// Gets a user's Steam Community inventory.
    async fn get_inventory(&self, steamid: SteamID) -> Result<Vec<Asset>, Error>;

    /// Gets the trade hold in days our partner's items would be under, or `None` when the
    /// duration cannot be determined right now.
    async fn get_trade_hold_duration(
        &self,
        partner: SteamID,
        tradeofferid: TradeOfferId,
    ) -> Result<Option<u8>, Error>;

    /// Whether the account is protected by a mobile authenticator.
    fn has_mobile_authenticator(&self) -> bool;

    /// Confirms the given accepted offers through the mobile authenticator. When
    /// `wait_if_necessary` is set, waits for confirmations that have not appeared yet.
    async fn accept_trade_confirmations(
        &self,
        tradeofferids: &[TradeOfferId],
        wait_if_necessary: bool,
    ) -> Result<(), Error>;

    /// Sends our tradable items of the given types onwards to wherever completed items are
    /// collected.
    async fn send_inventory(&self, types: &HashSet<AssetType>) -> Result<(), Error>;
}

/// Knowledge of the other accounts under our control.
pub trait BotRegistry: Send + Sync {
    /// Whether the given user is another bot of ours.
    fn is_own_bot(&self, steamid: SteamID) -> bool;
}

/// The registry for deployments running a single account.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleBot;

impl BotRegistry for SingleBot {
    fn is_own_bot(&self, _steamid: SteamID) -> bool {
        false
    }
}
