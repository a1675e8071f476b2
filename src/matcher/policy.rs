use super::TradeMatcher;
use crate::enums::{TradeResult, UserPermission};
use crate::response::{Asset, TradeOffer};
use crate::sets::{is_fair_exchange, is_trade_neutral_or_better};
use crate::types::AppId;
use std::collections::HashSet;

/// The app ID Steam Community items live under.
pub(crate) const STEAM_COMMUNITY_APPID: AppId = 753;

/// Games whose cards only drop around time-limited sale events. Giving their cards away under
/// a trade hold is refused, since replacements may no longer drop once the hold releases.
const SALE_EVENT_APPIDS: [AppId; 12] = [
    267420, 303700, 335590, 368020, 425280, 480730,
    566020, 639900, 762800, 876740, 991980, 1195690,
];

impl TradeMatcher {
    /// Decides what to do with a single active offer. Cheap checks against counts and flags
    /// run first; the network is only consulted for offers that survive them.
    pub(super) async fn should_accept_trade(&self, offer: &TradeOffer) -> TradeResult {
        let partner64 = u64::from(offer.partner);

        // A partner of 0 is the Steam system itself, which no user-level rule applies to.
        if partner64 != 0 {
            if self.config.permission_of(partner64) == UserPermission::Master {
                return TradeResult::Accepted;
            }

            if self.config.trading_blacklist.contains(&partner64) {
                log::debug!("{offer}: partner is blacklisted from trading with us");

                return TradeResult::Blacklisted;
            }
        }

        if offer.items_to_give.is_empty() && offer.items_to_receive.is_empty() {
            // A glitched offer; it should come back with its items on a later fetch.
            return TradeResult::TryAgain;
        }

        if offer.items_to_give.is_empty() {
            return self.should_accept_donation(offer);
        }

        if !self.config.steam_trade_matcher {
            return TradeResult::Rejected;
        }

        if offer.items_to_give.len() > offer.items_to_receive.len() {
            return TradeResult::Rejected;
        }

        let matchable = offer.items().all(|item| {
            item.appid == STEAM_COMMUNITY_APPID
                && self.config.matchable_types.contains(&item.r#type)
        });

        if !matchable || !is_fair_exchange(&offer.items_to_give, &offer.items_to_receive).unwrap_or(false) {
            return TradeResult::Rejected;
        }

        let hold_duration = match self.client.get_trade_hold_duration(offer.partner, offer.tradeofferid).await {
            Ok(Some(days)) => days,
            Ok(None) => {
                log::warn!("{offer}: trade hold duration is unavailable");

                return TradeResult::TryAgain;
            },
            Err(error) => {
                log::warn!("{offer}: failed to get trade hold duration: {error}");

                return TradeResult::TryAgain;
            },
        };

        if hold_duration > 0 {
            if hold_duration > self.config.max_trade_hold_duration {
                return TradeResult::Rejected;
            }

            let gives_sale_event_cards = offer.items_to_give
                .iter()
                .any(|item| item.r#type.is_trading_card() && SALE_EVENT_APPIDS.contains(&item.real_appid));

            if gives_sale_event_cards {
                return TradeResult::Rejected;
            }
        }

        if self.config.match_everything {
            return TradeResult::Accepted;
        }

        let wanted_sets = offer.items_to_give
            .iter()
            .map(Asset::set_key)
            .collect::<HashSet<_>>();
        let inventory = match self.client.get_inventory(self.steamid).await {
            Ok(inventory) => inventory
                .into_iter()
                .filter(|item| wanted_sets.contains(&item.set_key()))
                .collect::<Vec<_>>(),
            Err(error) => {
                log::warn!("{offer}: failed to get our inventory: {error}");

                return TradeResult::TryAgain;
            },
        };

        if inventory.is_empty() {
            log::warn!("{offer}: our inventory holds nothing from the requested sets");

            return TradeResult::TryAgain;
        }

        match is_trade_neutral_or_better(inventory, &offer.items_to_give, &offer.items_to_receive) {
            Ok(true) => TradeResult::Accepted,
            Ok(false) => TradeResult::Rejected,
            Err(error) => {
                // Our inventory no longer covers what the offer takes from us.
                log::warn!("{offer}: {error}");

                TradeResult::TryAgain
            },
        }
    }

    fn should_accept_donation(&self, offer: &TradeOffer) -> TradeResult {
        let accept_donations = self.config.accept_donations;
        let accept_bot_trades = !self.config.dont_accept_bot_trades;

        if accept_donations && accept_bot_trades {
            return TradeResult::Accepted;
        }

        if !accept_donations && !accept_bot_trades {
            return TradeResult::Rejected;
        }

        let is_bot_trade = u64::from(offer.partner) != 0
            && self.registry.is_own_bot(offer.partner);
        let accept = (accept_donations && !is_bot_trade) || (accept_bot_trades && is_bot_trade);

        if accept {
            TradeResult::Accepted
        } else {
            TradeResult::Rejected
        }
    }
}
