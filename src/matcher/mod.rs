//! The engine which evaluates and responds to incoming trade offers.

mod builder;
mod handled_offers;
mod hooks;
mod parse_result;
mod policy;

pub use builder::TradeMatcherBuilder;
pub use handled_offers::HandledOfferSet;
pub use hooks::TradeOfferHooks;
pub use parse_result::ParseTradeResult;

pub(crate) use policy::STEAM_COMMUNITY_APPID;

use crate::client::{BotRegistry, TradingClient};
use crate::config::BotConfig;
use crate::enums::{TradeOfferState, TradeResult};
use crate::response::TradeOffer;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use steamid_ng::SteamID;
use tokio::sync::Semaphore;

/// The most items Steam allows on both sides of an offer combined.
pub const MAX_ITEMS_PER_TRADE: usize = 255;
/// The most active offers Steam allows per partner.
pub const MAX_TRADES_PER_ACCOUNT: usize = 5;

/// Evaluates incoming trade offers for a single account and accepts, declines or ignores
/// them.
///
/// Any number of tasks may call [`TradeMatcher::on_new_trade`]; calls coalesce so that one
/// parsing pass runs at a time with at most one more queued behind it. Offers within a pass
/// are evaluated concurrently, and each offer is acted on at most once per session.
pub struct TradeMatcher {
    /// The [`SteamID`] of the account this matcher runs for.
    pub steamid: SteamID,
    config: BotConfig,
    client: Arc<dyn TradingClient>,
    registry: Arc<dyn BotRegistry>,
    hooks: Option<Arc<dyn TradeOfferHooks>>,
    /// Guards every operation mutating this account's trading state, shared with the
    /// surrounding subsystem.
    trading_lock: Arc<tokio::sync::Mutex<()>>,
    handled_offers: HandledOfferSet,
    /// Whether a parsing pass is already queued up. Only ever held for the flag check, never
    /// across an await.
    parsing_scheduled: Mutex<bool>,
    /// Gates entry into a parsing pass.
    trades_semaphore: Semaphore,
}

impl TradeMatcher {
    /// Builder for a new matcher.
    pub fn builder(steamid: SteamID, client: Arc<dyn TradingClient>) -> TradeMatcherBuilder {
        TradeMatcherBuilder::new(steamid, client)
    }

    /// Schedules a parsing pass over the active offers.
    ///
    /// Call this whenever something signals that offers may have changed. Bursts collapse: if
    /// a pass is already queued this returns immediately, otherwise it waits for its turn so
    /// that offers arriving mid-pass are picked up by exactly one follow-up pass.
    pub async fn on_new_trade(&self) {
        {
            let mut parsing_scheduled = self.parsing_scheduled.lock().unwrap();

            if *parsing_scheduled {
                // A queued pass will pick our offers up.
                return;
            }

            *parsing_scheduled = true;
        }

        let lootable_received = {
            let _permit = match self.trades_semaphore.acquire().await {
                Ok(permit) => permit,
                // The semaphore is never closed.
                Err(_) => return,
            };
            let _trading = self.trading_lock.lock().await;

            // Both locks are held now, so a call arriving from here on has to queue its own
            // pass behind us to see the offers we might miss.
            *self.parsing_scheduled.lock().unwrap() = false;

            match self.parse_active_trades().await {
                Ok(lootable_received) => lootable_received,
                Err(error) => {
                    log::warn!("Failed to parse active trade offers: {error}");

                    false
                },
            }
        };

        if lootable_received && self.config.send_on_farming_finished {
            if let Err(error) = self.client.send_inventory(&self.config.lootable_types).await {
                log::warn!("Failed to send received items onwards: {error}");
            }
        }
    }

    /// Clears per-session state after a disconnect. Offers seen before the disconnect become
    /// eligible for handling again.
    pub fn on_disconnected(&self) {
        self.handled_offers.clear();
    }

    /// Runs one pass over the active offers. Returns whether any accepted offer gave us items
    /// of a lootable type.
    async fn parse_active_trades(&self) -> Result<bool, crate::error::Error> {
        let offers = self.client.get_active_trade_offers().await?;

        if offers.is_empty() {
            return Ok(false);
        }

        // Handled IDs not among the active offers can never be seen again.
        let active_tradeofferids = offers
            .iter()
            .map(|offer| offer.tradeofferid)
            .collect::<HashSet<_>>();

        self.handled_offers.retain_only(&active_tradeofferids);

        let offers = offers
            .into_iter()
            .filter(|offer| !self.handled_offers.contains(offer.tradeofferid))
            .collect::<Vec<_>>();

        if offers.is_empty() {
            return Ok(false);
        }

        let results = futures::future::join_all(
            offers
                .iter()
                .map(|offer| self.parse_trade(offer)),
        ).await;
        let has_authenticator = self.client.has_mobile_authenticator();

        if has_authenticator {
            let mobile_tradeofferids = results
                .iter()
                .filter_map(|(result, requires_mobile_confirmation)| match result {
                    Some(result) if result.result == TradeResult::Accepted && *requires_mobile_confirmation => {
                        Some(result.tradeofferid)
                    },
                    _ => None,
                })
                .collect::<Vec<_>>();

            if !mobile_tradeofferids.is_empty() {
                if let Err(error) = self.client.accept_trade_confirmations(&mobile_tradeofferids, true).await {
                    log::error!(
                        "Failed to confirm {} accepted trade offer(s): {error}",
                        mobile_tradeofferids.len(),
                    );
                    // Let the next pass accept and confirm these again.
                    self.handled_offers.remove_all(&mobile_tradeofferids);

                    return Ok(false);
                }
            }
        }

        let lootable_received = results
            .iter()
            .any(|(result, requires_mobile_confirmation)| {
                matches!(result, Some(result) if {
                    result.result == TradeResult::Accepted
                        && (!requires_mobile_confirmation || has_authenticator)
                        && result.received_item_types
                            .iter()
                            .any(|r#type| self.config.lootable_types.contains(r#type))
                })
            });
        let valid_results = results
            .into_iter()
            .filter_map(|(result, _requires_mobile_confirmation)| result)
            .collect::<Vec<_>>();

        if !valid_results.is_empty() {
            if let Some(hooks) = &self.hooks {
                hooks.on_trade_offer_results(&valid_results).await;
            }
        }

        Ok(lootable_received)
    }

    /// Handles a single offer. The second part of the returned tuple is whether an acceptance
    /// still requires a mobile confirmation.
    async fn parse_trade(&self, offer: &TradeOffer) -> (Option<ParseTradeResult>, bool) {
        if offer.trade_offer_state != TradeOfferState::Active {
            log::error!("{offer}: refusing to handle offer in state {}", offer.trade_offer_state);

            return (None, false);
        }

        if !self.handled_offers.insert(offer.tradeofferid) {
            // Handled before, possibly by a concurrent evaluation within this pass.
            return (Some(ParseTradeResult::new(offer, TradeResult::Ignored)), false);
        }

        let decision = self.should_accept_trade(offer).await;
        let mut result = decision;

        if matches!(decision, TradeResult::Ignored | TradeResult::Rejected) {
            if let Some(hooks) = &self.hooks {
                if hooks.on_trade_offer(offer).await {
                    result = TradeResult::Accepted;
                }
            }
        }

        let mut requires_mobile_confirmation = false;

        match result {
            TradeResult::Accepted => {
                match self.client.accept_trade_offer(offer.tradeofferid, offer.partner).await {
                    Ok(accepted) => {
                        requires_mobile_confirmation = accepted.needs_mobile_confirmation;

                        if decision == result {
                            log::info!("{offer}: accepted trade offer");
                        } else {
                            log::info!("{offer}: accepted trade offer on a hook override (evaluated as {decision})");
                        }

                        let given_amount = offer.given_amount();
                        let received_amount = offer.received_amount();

                        if received_amount > given_amount {
                            log::info!(
                                "{offer}: accepted donation of {} item(s)",
                                received_amount - given_amount,
                            );
                        }
                    },
                    Err(error) => {
                        log::warn!("{offer}: failed to accept trade offer: {error}");
                        result = TradeResult::TryAgain;
                    },
                }
            },
            TradeResult::Blacklisted => {
                if let Err(error) = self.client.decline_trade_offer(offer.tradeofferid).await {
                    log::warn!("{offer}: failed to decline trade offer: {error}");
                    result = TradeResult::TryAgain;
                } else {
                    log::info!("{offer}: declined trade offer from blacklisted partner");
                }
            },
            TradeResult::Rejected if self.config.reject_invalid_trades => {
                if let Err(error) = self.client.decline_trade_offer(offer.tradeofferid).await {
                    log::warn!("{offer}: failed to decline trade offer: {error}");
                    result = TradeResult::TryAgain;
                } else {
                    log::info!("{offer}: declined trade offer");
                }
            },
            TradeResult::Ignored | TradeResult::Rejected => {
                log::debug!("{offer}: {result} trade offer, leaving it untouched");
            },
            TradeResult::TryAgain => {},
        }

        if result == TradeResult::TryAgain {
            // However we got here, the offer must stay eligible for the next pass.
            self.handled_offers.remove(offer.tradeofferid);
            log::debug!("{offer}: will try this offer again on a later pass");
        }

        (Some(ParseTradeResult::new(offer, result)), requires_mobile_confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{AssetType, UserPermission};
    use crate::error::Error;
    use crate::response::{AcceptedOffer, Asset};
    use crate::sets::test_items::cards;
    use crate::time::get_server_time_now;
    use crate::types::TradeOfferId;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use async_trait::async_trait;

    const PARTNER: u64 = 76561198000000001;
    const OUR_STEAMID: u64 = 76561198000000002;

    #[derive(Default)]
    struct MockClient {
        /// Queued responses for fetches of active offers; an empty queue fetches no offers.
        offer_responses: StdMutex<VecDeque<Vec<TradeOffer>>>,
        inventory: StdMutex<Vec<Asset>>,
        hold_duration: StdMutex<Option<u8>>,
        has_authenticator: bool,
        needs_mobile_confirmation: bool,
        fail_accept: AtomicBool,
        fail_hold: AtomicBool,
        fail_inventory: AtomicBool,
        fail_confirmations: AtomicBool,
        fetch_count: AtomicUsize,
        accept_count: AtomicUsize,
        decline_count: AtomicUsize,
        confirmation_count: AtomicUsize,
        send_count: AtomicUsize,
        /// When set, fetches block until a permit is released.
        fetch_gate: Option<Arc<Semaphore>>,
    }

    impl MockClient {
        fn new() -> Self {
            Self {
                hold_duration: StdMutex::new(Some(0)),
                ..Self::default()
            }
        }

        fn with_offers(self, offers: Vec<Vec<TradeOffer>>) -> Self {
            *self.offer_responses.lock().unwrap() = offers.into();
            self
        }

        fn with_inventory(self, inventory: Vec<Asset>) -> Self {
            *self.inventory.lock().unwrap() = inventory;
            self
        }

        fn with_hold_duration(self, hold_duration: Option<u8>) -> Self {
            *self.hold_duration.lock().unwrap() = hold_duration;
            self
        }
    }

    #[async_trait]
    impl TradingClient for MockClient {
        async fn get_active_trade_offers(&self) -> Result<Vec<TradeOffer>, Error> {
            self.fetch_count.fetch_add(1, Ordering::SeqCst);

            if let Some(gate) = &self.fetch_gate {
                gate.acquire().await.unwrap().forget();
            }

            Ok(self.offer_responses.lock().unwrap().pop_front().unwrap_or_default())
        }

        async fn accept_trade_offer(
            &self,
            _tradeofferid: TradeOfferId,
            _partner: SteamID,
        ) -> Result<AcceptedOffer, Error> {
            self.accept_count.fetch_add(1, Ordering::SeqCst);

            if self.fail_accept.load(Ordering::SeqCst) {
                return Err(Error::ResponseUnsuccessful);
            }

            Ok(AcceptedOffer {
                tradeid: Some(1),
                needs_mobile_confirmation: self.needs_mobile_confirmation,
                needs_email_confirmation: false,
                email_domain: None,
            })
        }

        async fn decline_trade_offer(&self, _tradeofferid: TradeOfferId) -> Result<(), Error> {
            self.decline_count.fetch_add(1, Ordering::SeqCst);

            Ok(())
        }

        async fn get_inventory(&self, _steamid: SteamID) -> Result<Vec<Asset>, Error> {
            if self.fail_inventory.load(Ordering::SeqCst) {
                return Err(Error::ResponseUnsuccessful);
            }

            Ok(self.inventory.lock().unwrap().clone())
        }

        async fn get_trade_hold_duration(
            &self,
            _partner: SteamID,
            _tradeofferid: TradeOfferId,
        ) -> Result<Option<u8>, Error> {
            if self.fail_hold.load(Ordering::SeqCst) {
                return Err(Error::ResponseUnsuccessful);
            }

            Ok(*self.hold_duration.lock().unwrap())
        }

        fn has_mobile_authenticator(&self) -> bool {
            self.has_authenticator
        }

        async fn accept_trade_confirmations(
            &self,
            _tradeofferids: &[TradeOfferId],
            _wait_if_necessary: bool,
        ) -> Result<(), Error> {
            self.confirmation_count.fetch_add(1, Ordering::SeqCst);

            if self.fail_confirmations.load(Ordering::SeqCst) {
                return Err(Error::ConfirmationUnsuccessful(None));
            }

            Ok(())
        }

        async fn send_inventory(&self, _types: &HashSet<AssetType>) -> Result<(), Error> {
            self.send_count.fetch_add(1, Ordering::SeqCst);

            Ok(())
        }
    }

    fn matcher_config() -> BotConfig {
        BotConfig {
            steam_trade_matcher: true,
            ..BotConfig::default()
        }
    }

    fn build_matcher(client: Arc<MockClient>, config: BotConfig) -> TradeMatcher {
        TradeMatcher::builder(SteamID::from(OUR_STEAMID), client)
            .config(config)
            .build()
    }

    fn offer(tradeofferid: TradeOfferId, items_to_give: Vec<Asset>, items_to_receive: Vec<Asset>) -> TradeOffer {
        let now = get_server_time_now();

        TradeOffer {
            tradeofferid,
            partner: SteamID::from(PARTNER),
            message: None,
            items_to_give,
            items_to_receive,
            is_our_offer: false,
            expiration_time: now,
            time_created: now,
            time_updated: now,
            trade_offer_state: TradeOfferState::Active,
            escrow_end_date: now,
        }
    }

    fn donation(tradeofferid: TradeOfferId) -> TradeOffer {
        offer(tradeofferid, Vec::new(), cards(&[(10, 1)]))
    }

    /// An even swap improving our set progress against `progress_inventory`.
    fn good_swap(tradeofferid: TradeOfferId) -> TradeOffer {
        offer(tradeofferid, cards(&[(1, 1)]), cards(&[(4, 1)]))
    }

    fn progress_inventory() -> Vec<Asset> {
        cards(&[(1, 2), (2, 2), (3, 2)])
    }

    #[tokio::test]
    async fn master_offers_are_always_accepted() {
        let client = Arc::new(MockClient::new());
        let mut config = BotConfig::default();

        config.steam_user_permissions.insert(PARTNER, UserPermission::Master);

        let matcher = build_matcher(client, config);
        // a wildly unfavorable offer
        let offer = offer(1, cards(&[(1, 5), (2, 5)]), cards(&[(3, 1)]));

        assert_eq!(matcher.should_accept_trade(&offer).await, TradeResult::Accepted);
    }

    #[tokio::test]
    async fn blacklisted_partners_are_blacklisted() {
        let client = Arc::new(MockClient::new());
        let mut config = matcher_config();

        config.trading_blacklist.insert(PARTNER);

        let matcher = build_matcher(client, config);

        assert_eq!(matcher.should_accept_trade(&good_swap(1)).await, TradeResult::Blacklisted);
    }

    #[tokio::test]
    async fn empty_offers_are_retried() {
        let client = Arc::new(MockClient::new());
        let matcher = build_matcher(client, matcher_config());
        let offer = offer(1, Vec::new(), Vec::new());

        assert_eq!(matcher.should_accept_trade(&offer).await, TradeResult::TryAgain);
    }

    #[tokio::test]
    async fn donations_follow_config() {
        let client = Arc::new(MockClient::new());

        // donations off, bot trades allowed, partner is not a bot
        let matcher = build_matcher(Arc::clone(&client), BotConfig::default());

        assert_eq!(matcher.should_accept_trade(&donation(1)).await, TradeResult::Rejected);

        // donations on
        let config = BotConfig {
            accept_donations: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(Arc::clone(&client), config);

        assert_eq!(matcher.should_accept_trade(&donation(2)).await, TradeResult::Accepted);

        // everything off
        let config = BotConfig {
            dont_accept_bot_trades: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(client, config);

        assert_eq!(matcher.should_accept_trade(&donation(3)).await, TradeResult::Rejected);
    }

    #[tokio::test]
    async fn bot_donations_follow_registry() {
        struct EveryoneIsOurBot;

        impl BotRegistry for EveryoneIsOurBot {
            fn is_own_bot(&self, _steamid: SteamID) -> bool {
                true
            }
        }

        // bot trades allowed, donations off: a bot donation passes, since bots shuffling
        // items between each other is not a donation from a user
        let client: Arc<MockClient> = Arc::new(MockClient::new());
        let matcher = TradeMatcher::builder(SteamID::from(OUR_STEAMID), Arc::clone(&client) as Arc<dyn TradingClient>)
            .registry(Arc::new(EveryoneIsOurBot))
            .build();

        assert_eq!(matcher.should_accept_trade(&donation(1)).await, TradeResult::Accepted);

        // bot trades refused, donations on: the same offer is now rejected
        let config = BotConfig {
            accept_donations: true,
            dont_accept_bot_trades: true,
            ..BotConfig::default()
        };
        let matcher = TradeMatcher::builder(SteamID::from(OUR_STEAMID), client as Arc<dyn TradingClient>)
            .config(config)
            .registry(Arc::new(EveryoneIsOurBot))
            .build();

        assert_eq!(matcher.should_accept_trade(&donation(2)).await, TradeResult::Rejected);
    }

    #[tokio::test]
    async fn two_sided_offers_require_the_matcher() {
        let client = Arc::new(MockClient::new());
        let matcher = build_matcher(client, BotConfig::default());

        assert_eq!(matcher.should_accept_trade(&good_swap(1)).await, TradeResult::Rejected);
    }

    #[tokio::test]
    async fn rejects_offers_giving_more_items_than_received() {
        let client = Arc::new(MockClient::new());
        let matcher = build_matcher(client, matcher_config());
        let offer = offer(1, cards(&[(1, 1), (2, 1)]), cards(&[(3, 1)]));

        assert_eq!(matcher.should_accept_trade(&offer).await, TradeResult::Rejected);
    }

    #[tokio::test]
    async fn rejects_unmatchable_item_types() {
        let client = Arc::new(MockClient::new());
        let matcher = build_matcher(client, matcher_config());
        let mut offer = good_swap(1);

        offer.items_to_give[0].r#type = AssetType::Emoticon;

        assert_eq!(matcher.should_accept_trade(&offer).await, TradeResult::Rejected);
    }

    #[tokio::test]
    async fn rejects_unfair_exchanges() {
        let client = Arc::new(MockClient::new());
        let matcher = build_matcher(client, matcher_config());
        // 3 cards of the set for 2 of it
        let offer = offer(1, cards(&[(1, 2), (2, 1)]), cards(&[(3, 1), (4, 1)]));

        assert_eq!(matcher.should_accept_trade(&offer).await, TradeResult::Rejected);
    }

    #[tokio::test]
    async fn retries_when_hold_duration_is_unavailable() {
        let client = Arc::new(MockClient::new().with_hold_duration(None));
        let matcher = build_matcher(client, matcher_config());

        assert_eq!(matcher.should_accept_trade(&good_swap(1)).await, TradeResult::TryAgain);

        let client = Arc::new(MockClient::new());

        client.fail_hold.store(true, Ordering::SeqCst);

        let matcher = build_matcher(client, matcher_config());

        assert_eq!(matcher.should_accept_trade(&good_swap(2)).await, TradeResult::TryAgain);
    }

    #[tokio::test]
    async fn rejects_excessive_trade_holds() {
        let client = Arc::new(MockClient::new().with_hold_duration(Some(16)));
        let matcher = build_matcher(client, matcher_config());

        assert_eq!(matcher.should_accept_trade(&good_swap(1)).await, TradeResult::Rejected);
    }

    #[tokio::test]
    async fn rejects_held_sale_event_cards() {
        let client = Arc::new(
            MockClient::new()
                .with_hold_duration(Some(3))
                .with_inventory(progress_inventory()),
        );
        let matcher = build_matcher(client, matcher_config());
        let mut offer = good_swap(1);

        // a short hold alone is tolerated...
        assert_eq!(matcher.should_accept_trade(&offer).await, TradeResult::Accepted);

        // ...but not when we'd give away sale event cards under it
        for item in &mut offer.items_to_give {
            item.real_appid = 267420;
        }

        assert_eq!(matcher.should_accept_trade(&offer).await, TradeResult::Rejected);
    }

    #[tokio::test]
    async fn match_everything_skips_the_progress_check() {
        let client = Arc::new(MockClient::new());
        let config = BotConfig {
            match_everything: true,
            ..matcher_config()
        };
        let matcher = build_matcher(client, config);
        // fair on counts, but plainly useless for our sets
        let offer = offer(1, cards(&[(1, 1)]), cards(&[(1, 1)]));

        assert_eq!(matcher.should_accept_trade(&offer).await, TradeResult::Accepted);
    }

    #[tokio::test]
    async fn retries_when_inventory_is_unavailable() {
        let client = Arc::new(MockClient::new());

        client.fail_inventory.store(true, Ordering::SeqCst);

        let matcher = build_matcher(client, matcher_config());

        assert_eq!(matcher.should_accept_trade(&good_swap(1)).await, TradeResult::TryAgain);

        // an empty inventory is just as inconclusive
        let client = Arc::new(MockClient::new());
        let matcher = build_matcher(client, matcher_config());

        assert_eq!(matcher.should_accept_trade(&good_swap(2)).await, TradeResult::TryAgain);
    }

    #[tokio::test]
    async fn accepts_progressive_trades_and_rejects_regressions() {
        let client = Arc::new(MockClient::new().with_inventory(progress_inventory()));
        let matcher = build_matcher(client, matcher_config());

        assert_eq!(matcher.should_accept_trade(&good_swap(1)).await, TradeResult::Accepted);

        // swapping our last card of a class away regresses the set
        let client = Arc::new(MockClient::new().with_inventory(cards(&[(1, 1), (2, 1)])));
        let matcher = build_matcher(client, matcher_config());
        let offer = offer(2, cards(&[(1, 1)]), cards(&[(2, 1)]));

        assert_eq!(matcher.should_accept_trade(&offer).await, TradeResult::Rejected);
    }

    #[tokio::test]
    async fn handles_each_offer_at_most_once() {
        let client = Arc::new(MockClient::new());
        let config = BotConfig {
            accept_donations: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(Arc::clone(&client), config);
        let offer = donation(1);

        let (first, _) = matcher.parse_trade(&offer).await;
        let (second, _) = matcher.parse_trade(&offer).await;

        assert_eq!(first.unwrap().result, TradeResult::Accepted);
        assert_eq!(second.unwrap().result, TradeResult::Ignored);
        assert_eq!(client.accept_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_accepts_are_retried_later() {
        let client = Arc::new(MockClient::new());

        client.fail_accept.store(true, Ordering::SeqCst);

        let config = BotConfig {
            accept_donations: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(Arc::clone(&client), config);
        let (result, requires_mobile_confirmation) = matcher.parse_trade(&donation(1)).await;

        assert_eq!(result.unwrap().result, TradeResult::TryAgain);
        assert!(!requires_mobile_confirmation);
        // the offer must not be remembered as handled
        assert!(!matcher.handled_offers.contains(1));
    }

    #[tokio::test]
    async fn offers_not_active_are_skipped() {
        let client = Arc::new(MockClient::new());
        let matcher = build_matcher(client, BotConfig::default());
        let mut offer = donation(1);

        offer.trade_offer_state = TradeOfferState::InEscrow;

        let (result, _) = matcher.parse_trade(&offer).await;

        assert!(result.is_none());
        assert!(!matcher.handled_offers.contains(1));
    }

    #[tokio::test]
    async fn hooks_can_override_rejections() {
        struct AcceptEverything;

        #[async_trait]
        impl TradeOfferHooks for AcceptEverything {
            async fn on_trade_offer(&self, _offer: &TradeOffer) -> bool {
                true
            }
        }

        let client: Arc<MockClient> = Arc::new(MockClient::new());
        // with the matcher disabled this two-sided offer would be rejected
        let matcher = TradeMatcher::builder(SteamID::from(OUR_STEAMID), Arc::clone(&client) as Arc<dyn TradingClient>)
            .hooks(Arc::new(AcceptEverything))
            .build();
        let (result, _) = matcher.parse_trade(&good_swap(1)).await;

        assert_eq!(result.unwrap().result, TradeResult::Accepted);
        assert_eq!(client.accept_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejections_are_declined_when_configured() {
        let client = Arc::new(MockClient::new());
        let config = BotConfig {
            reject_invalid_trades: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(Arc::clone(&client), config);
        let (result, _) = matcher.parse_trade(&good_swap(1)).await;

        assert_eq!(result.unwrap().result, TradeResult::Rejected);
        assert_eq!(client.decline_count.load(Ordering::SeqCst), 1);

        // without the flag, rejections leave the offer untouched
        let client = Arc::new(MockClient::new());
        let matcher = build_matcher(Arc::clone(&client), BotConfig::default());
        let (result, _) = matcher.parse_trade(&good_swap(2)).await;

        assert_eq!(result.unwrap().result, TradeResult::Rejected);
        assert_eq!(client.decline_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_handled_ids_are_evicted() {
        let client = Arc::new(MockClient::new().with_offers(vec![
            vec![donation(1)],
            vec![donation(2)],
        ]));
        let config = BotConfig {
            accept_donations: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(client, config);

        matcher.parse_active_trades().await.unwrap();

        assert!(matcher.handled_offers.contains(1));

        matcher.parse_active_trades().await.unwrap();

        assert!(!matcher.handled_offers.contains(1));
        assert!(matcher.handled_offers.contains(2));
    }

    #[tokio::test]
    async fn failed_confirmations_evict_accepted_offers() {
        let client = Arc::new(MockClient {
            has_authenticator: true,
            needs_mobile_confirmation: true,
            ..MockClient::new()
        }.with_offers(vec![vec![donation(1)]]));

        client.fail_confirmations.store(true, Ordering::SeqCst);

        let config = BotConfig {
            accept_donations: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(Arc::clone(&client), config);
        let lootable_received = matcher.parse_active_trades().await.unwrap();

        assert!(!lootable_received);
        assert_eq!(client.confirmation_count.load(Ordering::SeqCst), 1);
        assert!(!matcher.handled_offers.contains(1));
    }

    #[tokio::test]
    async fn received_lootables_are_reported() {
        let client = Arc::new(MockClient::new().with_offers(vec![vec![donation(1)]]));
        let config = BotConfig {
            accept_donations: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(client, config);

        assert!(matcher.parse_active_trades().await.unwrap());
    }

    #[tokio::test]
    async fn received_non_lootables_are_not_reported() {
        let client = Arc::new(MockClient::new().with_offers(vec![vec![donation(1)]]));
        let config = BotConfig {
            accept_donations: true,
            lootable_types: HashSet::from([AssetType::BoosterPack]),
            ..BotConfig::default()
        };
        let matcher = build_matcher(client, config);

        assert!(!matcher.parse_active_trades().await.unwrap());
    }

    #[tokio::test]
    async fn lootables_trigger_the_follow_up_send() {
        let client = Arc::new(MockClient::new().with_offers(vec![vec![donation(1)]]));
        let config = BotConfig {
            accept_donations: true,
            send_on_farming_finished: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(Arc::clone(&client), config);

        matcher.on_new_trade().await;

        assert_eq!(client.send_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disconnects_clear_handled_offers() {
        let client = Arc::new(MockClient::new());
        let config = BotConfig {
            accept_donations: true,
            ..BotConfig::default()
        };
        let matcher = build_matcher(client, config);

        matcher.parse_trade(&donation(1)).await;

        assert!(matcher.handled_offers.contains(1));

        matcher.on_disconnected();

        assert!(!matcher.handled_offers.contains(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn bursts_coalesce_into_one_queued_pass() {
        let fetch_gate = Arc::new(Semaphore::new(0));
        let client = Arc::new(MockClient {
            fetch_gate: Some(Arc::clone(&fetch_gate)),
            ..MockClient::new()
        });
        let matcher = Arc::new(build_matcher(Arc::clone(&client), BotConfig::default()));

        // the first pass starts and parks inside the fetch, past the point where a newly
        // arriving call has to queue its own pass
        let first = tokio::spawn({
            let matcher = Arc::clone(&matcher);

            async move { matcher.on_new_trade().await }
        });

        while client.fetch_count.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        // a burst of wake-ups while the pass is running
        let burst = (0..5)
            .map(|_| {
                tokio::spawn({
                    let matcher = Arc::clone(&matcher);

                    async move { matcher.on_new_trade().await }
                })
            })
            .collect::<Vec<_>>();

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        // let the in-flight pass and exactly one queued pass run
        fetch_gate.add_permits(5);

        first.await.unwrap();

        for handle in burst {
            handle.await.unwrap();
        }

        assert_eq!(client.fetch_count.load(Ordering::SeqCst), 2);
    }
}
