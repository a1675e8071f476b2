use super::{HandledOfferSet, TradeMatcher, TradeOfferHooks};
use crate::client::{BotRegistry, SingleBot, TradingClient};
use crate::config::BotConfig;
use std::sync::{Arc, Mutex};
use steamid_ng::SteamID;
use tokio::sync::Semaphore;

/// Builder for constructing a [`TradeMatcher`].
pub struct TradeMatcherBuilder {
    steamid: SteamID,
    client: Arc<dyn TradingClient>,
    config: BotConfig,
    registry: Option<Arc<dyn BotRegistry>>,
    hooks: Option<Arc<dyn TradeOfferHooks>>,
    trading_lock: Option<Arc<tokio::sync::Mutex<()>>>,
}

impl TradeMatcherBuilder {
    /// Creates a new [`TradeMatcherBuilder`] with a default config.
    pub fn new(steamid: SteamID, client: Arc<dyn TradingClient>) -> Self {
        Self {
            steamid,
            client,
            config: BotConfig::default(),
            registry: None,
            hooks: None,
            trading_lock: None,
        }
    }

    /// The config for evaluating offers.
    pub fn config(mut self, config: BotConfig) -> Self {
        self.config = config;
        self
    }

    /// The registry of other accounts under our control. Without one, every partner counts as
    /// a regular user.
    pub fn registry(mut self, registry: Arc<dyn BotRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Callbacks into the surrounding application.
    pub fn hooks(mut self, hooks: Arc<dyn TradeOfferHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// The lock guarding every operation that mutates this account's trading state. Supply the
    /// lock of the surrounding subsystem so parsing passes cannot overlap its actions.
    pub fn trading_lock(mut self, trading_lock: Arc<tokio::sync::Mutex<()>>) -> Self {
        self.trading_lock = Some(trading_lock);
        self
    }

    /// Builds the [`TradeMatcher`].
    pub fn build(self) -> TradeMatcher {
        TradeMatcher {
            steamid: self.steamid,
            config: self.config,
            client: self.client,
            registry: self.registry.unwrap_or_else(|| Arc::new(SingleBot)),
            hooks: self.hooks,
            trading_lock: self.trading_lock.unwrap_or_default(),
            handled_offers: HandledOfferSet::new(),
            parsing_scheduled: Mutex::new(false),
            trades_semaphore: Semaphore::new(1),
        }
    }
}
