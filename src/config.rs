//! Per-account configuration.

use crate::enums::{AssetType, UserPermission};
use crate::error::FileError;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use serde::{Serialize, Deserialize};

/// Configuration determining how incoming trade offers are evaluated. Every field falls back
/// to its default when missing, so a config file only needs to state what it changes.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct BotConfig {
    /// Accept one-sided offers that only give us items, when they come from regular users.
    pub accept_donations: bool,
    /// Refuse one-sided offers coming from other bots of ours.
    pub dont_accept_bot_trades: bool,
    /// Evaluate two-sided offers for set progress and accept the ones that are fair and
    /// neutral or better.
    pub steam_trade_matcher: bool,
    /// Accept any fair two-sided offer without checking set progress.
    pub match_everything: bool,
    /// Decline offers that fail evaluation instead of leaving them untouched.
    pub reject_invalid_trades: bool,
    /// Send completed sets onwards once a pass received lootable items.
    pub send_on_farming_finished: bool,
    /// The item types offers are allowed to trade in.
    pub matchable_types: HashSet<AssetType>,
    /// The item types that trigger the follow-up send when received.
    pub lootable_types: HashSet<AssetType>,
    /// The longest trade hold we tolerate, in days.
    pub max_trade_hold_duration: u8,
    /// Permissions granted to other Steam users, keyed by their 64-bit IDs.
    pub steam_user_permissions: HashMap<u64, UserPermission>,
    /// Steam users whose offers are refused outright.
    pub trading_blacklist: HashSet<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            accept_donations: false,
            dont_accept_bot_trades: false,
            steam_trade_matcher: false,
            match_everything: false,
            reject_invalid_trades: false,
            send_on_farming_finished: false,
            matchable_types: HashSet::from([AssetType::TradingCard]),
            lootable_types: HashSet::from([
                AssetType::BoosterPack,
                AssetType::FoilTradingCard,
                AssetType::TradingCard,
            ]),
            max_trade_hold_duration: 15,
            steam_user_permissions: HashMap::new(),
            trading_blacklist: HashSet::new(),
        }
    }
}

impl BotConfig {
    /// Loads a config from a JSON file.
    pub async fn from_file<P>(filepath: P) -> Result<Self, FileError>
    where
        P: AsRef<Path>,
    {
        let contents = async_fs::read_to_string(filepath).await?;
        let config = serde_json::from_str(&contents)?;

        Ok(config)
    }

    /// The permission granted to the given user.
    pub fn permission_of(&self, steamid64: u64) -> UserPermission {
        self.steam_user_permissions
            .get(&steamid64)
            .copied()
            .unwrap_or_default()
    }
}
