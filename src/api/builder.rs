use super::{SteamTradeOfferAPI, DEFAULT_GET_INVENTORY_PAGE_SIZE};
use crate::helpers::{build_client, USER_AGENT_STRING};
use crate::mobile_api::MobileAPI;
use std::sync::{Arc, RwLock};
use reqwest::cookie::Jar;
use steamid_ng::SteamID;

/// Builder for constructing a [`SteamTradeOfferAPI`].
#[derive(Debug, Clone)]
pub struct SteamTradeOfferAPIBuilder {
    /// The [`SteamID`] of the account.
    pub(crate) steamid: SteamID,
    /// Your account's API key from <https://steamcommunity.com/dev/apikey>. Required for
    /// listing trade offers.
    pub(crate) api_key: Option<String>,
    /// The identity secret for the account. Required for mobile confirmations.
    pub(crate) identity_secret: Option<String>,
    /// The partner completed sets are sent to.
    pub(crate) loot_partner: Option<SteamID>,
    /// The trade token of the loot partner, for when we are not friends with them.
    pub(crate) loot_token: Option<String>,
    /// How many seconds this machine is behind the Steam servers. Used in mobile
    /// confirmations.
    pub(crate) time_offset: i64,
    /// The number of items to fetch per page when getting inventories.
    pub(crate) get_inventory_page_size: u32,
}

impl SteamTradeOfferAPIBuilder {
    /// Creates a new [`SteamTradeOfferAPIBuilder`].
    pub fn new(steamid: SteamID) -> Self {
        Self {
            steamid,
            api_key: None,
            identity_secret: None,
            loot_partner: None,
            loot_token: None,
            time_offset: 0,
            get_inventory_page_size: DEFAULT_GET_INVENTORY_PAGE_SIZE,
        }
    }

    /// The API key. Required for listing trade offers; responding to offers only needs
    /// cookies.
    pub fn api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// The identity secret for the account. Required for mobile confirmations.
    pub fn identity_secret(mut self, identity_secret: String) -> Self {
        self.identity_secret = Some(identity_secret);
        self
    }

    /// Where to send completed sets, with an optional trade token.
    pub fn loot_partner(mut self, partner: SteamID, token: Option<String>) -> Self {
        self.loot_partner = Some(partner);
        self.loot_token = token;
        self
    }

    /// How many seconds this machine is behind the Steam servers.
    pub fn time_offset(mut self, time_offset: i64) -> Self {
        self.time_offset = time_offset;
        self
    }

    /// The number of items to fetch per page when getting inventories. Defaults to 2000.
    pub fn get_inventory_page_size(mut self, page_size: u32) -> Self {
        self.get_inventory_page_size = page_size;
        self
    }

    /// Builds the [`SteamTradeOfferAPI`].
    pub fn build(self) -> SteamTradeOfferAPI {
        let cookies = Arc::new(Jar::default());

        SteamTradeOfferAPI {
            api_key: self.api_key,
            steamid: self.steamid,
            client: build_client(Arc::clone(&cookies), USER_AGENT_STRING),
            mobile_api: MobileAPI::new(
                Arc::clone(&cookies),
                self.steamid,
                self.identity_secret,
                self.time_offset,
            ),
            cookies,
            sessionid: Arc::new(RwLock::new(None)),
            loot_partner: self.loot_partner,
            loot_token: self.loot_token,
            get_inventory_page_size: self.get_inventory_page_size,
        }
    }
}
