//! The client backing the matcher with the Steam Web API. More direct control over API calls
//! is contained within this module.

pub mod response;

mod builder;
mod helpers;

pub use builder::SteamTradeOfferAPIBuilder;

use response::{GetInventoryResponse, GetTradeOffersResponse, RawAsset, RawDescription, RawTradeOffer, SentOffer};

use crate::client::TradingClient;
use crate::enums::{AssetType, TradeOfferState};
use crate::error::{Error, ParameterError};
use crate::helpers::{
    generate_sessionid, get_sessionid_from_cookies, parse_json_body, read_body,
    COMMUNITY_HOSTNAME, WEB_API_HOSTNAME,
};
use crate::matcher::{MAX_ITEMS_PER_TRADE, STEAM_COMMUNITY_APPID};
use crate::mobile_api::MobileAPI;
use crate::response::{AcceptedOffer, Asset, TradeOffer};
use crate::serialize;
use crate::types::{ClassId, ContextId, InstanceId, TradeOfferId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::REFERER;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use steamid_ng::SteamID;
use url::Url;

/// The context Steam Community items live under.
const COMMUNITY_CONTEXTID: ContextId = 6;
pub(crate) const DEFAULT_GET_INVENTORY_PAGE_SIZE: u32 = 2000;

/// The API for interacting with Steam trade offers. This is the [`TradingClient`] used in
/// production; the matcher itself only sees the trait.
#[derive(Debug, Clone)]
pub struct SteamTradeOfferAPI {
    /// The API key.
    pub api_key: Option<String>,
    /// The [`SteamID`] of the account.
    pub steamid: SteamID,
    /// The client for making requests.
    pub(crate) client: ClientWithMiddleware,
    /// The cookies to make requests with. Since the requests are made with the provided
    /// client, the cookies should be the same as what the client uses.
    pub(crate) cookies: Arc<Jar>,
    /// The session ID.
    pub(crate) sessionid: Arc<RwLock<Option<String>>>,
    /// The mobile interface for confirming accepted offers.
    pub(crate) mobile_api: MobileAPI,
    /// Where completed sets are sent.
    pub(crate) loot_partner: Option<SteamID>,
    /// The trade token of the loot partner.
    pub(crate) loot_token: Option<String>,
    pub(crate) get_inventory_page_size: u32,
}

impl SteamTradeOfferAPI {
    /// Builder for constructing a [`SteamTradeOfferAPI`].
    pub fn builder(steamid: SteamID) -> SteamTradeOfferAPIBuilder {
        SteamTradeOfferAPIBuilder::new(steamid)
    }

    fn get_url(pathname: &str) -> String {
        format!("https://{COMMUNITY_HOSTNAME}{pathname}")
    }

    fn get_api_url(interface: &str, method: &str, version: usize) -> String {
        format!("https://{WEB_API_HOSTNAME}/{interface}/{method}/v{version}")
    }

    /// Sets cookies.
    ///
    /// Responding to trade offers only works if cookies are set. Make sure your cookies are
    /// set before calling these methods.
    pub fn set_cookies(&self, cookies: &[String]) {
        let mut cookies = cookies.to_owned();
        let sessionid = if let Some(sessionid) = get_sessionid_from_cookies(&cookies) {
            sessionid
        } else {
            // the cookies don't contain a sessionid
            let sessionid = generate_sessionid();

            cookies.push(format!("sessionid={sessionid}"));
            sessionid
        };
        let url = format!("https://{COMMUNITY_HOSTNAME}").parse::<Url>()
            .unwrap_or_else(|error| panic!("URL could not be parsed from {COMMUNITY_HOSTNAME}: {error}"));

        *self.sessionid.write().unwrap() = Some(sessionid);

        for cookie_str in &cookies {
            self.cookies.add_cookie_str(cookie_str, &url);
        }
    }

    /// Gets our incoming trade offers along with the descriptions of their items. Offers with
    /// incomplete descriptions are skipped.
    pub async fn get_trade_offers(&self) -> Result<Vec<TradeOffer>, Error> {
        #[derive(Serialize)]
        struct Form<'a> {
            key: &'a str,
            language: &'static str,
            active_only: bool,
            get_sent_offers: bool,
            get_received_offers: bool,
            get_descriptions: bool,
            cursor: Option<u32>,
        }

        let key = self.api_key.as_deref()
            .ok_or(ParameterError::MissingApiKey)?;
        let uri = Self::get_api_url("IEconService", "GetTradeOffers", 1);
        let mut cursor = None;
        let mut raw_offers: Vec<RawTradeOffer> = Vec::new();
        let mut descriptions: HashMap<(ClassId, InstanceId), RawDescription> = HashMap::new();

        loop {
            let response = self.client.get(&uri)
                .query(&Form {
                    key,
                    language: "english",
                    active_only: true,
                    get_sent_offers: false,
                    get_received_offers: true,
                    get_descriptions: true,
                    cursor,
                })
                .send()
                .await?;
            let body: GetTradeOffersResponse = parse_json_body(response).await?;
            let mut response = body.response;

            for description in response.descriptions {
                descriptions.insert(description.class(), description);
            }

            raw_offers.append(&mut response.trade_offers_received);

            if response.next_cursor > Some(0) {
                cursor = response.next_cursor;
            } else {
                break;
            }
        }

        let offers = raw_offers
            .into_iter()
            .filter(|offer| !offer.is_our_offer)
            .filter_map(|offer| self.combine_offer(offer, &descriptions))
            .collect();

        Ok(offers)
    }

    fn combine_offer(
        &self,
        raw: RawTradeOffer,
        descriptions: &HashMap<(ClassId, InstanceId), RawDescription>,
    ) -> Option<TradeOffer> {
        fn collect_items(
            assets: &[RawAsset],
            descriptions: &HashMap<(ClassId, InstanceId), RawDescription>,
        ) -> Option<Vec<Asset>> {
            assets
                .iter()
                .map(|raw| {
                    descriptions
                        .get(&(raw.classid, raw.instanceid))
                        .map(|description| helpers::asset_from_raw(raw, description))
                })
                .collect()
        }

        fn steamid_from_accountid(accountid: u32) -> SteamID {
            if accountid == 0 {
                // an offer from the Steam system itself
                return SteamID::from(0);
            }

            SteamID::new(
                accountid,
                steamid_ng::Instance::Desktop,
                steamid_ng::AccountType::Individual,
                steamid_ng::Universe::Public,
            )
        }

        let Some(items_to_give) = collect_items(&raw.items_to_give, descriptions) else {
            // Attempts to load the missing descriptions will continue on the next fetch, but
            // they must not fail the whole pass.
            log::debug!("Offer {} is missing descriptions for its items", raw.tradeofferid);

            return None;
        };
        let Some(items_to_receive) = collect_items(&raw.items_to_receive, descriptions) else {
            log::debug!("Offer {} is missing descriptions for its items", raw.tradeofferid);

            return None;
        };

        Some(TradeOffer {
            tradeofferid: raw.tradeofferid,
            partner: steamid_from_accountid(raw.accountid_other),
            message: raw.message,
            items_to_give,
            items_to_receive,
            is_our_offer: raw.is_our_offer,
            expiration_time: raw.expiration_time,
            time_created: raw.time_created,
            time_updated: raw.time_updated,
            trade_offer_state: raw.trade_offer_state,
            escrow_end_date: raw.escrow_end_date.unwrap_or_default(),
        })
    }

    /// Accepts an offer.
    pub async fn accept_offer(
        &self,
        tradeofferid: TradeOfferId,
        partner: SteamID,
    ) -> Result<AcceptedOffer, Error> {
        #[derive(Serialize)]
        struct AcceptOfferParams {
            sessionid: String,
            serverid: u32,
            #[serde(with = "serialize::string")]
            tradeofferid: TradeOfferId,
            captcha: &'static str,
            #[serde(serialize_with = "serialize::steamid_as_string")]
            partner: SteamID,
        }

        let sessionid = self.sessionid.read().unwrap().clone()
            .ok_or(Error::NotLoggedIn)?;
        let referer = Self::get_url(&format!("/tradeoffer/{tradeofferid}"));
        let uri = Self::get_url(&format!("/tradeoffer/{tradeofferid}/accept"));
        let response = self.client.post(&uri)
            .header(REFERER, referer)
            .form(&AcceptOfferParams {
                sessionid,
                tradeofferid,
                partner,
                serverid: 1,
                captcha: "",
            })
            .send()
            .await?;
        let body: AcceptedOffer = parse_json_body(response).await?;

        Ok(body)
    }

    /// Declines an offer.
    pub async fn decline_offer(&self, tradeofferid: TradeOfferId) -> Result<(), Error> {
        #[derive(Serialize)]
        struct DeclineOfferParams {
            sessionid: String,
        }

        let sessionid = self.sessionid.read().unwrap().clone()
            .ok_or(Error::NotLoggedIn)?;
        let referer = Self::get_url(&format!("/tradeoffer/{tradeofferid}"));
        let uri = Self::get_url(&format!("/tradeoffer/{tradeofferid}/decline"));
        let response = self.client.post(&uri)
            .header(REFERER, referer)
            .form(&DeclineOfferParams {
                sessionid,
            })
            .send()
            .await?;

        read_body(response).await?;

        Ok(())
    }

    /// Gets a user's Steam Community inventory, including item descriptions. Items with a
    /// missing description are skipped.
    pub async fn get_inventory(&self, steamid: SteamID) -> Result<Vec<Asset>, Error> {
        #[derive(Serialize)]
        struct Query {
            l: &'static str,
            count: u32,
            start_assetid: Option<u64>,
        }

        let sid = u64::from(steamid);
        let uri = format!("https://{COMMUNITY_HOSTNAME}/inventory/{sid}/{STEAM_COMMUNITY_APPID}/{COMMUNITY_CONTEXTID}");
        let referer = format!("https://{COMMUNITY_HOSTNAME}/profiles/{sid}/inventory");
        let mut responses: Vec<GetInventoryResponse> = Vec::new();
        let mut start_assetid: Option<u64> = None;

        loop {
            let response = self.client.get(&uri)
                .header(REFERER, &referer)
                .query(&Query {
                    l: "english",
                    count: self.get_inventory_page_size,
                    start_assetid,
                })
                .send()
                .await?;
            let body: GetInventoryResponse = parse_json_body(response).await?;

            if !body.success {
                return Err(Error::ResponseUnsuccessful);
            } else if body.more_items {
                // shouldn't occur, but we wouldn't want to call this endlessly if it does...
                if body.last_assetid == start_assetid {
                    return Err(Error::MalformedResponse("Pagination cursor is the same as the previous response."));
                }

                start_assetid = body.last_assetid;
                responses.push(body);
            } else {
                responses.push(body);
                break;
            }
        }

        let mut inventory = Vec::new();

        for body in responses {
            let descriptions = body.descriptions
                .iter()
                .map(|description| (description.class(), description))
                .collect::<HashMap<_, _>>();

            for raw in &body.assets {
                if let Some(&description) = descriptions.get(&(raw.classid, raw.instanceid)) {
                    inventory.push(helpers::asset_from_raw(raw, description));
                } else {
                    log::debug!("Missing description for item {}:{}", raw.classid, raw.assetid);
                }
            }
        }

        Ok(inventory)
    }

    /// Gets the trade hold in days our partner's items in this offer would be under.
    pub async fn get_trade_hold_duration(
        &self,
        tradeofferid: TradeOfferId,
    ) -> Result<Option<u8>, Error> {
        let uri = Self::get_url(&format!("/tradeoffer/{tradeofferid}"));
        let response = self.client.get(&uri)
            .send()
            .await?;
        let body = read_body(response).await?;
        let body = String::from_utf8_lossy(&body);

        Ok(helpers::parse_trade_hold_days(&body))
    }

    /// Sends an offer giving `items_to_give` to the loot partner, asking for nothing back.
    async fn send_loot_offer(
        &self,
        partner: SteamID,
        items_to_give: &[Asset],
    ) -> Result<SentOffer, Error> {
        #[derive(Serialize)]
        struct OfferItem {
            appid: u32,
            #[serde(with = "serialize::string")]
            contextid: ContextId,
            #[serde(with = "serialize::string")]
            assetid: u64,
            #[serde(with = "serialize::string")]
            amount: u32,
        }

        #[derive(Serialize)]
        struct OfferFormUser {
            assets: Vec<OfferItem>,
            currency: Vec<String>,
            ready: bool,
        }

        #[derive(Serialize)]
        struct OfferForm {
            newversion: bool,
            version: u32,
            me: OfferFormUser,
            them: OfferFormUser,
        }

        #[derive(Serialize)]
        struct TradeOfferCreateParams<'b> {
            #[serde(skip_serializing_if = "Option::is_none")]
            trade_offer_access_token: Option<&'b str>,
        }

        #[derive(Serialize)]
        struct SendOfferParams {
            sessionid: String,
            serverid: u32,
            json_tradeoffer: String,
            tradeoffermessage: &'static str,
            captcha: &'static str,
            trade_offer_create_params: String,
            #[serde(serialize_with = "serialize::steamid_as_string")]
            partner: SteamID,
        }

        #[derive(Serialize)]
        struct RefererParams<'b> {
            partner: u32,
            token: &'b Option<String>,
        }

        if items_to_give.is_empty() {
            return Err(ParameterError::EmptyOffer.into());
        }

        let sessionid = self.sessionid.read().unwrap().clone()
            .ok_or(Error::NotLoggedIn)?;
        let referer = {
            let qs_params = serde_qs::to_string(&RefererParams {
                partner: partner.account_id(),
                token: &self.loot_token,
            }).map_err(ParameterError::SerdeQS)?;

            Self::get_url(&format!("/tradeoffer/new?{qs_params}"))
        };
        let json_tradeoffer = serde_json::to_string(&OfferForm {
            newversion: true,
            // this is hopefully safe enough
            version: items_to_give.len() as u32 + 1,
            me: OfferFormUser {
                assets: items_to_give
                    .iter()
                    .map(|item| OfferItem {
                        appid: item.appid,
                        contextid: item.contextid,
                        assetid: item.assetid,
                        amount: item.amount,
                    })
                    .collect(),
                currency: Vec::new(),
                ready: false,
            },
            them: OfferFormUser {
                assets: Vec::new(),
                currency: Vec::new(),
                ready: false,
            },
        })?;
        let trade_offer_create_params = serde_json::to_string(&TradeOfferCreateParams {
            trade_offer_access_token: self.loot_token.as_deref(),
        })?;
        let uri = Self::get_url("/tradeoffer/new/send");
        let response = self.client.post(&uri)
            .header(REFERER, referer)
            .form(&SendOfferParams {
                sessionid,
                serverid: 1,
                json_tradeoffer,
                tradeoffermessage: "",
                captcha: "",
                trade_offer_create_params,
                partner,
            })
            .send()
            .await?;
        let body: SentOffer = parse_json_body(response).await?;

        Ok(body)
    }
}

#[async_trait]
impl TradingClient for SteamTradeOfferAPI {
    async fn get_active_trade_offers(&self) -> Result<Vec<TradeOffer>, Error> {
        let offers = self.get_trade_offers().await?
            .into_iter()
            .filter(|offer| offer.trade_offer_state == TradeOfferState::Active)
            .collect();

        Ok(offers)
    }

    async fn accept_trade_offer(
        &self,
        tradeofferid: TradeOfferId,
        partner: SteamID,
    ) -> Result<AcceptedOffer, Error> {
        self.accept_offer(tradeofferid, partner).await
    }

    async fn decline_trade_offer(&self, tradeofferid: TradeOfferId) -> Result<(), Error> {
        self.decline_offer(tradeofferid).await
    }

    async fn get_inventory(&self, steamid: SteamID) -> Result<Vec<Asset>, Error> {
        self.get_inventory(steamid).await
    }

    async fn get_trade_hold_duration(
        &self,
        _partner: SteamID,
        tradeofferid: TradeOfferId,
    ) -> Result<Option<u8>, Error> {
        self.get_trade_hold_duration(tradeofferid).await
    }

    fn has_mobile_authenticator(&self) -> bool {
        self.mobile_api.has_authenticator()
    }

    async fn accept_trade_confirmations(
        &self,
        tradeofferids: &[TradeOfferId],
        wait_if_necessary: bool,
    ) -> Result<(), Error> {
        self.mobile_api.accept_trade_confirmations(tradeofferids, wait_if_necessary).await
    }

    async fn send_inventory(&self, types: &HashSet<AssetType>) -> Result<(), Error> {
        let loot_partner = self.loot_partner
            .ok_or(ParameterError::NoLootPartner)?;
        let inventory = self.get_inventory(self.steamid).await?;
        let items = inventory
            .into_iter()
            .filter(|item| item.tradable && types.contains(&item.r#type))
            .collect::<Vec<_>>();

        if items.is_empty() {
            log::debug!("Nothing to send onwards");

            return Ok(());
        }

        for chunk in items.chunks(MAX_ITEMS_PER_TRADE) {
            let sent_offer = self.send_loot_offer(loot_partner, chunk).await?;

            log::info!(
                "Sent {} item(s) onwards to {} in offer {}",
                chunk.len(),
                u64::from(loot_partner),
                sent_offer.tradeofferid,
            );

            if sent_offer.needs_mobile_confirmation && self.mobile_api.has_authenticator() {
                self.mobile_api.accept_trade_confirmations(&[sent_offer.tradeofferid], true).await?;
            }
        }

        Ok(())
    }
}
