//! Confirms trades through the Steam mobile interface.

mod confirmation;

pub use confirmation::Confirmation;

use crate::enums::ConfirmationType;
use crate::error::{Error, ParameterError};
use crate::helpers::{build_client, parse_json_body, COMMUNITY_HOSTNAME};
use crate::time;
use crate::types::TradeOfferId;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use lazy_regex::regex_replace_all;
use reqwest::cookie::Jar;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use sha1::{Digest, Sha1};
use steamid_ng::SteamID;
use url::Url;

const USER_AGENT_STRING: &str = "Mozilla/5.0 (Linux; U; Android 4.1.1; en-us; Google Nexus 4 - 4.1.1 - API 16 - 768x1280 Build/JRO03S) AppleWebKit/534.30 (KHTML, like Gecko) Version/4.0 Mobile Safari/534.30";

/// How long to wait before re-checking for confirmations that have not appeared yet.
const CONFIRMATION_RECHECK_DELAY: Duration = Duration::from_secs(15);
const CONFIRMATION_RECHECK_ATTEMPTS: u32 = 3;

fn generate_confirmation_hash_for_time(
    time: i64,
    tag: &str,
    identity_secret: &str,
) -> Result<String, ParameterError> {
    let decoded = base64::decode(identity_secret)
        .map_err(|_| ParameterError::InvalidIdentitySecret)?;
    let time_bytes = time.to_be_bytes();
    let data = [time_bytes.as_slice(), tag.as_bytes()].concat();
    let hash = hmacsha1::hmac_sha1(&decoded, &data);

    Ok(base64::encode(hash))
}

fn get_device_id(steamid: &SteamID) -> String {
    let mut hasher = Sha1::new();

    hasher.update(u64::from(*steamid).to_string().as_bytes());

    let hash = hasher.finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>();
    let device_id = regex_replace_all!(
        r#"^([0-9a-f]{8})([0-9a-f]{4})([0-9a-f]{4})([0-9a-f]{4})([0-9a-f]{12}).*$"#,
        &hash,
        |_, a, b, c, d, e| format!("{a}-{b}-{c}-{d}-{e}"),
    );

    format!("android:{device_id}")
}

/// The mobile interface used for confirming trades.
#[derive(Debug, Clone)]
pub struct MobileAPI {
    client: ClientWithMiddleware,
    /// The cookies to make requests with. These are shared with the API so a login applies to
    /// both.
    pub cookies: Arc<Jar>,
    /// The [`SteamID`] of the account.
    pub steamid: SteamID,
    /// The identity secret for the account. Without one, confirmations cannot be handled.
    pub identity_secret: Option<String>,
    /// How many seconds this machine is behind the Steam servers.
    pub time_offset: i64,
}

impl MobileAPI {
    pub fn new(
        cookies: Arc<Jar>,
        steamid: SteamID,
        identity_secret: Option<String>,
        time_offset: i64,
    ) -> Self {
        let url = format!("https://{COMMUNITY_HOSTNAME}").parse::<Url>()
            .unwrap_or_else(|error| panic!("URL could not be parsed from {COMMUNITY_HOSTNAME}: {error}"));

        cookies.add_cookie_str("mobileClientVersion=0 (2.1.3)", &url);
        cookies.add_cookie_str("mobileClient=android", &url);
        cookies.add_cookie_str("Steam_Language=english", &url);
        cookies.add_cookie_str(&format!("steamid={}", u64::from(steamid)), &url);

        Self {
            client: build_client(Arc::clone(&cookies), USER_AGENT_STRING),
            cookies,
            steamid,
            identity_secret,
            time_offset,
        }
    }

    /// Whether the account can handle confirmations.
    pub fn has_authenticator(&self) -> bool {
        self.identity_secret.is_some()
    }

    fn get_uri(&self, pathname: &str) -> String {
        format!("https://{COMMUNITY_HOSTNAME}{pathname}")
    }

    fn confirmation_query_params(&self, tag: &str) -> Result<Vec<(&'static str, String)>, Error> {
        let identity_secret = self.identity_secret.as_deref()
            .ok_or(ParameterError::NoIdentitySecret)?;
        let time = time::get_system_time() as i64 + self.time_offset;
        let key = generate_confirmation_hash_for_time(time, tag, identity_secret)?;

        Ok(vec![
            ("p", get_device_id(&self.steamid)),
            ("a", u64::from(self.steamid).to_string()),
            ("k", key),
            ("t", time.to_string()),
            ("m", "android".into()),
            ("tag", tag.into()),
        ])
    }

    /// Gets the confirmations awaiting a decision.
    pub async fn get_confirmations(&self) -> Result<Vec<Confirmation>, Error> {
        #[derive(Deserialize, Debug)]
        struct GetListResponse {
            success: bool,
            #[serde(default)]
            conf: Vec<Confirmation>,
            #[serde(default)]
            message: Option<String>,
        }

        let uri = self.get_uri("/mobileconf/getlist");
        let query = self.confirmation_query_params("conf")?;
        let response = self.client.get(&uri)
            .header("X-Requested-With", "com.valvesoftware.android.steam.community")
            .query(&query)
            .send()
            .await?;
        let body: GetListResponse = parse_json_body(response).await?;

        if !body.success {
            return Err(Error::ConfirmationUnsuccessful(body.message));
        }

        Ok(body.conf)
    }

    /// Accepts a batch of confirmations in one request.
    pub async fn accept_confirmations(&self, confirmations: &[Confirmation]) -> Result<(), Error> {
        #[derive(Deserialize, Debug)]
        struct SendConfirmationResponse {
            success: bool,
            #[serde(default)]
            message: Option<String>,
        }

        let uri = self.get_uri("/mobileconf/multiajaxop");
        let mut params = self.confirmation_query_params("conf")?
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect::<Vec<_>>();

        params.push(("op".into(), "allow".into()));

        for confirmation in confirmations {
            params.push(("cid[]".into(), confirmation.id.to_string()));
            params.push(("ck[]".into(), confirmation.nonce.to_string()));
        }

        let response = self.client.post(&uri)
            .header("X-Requested-With", "com.valvesoftware.android.steam.community")
            .form(&params)
            .send()
            .await?;
        let body: SendConfirmationResponse = parse_json_body(response).await?;

        if !body.success {
            return Err(Error::ConfirmationUnsuccessful(body.message));
        }

        Ok(())
    }

    /// Confirms the given accepted trade offers. When `wait_if_necessary` is set, waits for
    /// confirmations that have not shown up yet before giving up on them.
    pub async fn accept_trade_confirmations(
        &self,
        tradeofferids: &[TradeOfferId],
        wait_if_necessary: bool,
    ) -> Result<(), Error> {
        let wanted = tradeofferids
            .iter()
            .copied()
            .collect::<HashSet<_>>();
        let mut confirmations = Vec::new();

        for attempt in 0..CONFIRMATION_RECHECK_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(CONFIRMATION_RECHECK_DELAY).await;
            }

            confirmations = self.get_confirmations().await?
                .into_iter()
                .filter(|confirmation| {
                    confirmation.conf_type == ConfirmationType::Trade
                        && wanted.contains(&confirmation.creator_id)
                })
                .collect();

            if confirmations.len() >= wanted.len() || !wait_if_necessary {
                break;
            }

            log::debug!(
                "{} of {} confirmation(s) have appeared so far",
                confirmations.len(),
                wanted.len(),
            );
        }

        if confirmations.is_empty() {
            return Err(Error::ConfirmationUnsuccessful(Some(
                "No matching confirmations appeared".into(),
            )));
        }

        if confirmations.len() < wanted.len() {
            log::warn!(
                "Only {} of {} expected confirmation(s) appeared",
                confirmations.len(),
                wanted.len(),
            );
        }

        self.accept_confirmations(&confirmations).await
    }
}
