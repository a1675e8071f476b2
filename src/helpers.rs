use std::sync::Arc;
use std::time::Duration;
use crate::error::Error;
use lazy_regex::regex_captures;
use reqwest::cookie::Jar;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde::de::DeserializeOwned;

/// Hostname for Steam Community requests.
pub const COMMUNITY_HOSTNAME: &str = "steamcommunity.com";
/// Hostname for Steam Web API requests.
pub const WEB_API_HOSTNAME: &str = "api.steampowered.com";

pub const USER_AGENT_STRING: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/118.0";

/// Builds the HTTP client requests are made with. Transient failures retry with backoff, and
/// every request shares the given cookie jar.
pub fn build_client(cookies: Arc<Jar>, user_agent: &'static str) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(500), Duration::from_secs(8))
        .build_with_max_retries(2);
    let client = reqwest::ClientBuilder::new()
        .cookie_provider(cookies)
        .user_agent(user_agent)
        .timeout(Duration::from_secs(90))
        .build()
        .expect("Failed to build HTTP client");

    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build()
}

/// Generates a random sessionid of the 24-hex-character shape Steam's login flow assigns.
pub fn generate_sessionid() -> String {
    let upper: u64 = rand::random();
    let lower: u32 = rand::random();

    format!("{upper:016x}{lower:08x}")
}

/// Extracts the sessionid value from a set of cookie strings, if present.
pub fn get_sessionid_from_cookies(cookies: &[String]) -> Option<String> {
    cookies
        .iter()
        .find_map(|cookie| {
            let (name, value) = cookie.split_once('=')?;

            if name.trim() != "sessionid" {
                return None;
            }

            let value = value.split(';').next()?.trim();

            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
}

/// Reads a response body, converting HTTP-level failures into errors. A request that ended up
/// on the login page after redirects means our session is gone.
pub async fn read_body(response: reqwest::Response) -> Result<bytes::Bytes, Error> {
    if response.url().path().starts_with("/login") {
        return Err(Error::NotLoggedIn);
    }

    let status = response.status();

    if !status.is_success() {
        return Err(Error::StatusCode(status));
    }

    Ok(response.bytes().await?)
}

/// Deserializes a JSON response body. Steam reports many failures as HTML documents under a
/// 200 status, so bodies are classified before parsing rather than after a failed parse.
pub async fn parse_json_body<D>(response: reqwest::Response) -> Result<D, Error>
where
    D: DeserializeOwned,
{
    let body = read_body(response).await?;

    if let Some(error) = classify_html_body(&body) {
        return Err(error);
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Picks apart the HTML documents Steam serves in place of JSON. Returns `None` when the body
/// does not look like an HTML document at all.
fn classify_html_body(body: &[u8]) -> Option<Error> {
    let text = std::str::from_utf8(body).ok()?;

    if !text.trim_start().starts_with('<') {
        return None;
    }

    if text.contains("g_steamID = false;") {
        return Some(Error::NotLoggedIn);
    }

    // Trade actions report their EResult in an error_msg block.
    if let Some((_, message)) = regex_captures!(r#"<div id="error_msg">\s*([^<]+)\s*</div>"#, text) {
        return Some(Error::TradeOffer(message.trim().into()));
    }

    if text.contains("<h1>Sorry!</h1>") {
        let message = regex_captures!("<h3>(.+)</h3>", text)
            .map(|(_, message)| message.trim().to_string())
            .unwrap_or_else(|| String::from("Unexpected error"));

        return Some(Error::UnexpectedResponse(message));
    }

    Some(Error::MalformedResponse("HTML response where JSON was expected"))
}
