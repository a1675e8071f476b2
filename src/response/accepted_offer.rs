use crate::serialize::option_str_to_number;
use serde::Deserialize;

/// The response after accepting a trade offer.
#[derive(Deserialize, Debug, Clone)]
pub struct AcceptedOffer {
    /// The ID of the resulting trade, if the trade went through immediately.
    #[serde(default)]
    #[serde(deserialize_with = "option_str_to_number")]
    pub tradeid: Option<u64>,
    /// Whether the acceptance still needs to be confirmed through the mobile authenticator.
    #[serde(default)]
    pub needs_mobile_confirmation: bool,
    /// Whether the acceptance still needs to be confirmed through email.
    #[serde(default)]
    pub needs_email_confirmation: bool,
    /// The domain of the email address for email confirmations.
    #[serde(default)]
    pub email_domain: Option<String>,
}
