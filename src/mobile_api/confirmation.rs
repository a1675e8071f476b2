use crate::enums::ConfirmationType;
use crate::serialize;
use serde::Deserialize;

/// A mobile confirmation awaiting a decision.
#[derive(Deserialize, Debug, Clone)]
pub struct Confirmation {
    /// The ID of the confirmation.
    #[serde(with = "serialize::string")]
    pub id: u64,
    /// The key needed to act on the confirmation.
    #[serde(with = "serialize::string")]
    pub nonce: u64,
    /// What the confirmation is for.
    #[serde(rename = "type")]
    pub conf_type: ConfirmationType,
    /// The ID of whatever created the confirmation. For trades this is the trade offer ID.
    #[serde(with = "serialize::string")]
    pub creator_id: u64,
    /// The headline shown in the mobile app.
    #[serde(default)]
    pub headline: String,
}
