use num_enum::{TryFromPrimitive, IntoPrimitive};
use serde_repr::{Serialize_repr, Deserialize_repr};
use strum_macros::{Display, EnumString};

/// The type of a mobile confirmation.
#[derive(Serialize_repr, Deserialize_repr, Display, EnumString, Debug, Hash, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Clone, Copy)]
#[repr(u8)]
pub enum ConfirmationType {
    Generic = 1,
    Trade = 2,
    MarketListing = 3,
    AccountRecovery = 6,
    #[serde(other)]
    Unknown = 0,
}
