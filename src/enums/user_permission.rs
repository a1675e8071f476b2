use num_enum::{TryFromPrimitive, IntoPrimitive};
use serde_repr::{Serialize_repr, Deserialize_repr};
use strum_macros::{Display, EnumString};

/// The level of control a Steam user has over this account.
#[derive(Serialize_repr, Deserialize_repr, Display, EnumString, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive, Clone, Copy)]
#[repr(u8)]
pub enum UserPermission {
    None = 0,
    FamilySharing = 1,
    Operator = 2,
    Master = 3,
}

impl Default for UserPermission {
    fn default() -> Self {
        Self::None
    }
}
