use num_enum::{TryFromPrimitive, IntoPrimitive};
use serde_repr::{Serialize_repr, Deserialize_repr};
use strum_macros::{Display, EnumString};

/// The rarity tier of a Steam Community item, as exposed by the `droprate` tag on its
/// description.
#[derive(Serialize_repr, Deserialize_repr, Display, EnumString, Debug, Hash, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Clone, Copy)]
#[repr(u8)]
pub enum AssetRarity {
    Unknown = 0,
    Common = 1,
    Uncommon = 2,
    Rare = 3,
}
