use num_enum::{TryFromPrimitive, IntoPrimitive};
use serde_repr::{Serialize_repr, Deserialize_repr};
use strum_macros::{Display, EnumString};

/// The type of a Steam Community item, as exposed by the `item_class` tag on its description.
#[derive(Serialize_repr, Deserialize_repr, Display, EnumString, Debug, Hash, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Clone, Copy)]
#[repr(u8)]
pub enum AssetType {
    Unknown = 0,
    BoosterPack = 1,
    Emoticon = 2,
    FoilTradingCard = 3,
    ProfileBackground = 4,
    TradingCard = 5,
    SteamGems = 6,
    SaleItem = 7,
    Consumable = 8,
    ProfileModifier = 9,
    Sticker = 10,
    ChatEffect = 11,
    MiniProfileBackground = 12,
    AvatarProfileFrame = 13,
    AnimatedAvatar = 14,
    KeyboardSkin = 15,
    StartupVideo = 16,
}

impl AssetType {
    /// Whether this is a trading card, foil or otherwise.
    pub fn is_trading_card(&self) -> bool {
        matches!(self, Self::TradingCard | Self::FoilTradingCard)
    }
}
