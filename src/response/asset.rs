use crate::enums::{AssetRarity, AssetType};
use crate::types::{Amount, AppId, AssetId, ClassId, ContextId, InstanceId, SetKey};
use serde::{Serialize, Deserialize};

/// An item in an inventory or a trade offer, including the description details needed to
/// evaluate it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Asset {
    /// The app ID the item lives under. Steam Community items all use `753`.
    pub appid: AppId,
    /// The context ID.
    pub contextid: ContextId,
    /// The unique asset ID. This value is unique to the item's `appid` and `contextid`.
    pub assetid: AssetId,
    /// The ID of the item's class. Items of the same class are interchangeable.
    pub classid: ClassId,
    /// The ID of the item's instance.
    pub instanceid: InstanceId,
    /// The amount. If this item is not stackable the amount will be `1`.
    pub amount: Amount,
    /// The app ID of the game the item belongs to, taken from the `Game` tag on its
    /// description. For non-community items this matches `appid`.
    pub real_appid: AppId,
    /// The type of the item, taken from the `item_class` tag on its description.
    pub r#type: AssetType,
    /// The rarity of the item, taken from the `droprate` tag on its description.
    pub rarity: AssetRarity,
    /// Whether the item is eligible for trading.
    pub tradable: bool,
    /// Whether the item is eligible for the Community Market.
    pub marketable: bool,
}

impl Asset {
    /// The key this item is grouped under when counting sets.
    pub fn set_key(&self) -> SetKey {
        (self.real_appid, self.r#type, self.rarity)
    }
}
