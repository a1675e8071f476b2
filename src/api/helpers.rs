use super::response::{RawAsset, RawDescription, RawTag};
use crate::enums::{AssetRarity, AssetType};
use crate::response::Asset;
use crate::types::AppId;
use lazy_regex::regex_captures;

fn tag_value<'a>(tags: &'a [RawTag], category: &str) -> Option<&'a str> {
    tags
        .iter()
        .find(|tag| tag.category == category)
        .map(|tag| tag.internal_name.as_str())
}

/// The app the item belongs to, from the `Game` tag. Falls back to the owning app.
fn real_appid_from_tags(tags: &[RawTag], appid: AppId) -> AppId {
    tag_value(tags, "Game")
        .and_then(|internal_name| internal_name.strip_prefix("app_"))
        .and_then(|appid| appid.parse().ok())
        .unwrap_or(appid)
}

/// The type of the item, from its `item_class` tag. Trading cards with a foil `cardborder`
/// count as their own type.
fn type_from_tags(tags: &[RawTag]) -> AssetType {
    let item_type = match tag_value(tags, "item_class") {
        Some("item_class_2") => AssetType::TradingCard,
        Some("item_class_3") => AssetType::ProfileBackground,
        Some("item_class_4") => AssetType::Emoticon,
        Some("item_class_5") => AssetType::BoosterPack,
        Some("item_class_6") => AssetType::Consumable,
        Some("item_class_7") => AssetType::SteamGems,
        Some("item_class_8") => AssetType::ProfileModifier,
        Some("item_class_10") => AssetType::SaleItem,
        Some("item_class_11") => AssetType::Sticker,
        Some("item_class_12") => AssetType::ChatEffect,
        Some("item_class_13") => AssetType::MiniProfileBackground,
        Some("item_class_14") => AssetType::AvatarProfileFrame,
        Some("item_class_15") => AssetType::AnimatedAvatar,
        Some("item_class_16") => AssetType::KeyboardSkin,
        Some("item_class_17") => AssetType::StartupVideo,
        _ => AssetType::Unknown,
    };

    if item_type == AssetType::TradingCard && tag_value(tags, "cardborder") == Some("cardborder_1") {
        return AssetType::FoilTradingCard;
    }

    item_type
}

/// The rarity of the item, from its `droprate` tag.
fn rarity_from_tags(tags: &[RawTag]) -> AssetRarity {
    match tag_value(tags, "droprate") {
        Some("droprate_0") => AssetRarity::Common,
        Some("droprate_1") => AssetRarity::Uncommon,
        Some("droprate_2") => AssetRarity::Rare,
        _ => AssetRarity::Unknown,
    }
}

/// Combines a raw asset with its description into an [`Asset`].
pub fn asset_from_raw(raw: &RawAsset, description: &RawDescription) -> Asset {
    Asset {
        appid: raw.appid,
        contextid: raw.contextid,
        assetid: raw.assetid,
        classid: raw.classid,
        instanceid: raw.instanceid,
        amount: raw.amount,
        real_appid: real_appid_from_tags(&description.tags, raw.appid),
        r#type: type_from_tags(&description.tags),
        rarity: rarity_from_tags(&description.tags),
        tradable: description.tradable,
        marketable: description.marketable,
    }
}

/// Parses the partner's trade hold in days out of a trade offer page.
pub fn parse_trade_hold_days(body: &str) -> Option<u8> {
    regex_captures!(r#"var g_daysTheirEscrow = (\d+);"#, body)
        .and_then(|(_, days)| days.parse().ok())
}
