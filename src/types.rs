//! Contains types for common values in Steam responses.

use crate::enums::{AssetRarity, AssetType};

pub type AppId = u32;
pub type ContextId = u64;
pub type AssetId = u64;
pub type Amount = u32;
pub type ClassId = u64;
pub type InstanceId = Option<u64>;
pub type TradeOfferId = u64;

/// The key items are grouped under when counting sets. Two items count towards the same set
/// when their real app ID, type and rarity all agree.
pub type SetKey = (AppId, AssetType, AssetRarity);
