//! The decision core for evaluating trades against badge set progress.
//!
//! Items are grouped under a [`SetKey`] of their real app ID, type and rarity. Holding one
//! complete set for a key means holding at least one item of every class under that key, so
//! the number of complete sets is the smallest per-class amount.

mod fairness;
mod progress;

pub use fairness::is_fair_exchange;
pub use progress::is_trade_neutral_or_better;

use crate::error::ParameterError;
use crate::response::Asset;
use crate::types::{Amount, ClassId, SetKey};
use std::collections::HashMap;

/// Per-class amounts held, grouped by set.
pub type InventoryState = HashMap<SetKey, HashMap<ClassId, Amount>>;
/// Amounts held per set, sorted in ascending order. The first entry is the number of complete
/// sets, the length is the number of unique classes held.
pub type InventorySets = HashMap<SetKey, Vec<Amount>>;

/// Groups an inventory into per-class amounts per set.
pub fn group_inventory_state(inventory: &[Asset]) -> Result<InventoryState, ParameterError> {
    if inventory.is_empty() {
        return Err(ParameterError::EmptyItems);
    }

    let mut state = InventoryState::new();

    for item in inventory {
        *state
            .entry(item.set_key())
            .or_default()
            .entry(item.classid)
            .or_default() += item.amount;
    }

    Ok(state)
}

/// Groups an inventory into ascending-sorted per-class amounts per set.
///
/// The sort order is what the progress checks rely on; index-aligned comparisons of two
/// groupings are only meaningful when both are sorted this way.
pub fn group_inventory_sets(inventory: &[Asset]) -> Result<InventorySets, ParameterError> {
    let state = group_inventory_state(inventory)?;
    let sets = state
        .into_iter()
        .map(|(set_key, classes)| {
            let mut amounts = classes
                .into_values()
                .collect::<Vec<_>>();

            amounts.sort_unstable();

            (set_key, amounts)
        })
        .collect();

    Ok(sets)
}

/// Groups an inventory into two states in one pass. The first includes every item, the second
/// only items eligible for trading.
pub fn group_divided_inventory_state(
    inventory: &[Asset],
) -> Result<(InventoryState, InventoryState), ParameterError> {
    if inventory.is_empty() {
        return Err(ParameterError::EmptyItems);
    }

    let mut full_state = InventoryState::new();
    let mut tradable_state = InventoryState::new();

    for item in inventory {
        *full_state
            .entry(item.set_key())
            .or_default()
            .entry(item.classid)
            .or_default() += item.amount;

        if item.tradable {
            *tradable_state
                .entry(item.set_key())
                .or_default()
                .entry(item.classid)
                .or_default() += item.amount;
        }
    }

    Ok((full_state, tradable_state))
}

/// Groups the tradable part of an inventory into per-class amounts per set.
pub fn select_tradable(inventory: &[Asset]) -> Result<InventoryState, ParameterError> {
    if inventory.is_empty() {
        return Err(ParameterError::EmptyItems);
    }

    let mut state = InventoryState::new();

    for item in inventory.iter().filter(|item| item.tradable) {
        *state
            .entry(item.set_key())
            .or_default()
            .entry(item.classid)
            .or_default() += item.amount;
    }

    Ok(state)
}

/// Takes tradable items out of an inventory to satisfy a per-class demand.
///
/// For every tradable item whose class is in demand, a copy clamped to the remaining demand is
/// recorded and the demand is decremented, with exhausted entries removed. Entries left in
/// `demand` afterwards could not be satisfied.
pub fn extract_tradable_matching(
    inventory: &[Asset],
    demand: &mut HashMap<ClassId, Amount>,
) -> Result<Vec<Asset>, ParameterError> {
    if inventory.is_empty() || demand.is_empty() {
        return Err(ParameterError::EmptyItems);
    }

    let mut result = Vec::new();

    for item in inventory.iter().filter(|item| item.tradable) {
        let Some(&amount_wanted) = demand.get(&item.classid) else {
            continue;
        };
        let amount_to_take = item.amount.min(amount_wanted);
        let mut item_to_take = item.clone();

        item_to_take.amount = amount_to_take;
        result.push(item_to_take);

        if amount_wanted > amount_to_take {
            demand.insert(item.classid, amount_wanted - amount_to_take);
        } else {
            demand.remove(&item.classid);
        }
    }

    Ok(result)
}
