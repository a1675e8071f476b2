use super::group_inventory_sets;
use crate::error::ParameterError;
use crate::response::Asset;
use std::cmp::Ordering;

/// Whether applying an exchange to an inventory preserves or improves set progress for every
/// set the trade touches.
///
/// The exchange is simulated on `inventory`, which is consumed and is expected to be
/// pre-filtered to the sets present in `items_to_give`. Progress regresses when a set loses a
/// unique class, loses a complete set, or when at any prefix of the ascending amounts the
/// losses outweigh the gains. Sets introduced solely by the received items are pure gains and
/// require no check.
pub fn is_trade_neutral_or_better(
    mut inventory: Vec<Asset>,
    items_to_give: &[Asset],
    items_to_receive: &[Asset],
) -> Result<bool, ParameterError> {
    if items_to_give.is_empty() || items_to_receive.is_empty() {
        return Err(ParameterError::EmptyItems);
    }

    let initial_sets = group_inventory_sets(&inventory)?;

    // Deduct the given items, consuming inventory entries of the same class in order.
    for item_to_give in items_to_give {
        let mut amount_to_give = item_to_give.amount;

        for item in inventory
            .iter_mut()
            .filter(|item| item.classid == item_to_give.classid)
        {
            if amount_to_give >= item.amount {
                amount_to_give -= item.amount;
                item.amount = 0;
            } else {
                item.amount -= amount_to_give;
                amount_to_give = 0;
            }

            if amount_to_give == 0 {
                break;
            }
        }

        if amount_to_give > 0 {
            // The inventory does not contain everything the offer would take from us.
            return Err(ParameterError::MissingGivenItems(item_to_give.classid));
        }

        inventory.retain(|item| item.amount > 0);
    }

    inventory.extend(items_to_receive.iter().cloned());

    let final_sets = group_inventory_sets(&inventory)?;

    for (set_key, initial_amounts) in &initial_sets {
        let Some(final_amounts) = final_sets.get(set_key) else {
            // the whole set is gone
            return Ok(false);
        };

        match final_amounts.len().cmp(&initial_amounts.len()) {
            // We lost a unique class.
            Ordering::Less => return Ok(false),
            // We gained a unique class, which is always progress for this set.
            Ordering::Greater => continue,
            Ordering::Equal => {},
        }

        // With both sorted ascending, the first amount is the number of complete sets.
        match final_amounts[0].cmp(&initial_amounts[0]) {
            Ordering::Less => return Ok(false),
            Ordering::Greater => continue,
            Ordering::Equal => {},
        }

        // Same unique classes, same complete sets. Walk the amounts and require that at every
        // prefix the gains at least offset the losses, so a needed item can't be swapped away
        // for one we already have spares of.
        let mut neutrality: i64 = 0;

        for (final_amount, initial_amount) in final_amounts.iter().zip(initial_amounts) {
            neutrality += i64::from(*final_amount) - i64::from(*initial_amount);

            if neutrality < 0 {
                return Ok(false);
            }
        }
    }

    Ok(true)
}
