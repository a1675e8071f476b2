use crate::error::ParameterError;
use crate::response::Asset;
use crate::types::SetKey;
use std::collections::HashMap;

fn group_amounts(items: &[Asset]) -> HashMap<SetKey, u64> {
    let mut amounts: HashMap<SetKey, u64> = HashMap::new();

    for item in items {
        *amounts.entry(item.set_key()).or_default() += u64::from(item.amount);
    }

    amounts
}

/// Whether an exchange is fair on a count basis.
///
/// An exchange is fair when, for every set we would give items from, we receive at least as
/// many items of that same set back. Receiving items of sets we give nothing from is always
/// acceptable; that is overpayment by our partner.
pub fn is_fair_exchange(
    items_to_give: &[Asset],
    items_to_receive: &[Asset],
) -> Result<bool, ParameterError> {
    if items_to_give.is_empty() || items_to_receive.is_empty() {
        return Err(ParameterError::EmptyItems);
    }

    let given_amounts = group_amounts(items_to_give);
    let received_amounts = group_amounts(items_to_receive);
    let fair = given_amounts
        .iter()
        .all(|(set_key, given_amount)| {
            received_amounts
                .get(set_key)
                .is_some_and(|received_amount| received_amount >= given_amount)
        });

    Ok(fair)
}
