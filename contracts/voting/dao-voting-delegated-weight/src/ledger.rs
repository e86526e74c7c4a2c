use cosmwasm_std::{Addr, Event, Storage, Uint128};

use crate::state::{DELEGATEE_POWER, TOTAL_POWER, TOTAL_POWER_KEY};
use crate::ContractError;

/// A change to one of the weight series caused by moving weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightChange {
    /// The delegatee whose power changed, or `None` for the total
    /// delegated weight.
    pub delegatee: Option<Addr>,
    pub previous: Uint128,
    pub new: Uint128,
}

impl WeightChange {
    pub fn event(&self) -> Event {
        Event::new("delegate_votes_changed")
            .add_attribute(
                "delegatee",
                self.delegatee
                    .as_ref()
                    .map(Addr::to_string)
                    .unwrap_or_else(|| TOTAL_POWER_KEY.to_string()),
            )
            .add_attribute("previous_power", self.previous)
            .add_attribute("new_power", self.new)
    }
}

/// Moves `amount` of weight from the delegatee `from` to the delegatee
/// `to` at `height`, where `None` stands for weight that is not
/// delegated to anyone:
///
/// | from | to   | effect                              |
/// |------|------|-------------------------------------|
/// | None | None | nothing                             |
/// | None | D    | total += amount, D += amount        |
/// | S    | None | S -= amount, total -= amount        |
/// | S    | D    | S -= amount, D += amount            |
///
/// Weight that was delegated to `S` is always present in both `S`'s
/// series and the total, so the subtractions can only fail if that
/// accounting has been broken, in which case the whole message fails.
/// Returns the changes made, in the order they were made.
pub fn move_weight(
    storage: &mut dyn Storage,
    from: Option<&Addr>,
    to: Option<&Addr>,
    amount: Uint128,
    height: u64,
) -> Result<Vec<WeightChange>, ContractError> {
    if amount.is_zero() || from == to {
        return Ok(vec![]);
    }

    let mut changes = Vec::with_capacity(2);

    match from {
        Some(from) => changes.push(decrease_power(storage, from, amount, height)?),
        None => changes.push(increase_total(storage, amount, height)?),
    }

    match to {
        Some(to) => changes.push(increase_power(storage, to, amount, height)?),
        None => changes.push(decrease_total(storage, amount, height)?),
    }

    Ok(changes)
}

fn increase_power(
    storage: &mut dyn Storage,
    delegatee: &Addr,
    amount: Uint128,
    height: u64,
) -> Result<WeightChange, ContractError> {
    let (previous, new) = DELEGATEE_POWER.update(storage, delegatee, height, |power| {
        power.checked_add(amount).map_err(ContractError::from)
    })?;
    Ok(WeightChange {
        delegatee: Some(delegatee.clone()),
        previous,
        new,
    })
}

fn decrease_power(
    storage: &mut dyn Storage,
    delegatee: &Addr,
    amount: Uint128,
    height: u64,
) -> Result<WeightChange, ContractError> {
    let (previous, new) = DELEGATEE_POWER.update(storage, delegatee, height, |power| {
        power.checked_sub(amount).map_err(ContractError::from)
    })?;
    Ok(WeightChange {
        delegatee: Some(delegatee.clone()),
        previous,
        new,
    })
}

fn increase_total(
    storage: &mut dyn Storage,
    amount: Uint128,
    height: u64,
) -> Result<WeightChange, ContractError> {
    let (previous, new) = TOTAL_POWER.update(storage, TOTAL_POWER_KEY, height, |total| {
        total.checked_add(amount).map_err(ContractError::from)
    })?;
    Ok(WeightChange {
        delegatee: None,
        previous,
        new,
    })
}

fn decrease_total(
    storage: &mut dyn Storage,
    amount: Uint128,
    height: u64,
) -> Result<WeightChange, ContractError> {
    let (previous, new) = TOTAL_POWER.update(storage, TOTAL_POWER_KEY, height, |total| {
        total.checked_sub(amount).map_err(ContractError::from)
    })?;
    Ok(WeightChange {
        delegatee: None,
        previous,
        new,
    })
}
