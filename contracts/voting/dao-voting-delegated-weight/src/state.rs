use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage};
use cw_checkpoints::Checkpoints;
use cw_controllers::Hooks;
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct Config {
    /// The contract that owns weight-bearing units. It is queried for
    /// balances and is the only caller allowed to report transfers.
    pub token: Addr,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// The current delegatee of each delegator. A delegator without an
/// entry has not delegated and their weight counts for no one.
pub const DELEGATES: Map<&Addr, Addr> = Map::new("delegates");

/// Weight delegated to each delegatee as a function of block height.
pub const DELEGATEE_POWER: Checkpoints<&Addr> = Checkpoints::new("dp__count", "dp");

/// Total weight delegated to any delegatee as a function of block
/// height. Stored under the single key [`TOTAL_POWER_KEY`].
pub const TOTAL_POWER: Checkpoints<&str> = Checkpoints::new("tp__count", "tp");
pub const TOTAL_POWER_KEY: &str = "total";

/// The next nonce that a delegation signature must carry, per
/// delegator.
pub const NONCES: Map<&Addr, u64> = Map::new("nonces");

// Hooks to contracts that will receive delegatee power changes.
pub const HOOKS: Hooks = Hooks::new("hooks");

pub fn delegates(storage: &dyn Storage, delegator: &Addr) -> StdResult<Option<Addr>> {
    DELEGATES.may_load(storage, delegator)
}

/// Sets the delegatee of `delegator`, returning the previous one.
/// `None` clears the delegation.
pub fn set_delegate(
    storage: &mut dyn Storage,
    delegator: &Addr,
    delegatee: Option<&Addr>,
) -> StdResult<Option<Addr>> {
    let previous = DELEGATES.may_load(storage, delegator)?;
    match delegatee {
        Some(delegatee) => DELEGATES.save(storage, delegator, delegatee)?,
        None => DELEGATES.remove(storage, delegator),
    }
    Ok(previous)
}
