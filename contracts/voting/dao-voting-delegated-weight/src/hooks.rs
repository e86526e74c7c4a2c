use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, StdResult, Storage, SubMsg, Uint128, WasmMsg};

use crate::state::HOOKS;

/// Sent to every registered hook when the power of a delegatee
/// changes.
#[cw_serde]
pub struct DelegateVotesChangedHookMsg {
    pub delegatee: Addr,
    pub previous_power: Uint128,
    pub new_power: Uint128,
}

#[cw_serde]
pub enum DelegateVotesChangedExecuteMsg {
    DelegateVotesChangedHook(DelegateVotesChangedHookMsg),
}

pub fn delegate_votes_changed_hook_msgs(
    storage: &dyn Storage,
    delegatee: Addr,
    previous_power: Uint128,
    new_power: Uint128,
) -> StdResult<Vec<SubMsg>> {
    let msg = to_json_binary(&DelegateVotesChangedExecuteMsg::DelegateVotesChangedHook(
        DelegateVotesChangedHookMsg {
            delegatee,
            previous_power,
            new_power,
        },
    ))?;
    HOOKS.prepare_hooks(storage, |a| {
        let execute = WasmMsg::Execute {
            contract_addr: a.into_string(),
            msg: msg.clone(),
            funds: vec![],
        };
        Ok(SubMsg::new(execute))
    })
}
