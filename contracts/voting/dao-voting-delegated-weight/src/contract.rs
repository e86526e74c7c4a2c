#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Env, Event, HexBinary, MessageInfo, Response,
    StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw_utils::Expiration;

use crate::hooks::delegate_votes_changed_hook_msgs;
use crate::ledger::{move_weight, WeightChange};
use crate::msg::{
    DelegatesResponse, ExecuteMsg, InfoResponse, InstantiateMsg, MigrateMsg, NonceResponse,
    NumCheckpointsResponse, QueryMsg, TotalPowerAtHeightResponse, VotingPowerAtHeightResponse,
};
use crate::signature::{consume_nonce, verify_delegation_signature, DelegationPayload};
use crate::state::{
    delegates, set_delegate, Config, CONFIG, DELEGATEE_POWER, HOOKS, NONCES, TOTAL_POWER,
    TOTAL_POWER_KEY,
};
use crate::ContractError;

pub(crate) const CONTRACT_NAME: &str = "crates.io:dao-voting-delegated-weight";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let ownership = cw_ownable::initialize_owner(deps.storage, deps.api, msg.owner.as_deref())?;

    let token = deps.api.addr_validate(&msg.token)?;
    CONFIG.save(
        deps.storage,
        &Config {
            token: token.clone(),
        },
    )?;

    Ok(Response::default()
        .add_attribute("method", "instantiate")
        .add_attribute("token", token)
        .add_attributes(ownership.into_attributes()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Delegate { delegatee } => execute_delegate(deps, env, info, delegatee),
        ExecuteMsg::DelegateBySig {
            delegator,
            delegatee,
            nonce,
            expiration,
            public_key,
            signature,
        } => execute_delegate_by_sig(
            deps, env, delegator, delegatee, nonce, expiration, public_key, signature,
        ),
        ExecuteMsg::TransferHook { from, to } => execute_transfer_hook(deps, env, info, from, to),
        ExecuteMsg::AddHook { addr } => execute_add_hook(deps, info, addr),
        ExecuteMsg::RemoveHook { addr } => execute_remove_hook(deps, info, addr),
        ExecuteMsg::UpdateOwnership(action) => execute_update_ownership(deps, env, info, action),
    }
}

pub fn execute_delegate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    delegatee: Option<String>,
) -> Result<Response, ContractError> {
    let delegatee = delegatee
        .map(|d| deps.api.addr_validate(&d))
        .transpose()?;
    delegate(deps, &env, info.sender, delegatee)
}

#[allow(clippy::too_many_arguments)]
pub fn execute_delegate_by_sig(
    deps: DepsMut,
    env: Env,
    delegator: String,
    delegatee: Option<String>,
    nonce: u64,
    expiration: Expiration,
    public_key: HexBinary,
    signature: Binary,
) -> Result<Response, ContractError> {
    let payload = DelegationPayload {
        chain_id: env.block.chain_id.clone(),
        contract_address: env.contract.address.to_string(),
        delegator,
        delegatee,
        nonce,
        expiration,
    };
    verify_delegation_signature(deps.as_ref(), &env, &payload, &public_key, &signature)?;

    let delegator = deps.api.addr_validate(&payload.delegator)?;
    let delegatee = payload
        .delegatee
        .map(|d| deps.api.addr_validate(&d))
        .transpose()?;

    // the nonce is spent before any weight moves.
    let nonce = consume_nonce(deps.storage, &delegator)?;

    Ok(delegate(deps, &env, delegator, delegatee)?.add_attribute("nonce", nonce.to_string()))
}

/// Points `delegator` at `delegatee` and moves the delegator's whole
/// balance from their previous delegatee to the new one.
fn delegate(
    deps: DepsMut,
    env: &Env,
    delegator: Addr,
    delegatee: Option<Addr>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let balance = query_token_balance(deps.as_ref(), &config.token, &delegator)?;

    let previous = set_delegate(deps.storage, &delegator, delegatee.as_ref())?;
    let changes = move_weight(
        deps.storage,
        previous.as_ref(),
        delegatee.as_ref(),
        balance,
        env.block.height,
    )?;

    let delegate_changed = Event::new("delegate_changed")
        .add_attribute("delegator", delegator.as_str())
        .add_attribute("from_delegatee", display_delegatee(previous.as_ref()))
        .add_attribute("to_delegatee", display_delegatee(delegatee.as_ref()));

    Ok(weight_changes_response(deps.storage, changes)?
        .add_event(delegate_changed)
        .add_attribute("action", "delegate")
        .add_attribute("delegator", delegator)
        .add_attribute("delegatee", display_delegatee(delegatee.as_ref()))
        .add_attribute("amount", balance))
}

pub fn execute_transfer_hook(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    from: Option<String>,
    to: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.token {
        return Err(ContractError::Unauthorized {});
    }

    let from = from.map(|a| deps.api.addr_validate(&a)).transpose()?;
    let to = to.map(|a| deps.api.addr_validate(&a)).transpose()?;

    let from_delegatee = from
        .as_ref()
        .map(|a| delegates(deps.storage, a))
        .transpose()?
        .flatten();
    let to_delegatee = to
        .as_ref()
        .map(|a| delegates(deps.storage, a))
        .transpose()?
        .flatten();

    let changes = move_weight(
        deps.storage,
        from_delegatee.as_ref(),
        to_delegatee.as_ref(),
        Uint128::one(),
        env.block.height,
    )?;

    Ok(weight_changes_response(deps.storage, changes)?
        .add_attribute("action", "transfer_hook")
        .add_attribute("from", display_delegatee(from.as_ref()))
        .add_attribute("to", display_delegatee(to.as_ref())))
}

pub fn execute_add_hook(
    deps: DepsMut,
    info: MessageInfo,
    addr: String,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let hook = deps.api.addr_validate(&addr)?;
    HOOKS.add_hook(deps.storage, hook)?;

    Ok(Response::default()
        .add_attribute("action", "add_hook")
        .add_attribute("hook", addr))
}

pub fn execute_remove_hook(
    deps: DepsMut,
    info: MessageInfo,
    addr: String,
) -> Result<Response, ContractError> {
    cw_ownable::assert_owner(deps.storage, &info.sender)?;

    let hook = deps.api.addr_validate(&addr)?;
    HOOKS.remove_hook(deps.storage, hook)?;

    Ok(Response::default()
        .add_attribute("action", "remove_hook")
        .add_attribute("hook", addr))
}

pub fn execute_update_ownership(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    action: cw_ownable::Action,
) -> Result<Response, ContractError> {
    let ownership = cw_ownable::update_ownership(deps, &env.block, &info.sender, action)?;
    Ok(Response::default()
        .add_attribute("action", "update_ownership")
        .add_attributes(ownership.into_attributes()))
}

/// Builds a response carrying an event for every weight change and a
/// hook message for every change to a delegatee's power.
fn weight_changes_response(
    storage: &dyn cosmwasm_std::Storage,
    changes: Vec<WeightChange>,
) -> StdResult<Response> {
    let mut response = Response::default();
    for change in changes {
        response = response.add_event(change.event());
        if let Some(delegatee) = change.delegatee {
            response = response.add_submessages(delegate_votes_changed_hook_msgs(
                storage,
                delegatee,
                change.previous,
                change.new,
            )?);
        }
    }
    Ok(response)
}

fn display_delegatee(delegatee: Option<&Addr>) -> String {
    delegatee
        .map(Addr::to_string)
        .unwrap_or_else(|| "none".to_string())
}

/// `balanceOf` against the token contract.
fn query_token_balance(deps: Deps, token: &Addr, account: &Addr) -> StdResult<Uint128> {
    let res: cw20::BalanceResponse = deps.querier.query_wasm_smart(
        token,
        &cw20::Cw20QueryMsg::Balance {
            address: account.to_string(),
        },
    )?;
    Ok(res.balance)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::VotingPowerAtHeight { address, height } => {
            query_voting_power_at_height(deps, env, address, height)
        }
        QueryMsg::TotalPowerAtHeight { height } => query_total_power_at_height(deps, env, height),
        QueryMsg::Delegates { address } => query_delegates(deps, address),
        QueryMsg::NumCheckpoints { address } => query_num_checkpoints(deps, address),
        QueryMsg::Checkpoint { address, index } => query_checkpoint(deps, address, index),
        QueryMsg::Nonce { address } => query_nonce(deps, address),
        QueryMsg::Config {} => Ok(to_json_binary(&CONFIG.load(deps.storage)?)?),
        QueryMsg::Hooks {} => Ok(to_json_binary(&HOOKS.query_hooks(deps)?)?),
        QueryMsg::Info {} => query_info(deps),
        QueryMsg::Ownership {} => Ok(to_json_binary(&cw_ownable::get_ownership(
            deps.storage,
        )?)?),
    }
}

/// Resolves a queried height, rejecting heights after the current
/// block. No checkpoint can exist for them yet.
fn resolve_height(env: &Env, height: Option<u64>) -> Result<u64, ContractError> {
    let current = env.block.height;
    match height {
        Some(requested) if requested > current => {
            Err(ContractError::FutureHeight { requested, current })
        }
        Some(requested) => Ok(requested),
        None => Ok(current),
    }
}

pub fn query_voting_power_at_height(
    deps: Deps,
    env: Env,
    address: String,
    height: Option<u64>,
) -> Result<Binary, ContractError> {
    let height = resolve_height(&env, height)?;
    let address = deps.api.addr_validate(&address)?;
    let power = DELEGATEE_POWER.value_at(deps.storage, &address, height)?;
    Ok(to_json_binary(&VotingPowerAtHeightResponse { power, height })?)
}

pub fn query_total_power_at_height(
    deps: Deps,
    env: Env,
    height: Option<u64>,
) -> Result<Binary, ContractError> {
    let height = resolve_height(&env, height)?;
    let power = TOTAL_POWER.value_at(deps.storage, TOTAL_POWER_KEY, height)?;
    Ok(to_json_binary(&TotalPowerAtHeightResponse { power, height })?)
}

pub fn query_delegates(deps: Deps, address: String) -> Result<Binary, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    Ok(to_json_binary(&DelegatesResponse {
        delegatee: delegates(deps.storage, &address)?,
    })?)
}

pub fn query_num_checkpoints(deps: Deps, address: String) -> Result<Binary, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    Ok(to_json_binary(&NumCheckpointsResponse {
        count: DELEGATEE_POWER.len(deps.storage, &address)?,
    })?)
}

pub fn query_checkpoint(deps: Deps, address: String, index: u32) -> Result<Binary, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    Ok(to_json_binary(
        &DELEGATEE_POWER.checkpoint(deps.storage, &address, index)?,
    )?)
}

pub fn query_nonce(deps: Deps, address: String) -> Result<Binary, ContractError> {
    let address = deps.api.addr_validate(&address)?;
    Ok(to_json_binary(&NonceResponse {
        nonce: NONCES.may_load(deps.storage, &address)?.unwrap_or_default(),
    })?)
}

pub fn query_info(deps: Deps) -> Result<Binary, ContractError> {
    let info = get_contract_version(deps.storage)?;
    Ok(to_json_binary(&InfoResponse { info })?)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let contract_version = get_contract_version(deps.storage)?;

    if contract_version.contract != CONTRACT_NAME {
        return Err(ContractError::MigrationErrorIncorrectContract {
            expected: CONTRACT_NAME.to_string(),
            actual: contract_version.contract,
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::default()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", contract_version.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
