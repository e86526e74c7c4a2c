use cosmwasm_std::{
    to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdResult,
    Uint128,
};
use cw_multi_test::{App, Contract, ContractWrapper, Executor};
use cw_storage_plus::Item;

use crate::hooks::{DelegateVotesChangedExecuteMsg, DelegateVotesChangedHookMsg};

use super::{
    execute::{add_hook, delegate, mint_many, remove_hook, transfer},
    is_error,
    queries::query_hooks,
    set_height, setup_test, CommonTest, CREATOR_ADDR,
};

const RECEIVED: Item<Vec<DelegateVotesChangedHookMsg>> = Item::new("received");

fn receiver_instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    _msg: Empty,
) -> StdResult<Response> {
    RECEIVED.save(deps.storage, &vec![])?;
    Ok(Response::default())
}

fn receiver_execute(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: DelegateVotesChangedExecuteMsg,
) -> StdResult<Response> {
    let DelegateVotesChangedExecuteMsg::DelegateVotesChangedHook(msg) = msg;
    RECEIVED.update(deps.storage, |mut received| -> StdResult<_> {
        received.push(msg);
        Ok(received)
    })?;
    Ok(Response::default())
}

fn receiver_query(deps: Deps, _env: Env, _msg: Empty) -> StdResult<Binary> {
    to_json_binary(&RECEIVED.load(deps.storage)?)
}

fn receiver_contract() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        receiver_execute,
        receiver_instantiate,
        receiver_query,
    ))
}

fn instantiate_receiver(app: &mut App) -> Addr {
    let code_id = app.store_code(receiver_contract());
    app.instantiate_contract(
        code_id,
        Addr::unchecked(CREATOR_ADDR),
        &Empty {},
        &[],
        "receiver",
        None,
    )
    .unwrap()
}

fn received(app: &App, receiver: &Addr) -> Vec<DelegateVotesChangedHookMsg> {
    app.wrap()
        .query_wasm_smart(receiver, &Empty {})
        .unwrap()
}

fn hook_msg(delegatee: &str, previous: u128, new: u128) -> DelegateVotesChangedHookMsg {
    DelegateVotesChangedHookMsg {
        delegatee: Addr::unchecked(delegatee),
        previous_power: Uint128::new(previous),
        new_power: Uint128::new(new),
    }
}

#[test]
fn test_add_remove_hooks() -> anyhow::Result<()> {
    let CommonTest {
        mut app, module, ..
    } = setup_test();

    add_hook(&mut app, &module, CREATOR_ADDR, "hook")?;
    let hooks = query_hooks(&app, &module)?;
    assert_eq!(hooks.hooks, vec!["hook".to_string()]);

    is_error!(add_hook(&mut app, &module, CREATOR_ADDR, "hook") => "Given address already registered as a hook");
    is_error!(add_hook(&mut app, &module, "ekez", "evil") => "Caller is not the contract's current owner");
    is_error!(remove_hook(&mut app, &module, "ekez", "hook") => "Caller is not the contract's current owner");

    remove_hook(&mut app, &module, CREATOR_ADDR, "hook")?;
    let hooks = query_hooks(&app, &module)?;
    assert!(hooks.hooks.is_empty());

    is_error!(remove_hook(&mut app, &module, CREATOR_ADDR, "hook") => "Given address not registered as a hook");

    Ok(())
}

#[test]
fn test_hooks_receive_power_changes() -> anyhow::Result<()> {
    let CommonTest {
        mut app,
        module,
        token,
    } = setup_test();

    let receiver = instantiate_receiver(&mut app);
    add_hook(&mut app, &module, CREATOR_ADDR, receiver.as_str())?;

    mint_many(&mut app, &token, CREATOR_ADDR, "alice", 2)?;
    mint_many(&mut app, &token, CREATOR_ADDR, "bob", 1)?;

    // no delegations yet, so nothing is reported.
    assert!(received(&app, &receiver).is_empty());

    set_height(&mut app, 10);
    delegate(&mut app, &module, "alice", Some("dee"))?;
    delegate(&mut app, &module, "bob", Some("eve"))?;

    set_height(&mut app, 11);
    transfer(&mut app, &token, "alice", "bob")?;

    set_height(&mut app, 12);
    delegate(&mut app, &module, "alice", None)?;

    // changes to the total are not reported to hooks.
    assert_eq!(
        received(&app, &receiver),
        vec![
            hook_msg("dee", 0, 2),
            hook_msg("eve", 0, 1),
            hook_msg("dee", 2, 1),
            hook_msg("eve", 1, 2),
            hook_msg("dee", 1, 0),
        ]
    );

    Ok(())
}

#[test]
fn test_removed_hook_stops_receiving() -> anyhow::Result<()> {
    let CommonTest {
        mut app,
        module,
        token,
    } = setup_test();

    let receiver = instantiate_receiver(&mut app);
    add_hook(&mut app, &module, CREATOR_ADDR, receiver.as_str())?;

    mint_many(&mut app, &token, CREATOR_ADDR, "alice", 1)?;
    delegate(&mut app, &module, "alice", Some("dee"))?;
    assert_eq!(received(&app, &receiver), vec![hook_msg("dee", 0, 1)]);

    remove_hook(&mut app, &module, CREATOR_ADDR, receiver.as_str())?;
    delegate(&mut app, &module, "alice", Some("eve"))?;
    assert_eq!(received(&app, &receiver), vec![hook_msg("dee", 0, 1)]);

    Ok(())
}

// A hook that can not handle the message fails the whole delegation,
// leaving no trace of it in the ledger.
#[test]
fn test_failing_hook_reverts_delegation() -> anyhow::Result<()> {
    let CommonTest {
        mut app,
        module,
        token,
    } = setup_test();

    // the token does not understand the hook message.
    add_hook(&mut app, &module, CREATOR_ADDR, token.as_str())?;

    mint_many(&mut app, &token, CREATOR_ADDR, "alice", 1)?;
    set_height(&mut app, 10);
    assert!(delegate(&mut app, &module, "alice", Some("dee")).is_err());

    assert_eq!(super::queries::query_delegates(&app, &module, "alice")?, None);
    assert_eq!(super::queries::power_at(&app, &module, "dee", 10), Uint128::zero());
    assert_eq!(super::queries::total_at(&app, &module, 10), Uint128::zero());

    Ok(())
}

// Hook management follows ownership when it is transferred.
#[test]
fn test_ownership_transfer_moves_hook_management() -> anyhow::Result<()> {
    let CommonTest {
        mut app, module, ..
    } = setup_test();

    app.execute_contract(
        Addr::unchecked(CREATOR_ADDR),
        module.clone(),
        &crate::msg::ExecuteMsg::UpdateOwnership(cw_ownable::Action::TransferOwnership {
            new_owner: "ekez".to_string(),
            expiry: None,
        }),
        &[],
    )?;
    app.execute_contract(
        Addr::unchecked("ekez"),
        module.clone(),
        &crate::msg::ExecuteMsg::UpdateOwnership(cw_ownable::Action::AcceptOwnership),
        &[],
    )?;

    let ownership = super::queries::query_ownership(&app, &module)?;
    assert_eq!(ownership.owner, Some(Addr::unchecked("ekez")));

    is_error!(add_hook(&mut app, &module, CREATOR_ADDR, "hook") => "Caller is not the contract's current owner");
    add_hook(&mut app, &module, "ekez", "hook")?;
    assert_eq!(query_hooks(&app, &module)?.hooks, vec!["hook".to_string()]);

    Ok(())
}
