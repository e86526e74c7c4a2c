use anyhow::Result as AnyResult;
use cosmwasm_std::Addr;
use cw_multi_test::{App, AppResponse, Executor};
use dao_test_weight_token::msg::ExecuteMsg as TokenExecuteMsg;

use crate::msg::ExecuteMsg;

// Shorthand for an unchecked address.
macro_rules! addr {
    ($x:expr ) => {
        Addr::unchecked($x)
    };
}

pub fn mint(app: &mut App, token: &Addr, sender: &str, recipient: &str) -> AnyResult<AppResponse> {
    app.execute_contract(
        addr!(sender),
        token.clone(),
        &TokenExecuteMsg::Mint {
            recipient: recipient.to_string(),
        },
        &[],
    )
}

/// Mints `amount` units to `recipient`, one at a time.
pub fn mint_many(
    app: &mut App,
    token: &Addr,
    sender: &str,
    recipient: &str,
    amount: u64,
) -> AnyResult<()> {
    for _ in 0..amount {
        mint(app, token, sender, recipient)?;
    }
    Ok(())
}

pub fn transfer(
    app: &mut App,
    token: &Addr,
    sender: &str,
    recipient: &str,
) -> AnyResult<AppResponse> {
    app.execute_contract(
        addr!(sender),
        token.clone(),
        &TokenExecuteMsg::Transfer {
            recipient: recipient.to_string(),
        },
        &[],
    )
}

pub fn burn(app: &mut App, token: &Addr, sender: &str) -> AnyResult<AppResponse> {
    app.execute_contract(addr!(sender), token.clone(), &TokenExecuteMsg::Burn {}, &[])
}

pub fn delegate(
    app: &mut App,
    module: &Addr,
    sender: &str,
    delegatee: Option<&str>,
) -> AnyResult<AppResponse> {
    app.execute_contract(
        addr!(sender),
        module.clone(),
        &ExecuteMsg::Delegate {
            delegatee: delegatee.map(str::to_string),
        },
        &[],
    )
}

pub fn transfer_hook(
    app: &mut App,
    module: &Addr,
    sender: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> AnyResult<AppResponse> {
    app.execute_contract(
        addr!(sender),
        module.clone(),
        &ExecuteMsg::TransferHook {
            from: from.map(str::to_string),
            to: to.map(str::to_string),
        },
        &[],
    )
}

pub fn add_hook(app: &mut App, module: &Addr, sender: &str, hook: &str) -> AnyResult<AppResponse> {
    app.execute_contract(
        addr!(sender),
        module.clone(),
        &ExecuteMsg::AddHook {
            addr: hook.to_string(),
        },
        &[],
    )
}

pub fn remove_hook(
    app: &mut App,
    module: &Addr,
    sender: &str,
    hook: &str,
) -> AnyResult<AppResponse> {
    app.execute_contract(
        addr!(sender),
        module.clone(),
        &ExecuteMsg::RemoveHook {
            addr: hook.to_string(),
        },
        &[],
    )
}
