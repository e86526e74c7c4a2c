use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, HexBinary, Uint128};
use cw_ownable::cw_ownable_execute;
use cw_utils::Expiration;

#[cw_serde]
pub struct InstantiateMsg {
    /// May add and remove hooks. If not set, hooks can not be
    /// changed.
    pub owner: Option<String>,
    /// Address of the contract that owns weight-bearing units. It must
    /// answer the cw20 `Balance` query and call `TransferHook` every
    /// time a unit moves.
    pub token: String,
}

#[cw_ownable_execute]
#[cw_serde]
pub enum ExecuteMsg {
    /// Delegates the sender's weight to `delegatee`, moving it away
    /// from their previous delegatee. A `delegatee` of `None` removes
    /// the sender's weight from the delegated pool.
    Delegate { delegatee: Option<String> },
    /// Delegates on behalf of `delegator`, who authorized it by
    /// signing a `DelegationPayload` with the key `public_key`. Each
    /// signature may only be used once.
    DelegateBySig {
        delegator: String,
        delegatee: Option<String>,
        /// Must equal the delegator's next nonce.
        nonce: u64,
        /// The signature is rejected once this has passed.
        expiration: Expiration,
        /// Compressed secp256k1 public key of the delegator.
        public_key: HexBinary,
        signature: Binary,
    },
    /// Called by the token contract each time a single unit moves
    /// from `from` to `to`. `from` is `None` for mints and `to` is
    /// `None` for burns.
    TransferHook {
        from: Option<String>,
        to: Option<String>,
    },
    AddHook { addr: String },
    RemoveHook { addr: String },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Weight delegated to `address` at `height`. Defaults to the
    /// current height; errors if `height` is in the future.
    #[returns(VotingPowerAtHeightResponse)]
    VotingPowerAtHeight {
        address: String,
        height: Option<u64>,
    },
    /// Total weight delegated to anyone at `height`. Defaults to the
    /// current height; errors if `height` is in the future.
    #[returns(TotalPowerAtHeightResponse)]
    TotalPowerAtHeight { height: Option<u64> },
    /// The current delegatee of `address`.
    #[returns(DelegatesResponse)]
    Delegates { address: String },
    #[returns(NumCheckpointsResponse)]
    NumCheckpoints { address: String },
    #[returns(Option<::cw_checkpoints::Checkpoint>)]
    Checkpoint { address: String, index: u32 },
    /// The nonce the next delegation signature of `address` must use.
    #[returns(NonceResponse)]
    Nonce { address: String },
    #[returns(crate::state::Config)]
    Config {},
    #[returns(::cw_controllers::HooksResponse)]
    Hooks {},
    #[returns(InfoResponse)]
    Info {},
    #[returns(::cw_ownable::Ownership<::cosmwasm_std::Addr>)]
    Ownership {},
}

#[cw_serde]
pub struct VotingPowerAtHeightResponse {
    pub power: Uint128,
    pub height: u64,
}

#[cw_serde]
pub struct TotalPowerAtHeightResponse {
    pub power: Uint128,
    pub height: u64,
}

#[cw_serde]
pub struct DelegatesResponse {
    pub delegatee: Option<Addr>,
}

#[cw_serde]
pub struct NumCheckpointsResponse {
    pub count: u32,
}

#[cw_serde]
pub struct NonceResponse {
    pub nonce: u64,
}

#[cw_serde]
pub struct InfoResponse {
    pub info: cw2::ContractVersion,
}

#[cw_serde]
pub struct MigrateMsg {}
