use cosmwasm_std::{OverflowError, StdError, VerificationError};
use cw_controllers::HookError;
use cw_ownable::OwnershipError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Overflow(#[from] OverflowError),

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error(transparent)]
    HookError(#[from] HookError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Height {requested} is in the future (current height is {current})")]
    FutureHeight { requested: u64, current: u64 },

    #[error("Delegation signature has expired")]
    SignatureExpired {},

    #[error("Invalid nonce. Got ({got}), expected ({expected})")]
    InvalidNonce { expected: u64, got: u64 },

    #[error("Delegation signature is invalid")]
    SignatureInvalid {},

    #[error("Signer ({signer}) is not the delegator ({delegator})")]
    SignerMismatch { signer: String, delegator: String },

    #[error("Invalid compressed public key length; expected 33 bytes, got {length}")]
    InvalidPublicKeyLength { length: usize },

    #[error("Invalid bech32 address ({reason})")]
    InvalidBech32 { reason: String },

    #[error("migration error: incorrect contract: expected {expected}, actual {actual}")]
    MigrationErrorIncorrectContract { expected: String, actual: String },
}

impl From<bech32::Error> for ContractError {
    fn from(err: bech32::Error) -> Self {
        Self::InvalidBech32 {
            reason: err.to_string(),
        }
    }
}
