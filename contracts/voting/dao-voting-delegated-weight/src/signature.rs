use bech32::{ToBase32, Variant};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    to_json_binary, Addr, Api, Binary, Deps, Env, HexBinary, OverflowError, OverflowOperation,
    StdResult, Storage,
};
use cw_utils::Expiration;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::state::NONCES;
use crate::ContractError;

const COMPRESSED_PK_LEN: usize = 33;

/// The document a delegator signs to authorize a delegation on their
/// behalf. The chain ID and contract address keep a signature from
/// being replayed against another deployment, and the nonce keeps it
/// from being replayed against this one.
#[cw_serde]
pub struct DelegationPayload {
    pub chain_id: String,
    pub contract_address: String,
    pub delegator: String,
    pub delegatee: Option<String>,
    pub nonce: u64,
    pub expiration: Expiration,
}

impl DelegationPayload {
    /// SHA-256 of the JSON serialized payload. This is the message
    /// that is signed.
    pub fn digest(&self) -> StdResult<Vec<u8>> {
        let serialized = to_json_binary(self)?;
        Ok(Sha256::digest(serialized.as_slice()).to_vec())
    }
}

/// Checks that `signature` authorizes `payload`. Errors if the payload
/// has expired, does not carry the delegator's next nonce, was not
/// signed by `public_key`, or `public_key` does not belong to the
/// delegator. Reads state only; the nonce is consumed separately with
/// [`consume_nonce`].
pub fn verify_delegation_signature(
    deps: Deps,
    env: &Env,
    payload: &DelegationPayload,
    public_key: &HexBinary,
    signature: &Binary,
) -> Result<(), ContractError> {
    if payload.expiration.is_expired(&env.block) {
        return Err(ContractError::SignatureExpired {});
    }

    let delegator = deps.api.addr_validate(&payload.delegator)?;
    let expected = NONCES
        .may_load(deps.storage, &delegator)?
        .unwrap_or_default();
    if payload.nonce != expected {
        return Err(ContractError::InvalidNonce {
            expected,
            got: payload.nonce,
        });
    }

    if public_key.len() != COMPRESSED_PK_LEN {
        return Err(ContractError::InvalidPublicKeyLength {
            length: public_key.len(),
        });
    }

    let digest = payload.digest()?;
    if !deps
        .api
        .secp256k1_verify(&digest, signature.as_slice(), public_key.as_slice())?
    {
        return Err(ContractError::SignatureInvalid {});
    }

    // the signer's address is derived with the delegator's own prefix.
    let (prefix, _, _) = bech32::decode(delegator.as_str())?;
    let signer = pk_to_addr(deps.api, public_key.as_slice(), &prefix)?;
    if signer != delegator {
        return Err(ContractError::SignerMismatch {
            signer: signer.into_string(),
            delegator: delegator.into_string(),
        });
    }

    Ok(())
}

/// Advances the nonce of `delegator`, returning the nonce that was
/// consumed.
pub fn consume_nonce(storage: &mut dyn Storage, delegator: &Addr) -> Result<u64, ContractError> {
    let nonce = NONCES.may_load(storage, delegator)?.unwrap_or_default();
    let next = nonce
        .checked_add(1)
        .ok_or_else(|| OverflowError::new(OverflowOperation::Add, nonce, 1))?;
    NONCES.save(storage, delegator, &next)?;
    Ok(nonce)
}

/// Derives the bech32 account address of a compressed secp256k1
/// public key: `bech32(prefix, ripemd160(sha256(pk)))`.
pub fn pk_to_addr(api: &dyn Api, public_key: &[u8], prefix: &str) -> Result<Addr, ContractError> {
    if public_key.len() != COMPRESSED_PK_LEN {
        return Err(ContractError::InvalidPublicKeyLength {
            length: public_key.len(),
        });
    }

    let address_raw = Ripemd160::digest(Sha256::digest(public_key));
    let bech32 = bech32::encode(prefix, address_raw.to_base32(), Variant::Bech32)?;

    Ok(api.addr_validate(&bech32)?)
}
