#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

use std::cmp::Ordering;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{OverflowError, OverflowOperation, StdError, StdResult, Storage, Uint128};
use cw_storage_plus::{KeyDeserialize, Map, Prefixer, PrimaryKey};

/// The value of a key as of a block height.
#[cw_serde]
#[derive(Copy)]
pub struct Checkpoint {
    pub height: u64,
    pub value: Uint128,
}

/// Per-key history of values, stored as a dense list of checkpoints
/// in strictly increasing height order.
pub struct Checkpoints<'a, K> {
    /// The number of checkpoints written for a key.
    counts: Map<'a, K, u32>,
    /// Checkpoints for a key, indexed from zero.
    checkpoints: Map<'a, (K, u32), Checkpoint>,
}

impl<'a, K> Checkpoints<'a, K> {
    /// Creates a new [`Checkpoints`] with the given storage keys.
    ///
    /// ```rust
    /// use cosmwasm_std::Addr;
    /// use cw_checkpoints::Checkpoints;
    ///
    /// pub const POWER: Checkpoints<&Addr> = Checkpoints::new("power__count", "power");
    /// ```
    pub const fn new(counts_key: &'a str, checkpoints_key: &'a str) -> Self {
        Checkpoints {
            counts: Map::new(counts_key),
            checkpoints: Map::new(checkpoints_key),
        }
    }
}

impl<'a, K> Checkpoints<'a, K>
where
    K: PrimaryKey<'a> + Prefixer<'a> + KeyDeserialize + Clone,
{
    /// Returns the number of checkpoints recorded for `k`.
    pub fn len(&self, store: &dyn Storage, k: K) -> StdResult<u32> {
        Ok(self.counts.may_load(store, k)?.unwrap_or_default())
    }

    pub fn is_empty(&self, store: &dyn Storage, k: K) -> StdResult<bool> {
        self.len(store, k).map(|len| len == 0)
    }

    /// Loads the checkpoint at `index`, if one exists.
    pub fn checkpoint(
        &self,
        store: &dyn Storage,
        k: K,
        index: u32,
    ) -> StdResult<Option<Checkpoint>> {
        self.checkpoints.may_load(store, (k, index))
    }

    /// Loads the most recent checkpoint for `k`, if any.
    pub fn last(&self, store: &dyn Storage, k: K) -> StdResult<Option<Checkpoint>> {
        match self.len(store, k.clone())? {
            0 => Ok(None),
            len => self.checkpoints.load(store, (k, len - 1)).map(Some),
        }
    }

    /// Loads the most recent value for `k`. A key that has never been
    /// written has a value of zero.
    pub fn latest(&self, store: &dyn Storage, k: K) -> StdResult<Uint128> {
        Ok(self
            .last(store, k)?
            .map(|checkpoint| checkpoint.value)
            .unwrap_or_default())
    }

    /// Records `value` for `k` at `height`. If the most recent
    /// checkpoint was written at the same height it is overwritten,
    /// otherwise a new checkpoint is appended. Errors if `height` is
    /// before the most recent checkpoint.
    pub fn push(
        &self,
        store: &mut dyn Storage,
        k: K,
        height: u64,
        value: Uint128,
    ) -> StdResult<()> {
        let len = self.len(store, k.clone())?;

        if let Some(last_index) = len.checked_sub(1) {
            let last = self.checkpoints.load(store, (k.clone(), last_index))?;
            match height.cmp(&last.height) {
                Ordering::Less => {
                    return Err(StdError::generic_err(format!(
                        "can not write checkpoint at height {height} before latest checkpoint at height {}",
                        last.height
                    )))
                }
                Ordering::Equal => {
                    return self
                        .checkpoints
                        .save(store, (k, last_index), &Checkpoint { height, value })
                }
                Ordering::Greater => (),
            }
        }

        let next_len = len
            .checked_add(1)
            .ok_or_else(|| OverflowError::new(OverflowOperation::Add, len, 1))?;
        self.checkpoints
            .save(store, (k.clone(), len), &Checkpoint { height, value })?;
        self.counts.save(store, k, &next_len)
    }

    /// Applies `action` to the most recent value for `k` and records
    /// the result at `height`. Returns the previous and new values.
    /// Nothing is written if `action` errors.
    pub fn update<A, E>(
        &self,
        store: &mut dyn Storage,
        k: K,
        height: u64,
        action: A,
    ) -> Result<(Uint128, Uint128), E>
    where
        A: FnOnce(Uint128) -> Result<Uint128, E>,
        E: From<StdError>,
    {
        let previous = self.latest(store, k.clone())?;
        let new = action(previous)?;
        self.push(store, k, height, new)?;
        Ok((previous, new))
    }

    /// Loads the value of `k` as of `height`: the value of the latest
    /// checkpoint written at or before `height`, or zero if there is
    /// none.
    pub fn value_at(&self, store: &dyn Storage, k: K, height: u64) -> StdResult<Uint128> {
        let len = self.len(store, k.clone())?;
        if len == 0 {
            return Ok(Uint128::zero());
        }

        // most lookups are for the current value.
        let latest = self.checkpoints.load(store, (k.clone(), len - 1))?;
        if latest.height <= height {
            return Ok(latest.value);
        }

        let earliest = self.checkpoints.load(store, (k.clone(), 0))?;
        if earliest.height > height {
            return Ok(Uint128::zero());
        }

        // invariant: checkpoints[lower].height <= height and every
        // checkpoint after upper is above height.
        let mut lower = 0;
        let mut upper = len - 1;
        while upper > lower {
            let center = upper - (upper - lower) / 2;
            let checkpoint = self.checkpoints.load(store, (k.clone(), center))?;
            match checkpoint.height.cmp(&height) {
                Ordering::Equal => return Ok(checkpoint.value),
                Ordering::Less => lower = center,
                Ordering::Greater => upper = center - 1,
            }
        }

        self.checkpoints
            .load(store, (k, lower))
            .map(|checkpoint| checkpoint.value)
    }
}
