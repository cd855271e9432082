use cosmwasm_std::{Addr, StdResult, Storage, Uint128, Uint256};
use staked_common::math;

use crate::state::{AssetConfig, ASSET_CONFIGS, USER_ASSET_INDICES, USER_UNCLAIMED_REWARDS};

/// Result of advancing an asset's reward index.
pub struct AssetAccrual {
    pub index: Uint256,
    pub changed: bool,
}

/// Result of settling a user's pending rewards against the asset index.
pub struct UserAccrual {
    /// Newly accrued rewards added to the user's unclaimed balance.
    pub rewards: Uint128,
    pub index_changed: bool,
}

/// Advance an asset's reward index up to `now`.
///
/// Elapsed time is clamped at `distribution_end`, so the index freezes there
/// and never decreases. The update timestamp is refreshed even when the
/// index itself is unchanged. Unconfigured assets accrue nothing.
pub fn accrue_asset(
    storage: &mut dyn Storage,
    asset: &Addr,
    total_staked: Uint128,
    now: u64,
    distribution_end: u64,
) -> StdResult<AssetAccrual> {
    let mut config = match ASSET_CONFIGS.may_load(storage, asset)? {
        Some(config) => config,
        None => {
            return Ok(AssetAccrual {
                index: Uint256::zero(),
                changed: false,
            })
        }
    };

    let capped_now = now.min(distribution_end);
    let elapsed = capped_now.saturating_sub(config.last_update_timestamp);
    let increment = math::index_increment(config.emission_per_second, elapsed, total_staked)?;

    let changed = !increment.is_zero();
    if changed {
        config.index = config.index.checked_add(increment)?;
    }
    config.last_update_timestamp = now;
    ASSET_CONFIGS.save(storage, asset, &config)?;

    Ok(AssetAccrual {
        index: config.index,
        changed,
    })
}

/// Settle a user's rewards for one asset using the pre-mutation balance.
///
/// Adds `balance * (asset_index - user_index) / SCALE` to the user's
/// unclaimed rewards and moves the user checkpoint up to the asset index.
pub fn accrue_user(
    storage: &mut dyn Storage,
    user: &Addr,
    asset: &Addr,
    balance: Uint128,
    asset_index: Uint256,
) -> StdResult<UserAccrual> {
    let user_index = USER_ASSET_INDICES
        .may_load(storage, (user, asset))?
        .unwrap_or_default();

    let delta = asset_index.checked_sub(user_index)?;
    let rewards = math::accrued_rewards(balance, delta)?;

    if !rewards.is_zero() {
        let unclaimed = USER_UNCLAIMED_REWARDS
            .may_load(storage, user)?
            .unwrap_or_default();
        USER_UNCLAIMED_REWARDS.save(storage, user, &unclaimed.checked_add(rewards)?)?;
    }

    let index_changed = user_index != asset_index;
    if index_changed {
        USER_ASSET_INDICES.save(storage, (user, asset), &asset_index)?;
    }

    Ok(UserAccrual {
        rewards,
        index_changed,
    })
}

/// Stored unclaimed rewards plus the accrual that would happen if the user
/// interacted right now. Read-only.
pub fn pending_rewards(
    storage: &dyn Storage,
    user: &Addr,
    asset: &Addr,
    balance: Uint128,
    total_staked: Uint128,
    now: u64,
    distribution_end: u64,
) -> StdResult<Uint128> {
    let stored = USER_UNCLAIMED_REWARDS
        .may_load(storage, user)?
        .unwrap_or_default();

    let config = match ASSET_CONFIGS.may_load(storage, asset)? {
        Some(config) => config,
        None => return Ok(stored),
    };

    let capped_now = now.min(distribution_end);
    let elapsed = capped_now.saturating_sub(config.last_update_timestamp);
    let increment = math::index_increment(config.emission_per_second, elapsed, total_staked)?;
    let projected_index = config.index.checked_add(increment)?;

    let user_index = USER_ASSET_INDICES
        .may_load(storage, (user, asset))?
        .unwrap_or_default();
    let pending = math::accrued_rewards(balance, projected_index.checked_sub(user_index)?)?;

    Ok(stored.checked_add(pending)?)
}
