use cosmwasm_std::{to_json_binary, Binary, Deps, Env, StdResult};
use staked_common::types::{PowerType, Role};

use crate::cooldown;
use crate::distribution;
use crate::error::ContractError;
use crate::msg::{
    DelegateeResponse, ExchangeRateResponse, NonceResponse, PowerResponse, RewardsResponse,
    RoleAdminResponse, StakerInfoResponse,
};
use crate::power;
use crate::state::{
    ASSET_CONFIGS, CONFIG, COOLDOWNS, EXCHANGE_RATE, NONCES, POOL_BALANCE, ROLE_ADMINS,
    SHARE_BALANCES, TOTAL_SHARES, USER_UNCLAIMED_REWARDS,
};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_exchange_rate(deps: Deps) -> StdResult<Binary> {
    let rate = EXCHANGE_RATE.load(deps.storage)?;
    let pool_balance = POOL_BALANCE.load(deps.storage)?;
    let total_shares = TOTAL_SHARES.load(deps.storage)?;

    to_json_binary(&ExchangeRateResponse {
        rate,
        pool_balance,
        total_shares,
    })
}

pub fn query_asset_config(deps: Deps, asset: String) -> StdResult<Binary> {
    let asset = deps.api.addr_validate(&asset)?;
    let config = ASSET_CONFIGS.load(deps.storage, &asset)?;
    to_json_binary(&config)
}

pub fn query_staker_info(deps: Deps, env: Env, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let config = CONFIG.load(deps.storage)?;
    let shares = SHARE_BALANCES
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    let cooldown_activated_at = COOLDOWNS.may_load(deps.storage, &addr)?.unwrap_or(0);
    let cooldown_status = cooldown::status(
        cooldown_activated_at,
        env.block.time.seconds(),
        config.cooldown_seconds,
        config.unstake_window,
    );

    to_json_binary(&StakerInfoResponse {
        address,
        shares,
        cooldown_activated_at,
        cooldown_status,
    })
}

/// The stored unclaimed accumulator only.
pub fn query_unclaimed_rewards(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let amount = USER_UNCLAIMED_REWARDS
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    to_json_binary(&RewardsResponse { amount })
}

/// Stored unclaimed rewards plus the accrual a claim right now would settle.
pub fn query_rewards_balance(deps: Deps, env: Env, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let config = CONFIG.load(deps.storage)?;
    let balance = SHARE_BALANCES
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    let total_shares = TOTAL_SHARES.load(deps.storage)?;
    let amount = distribution::pending_rewards(
        deps.storage,
        &addr,
        &env.contract.address,
        balance,
        total_shares,
        env.block.time.seconds(),
        config.distribution_end,
    )?;
    to_json_binary(&RewardsResponse { amount })
}

pub fn query_power_current(
    deps: Deps,
    address: String,
    power_type: PowerType,
) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let power = power::power_current(deps.storage, &addr, &power_type)?;
    to_json_binary(&PowerResponse { power })
}

pub fn query_power_at_block(
    deps: Deps,
    env: Env,
    address: String,
    block: u64,
    power_type: PowerType,
) -> Result<Binary, ContractError> {
    if block > env.block.height {
        return Err(ContractError::InvalidBlockNumber {
            block,
            current: env.block.height,
        });
    }
    let addr = deps.api.addr_validate(&address)?;
    let power = power::power_at_block(deps.storage, &addr, &power_type, block)?;
    Ok(to_json_binary(&PowerResponse { power })?)
}

pub fn query_delegatee(deps: Deps, address: String, power_type: PowerType) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let delegatee = power::delegatee_of(deps.storage, &addr, &power_type)?;
    to_json_binary(&DelegateeResponse { delegatee })
}

pub fn query_nonce(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let nonce = NONCES.may_load(deps.storage, &addr)?.unwrap_or_default();
    to_json_binary(&NonceResponse { nonce })
}

pub fn query_role_admin(deps: Deps, role: Role) -> StdResult<Binary> {
    let admins = ROLE_ADMINS.load(deps.storage, role.key())?;
    to_json_binary(&RoleAdminResponse {
        current: admins.current,
        pending: admins.pending,
    })
}
