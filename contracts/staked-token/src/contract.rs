use cosmwasm_std::{entry_point, Binary, Decimal, Deps, DepsMut, Env, MessageInfo, Response, Uint128};
use cw2::set_contract_version;
use staked_common::types::Role;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::query;
use crate::state::{
    Config, RoleAdmins, CONFIG, COOLDOWN_PAUSED, EMERGENCY_SHUTDOWN, EXCHANGE_RATE, POOL_BALANCE,
    ROLE_ADMINS, TOTAL_SHARES,
};

const CONTRACT_NAME: &str = "crates.io:staked-token";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.max_slashable_bps > 10_000 {
        return Err(ContractError::InvalidPercentage {
            bps: msg.max_slashable_bps,
        });
    }

    let config = Config {
        underlying_denom: msg.underlying_denom,
        reward_denom: msg.reward_denom,
        emission_manager: deps.api.addr_validate(&msg.emission_manager)?,
        cooldown_seconds: msg.cooldown_seconds,
        unstake_window: msg.unstake_window,
        distribution_end: env.block.time.seconds() + msg.distribution_duration,
        claim_stake_premium_bps: msg.claim_stake_premium_bps,
        max_slashable_bps: msg.max_slashable_bps,
    };
    CONFIG.save(deps.storage, &config)?;

    EXCHANGE_RATE.save(deps.storage, &Decimal::one())?;
    POOL_BALANCE.save(deps.storage, &Uint128::zero())?;
    TOTAL_SHARES.save(deps.storage, &Uint128::zero())?;
    EMERGENCY_SHUTDOWN.save(deps.storage, &false)?;
    COOLDOWN_PAUSED.save(deps.storage, &false)?;

    for (role, holder) in [
        (Role::SlashingAdmin, &msg.slashing_admin),
        (Role::CooldownAdmin, &msg.cooldown_admin),
        (Role::ClaimHelper, &msg.claim_helper),
    ] {
        ROLE_ADMINS.save(
            deps.storage,
            role.key(),
            &RoleAdmins {
                current: deps.api.addr_validate(holder)?,
                pending: None,
            },
        )?;
    }

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "staked-token")
        .add_attribute("distribution_end", config.distribution_end.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Stake { on_behalf_of } => execute::stake(deps, env, info, on_behalf_of),
        ExecuteMsg::Redeem { to, amount } => execute::redeem(deps, env, info, to, amount),
        ExecuteMsg::RedeemOnBehalf { from, to, amount } => {
            execute::redeem_on_behalf(deps, env, info, from, to, amount)
        }
        ExecuteMsg::Cooldown {} => execute::activate_cooldown(deps, env, info),
        ExecuteMsg::ClaimRewards { to, amount } => {
            execute::claim_rewards(deps, env, info, to, amount)
        }
        ExecuteMsg::ClaimRewardsOnBehalf { from, to, amount } => {
            execute::claim_rewards_on_behalf(deps, env, info, from, to, amount)
        }
        ExecuteMsg::ClaimRewardsAndStake { amount } => {
            execute::claim_rewards_and_stake(deps, env, info, amount)
        }
        ExecuteMsg::ClaimRewardsAndStakeOnBehalf { from, amount } => {
            execute::claim_rewards_and_stake_on_behalf(deps, env, info, from, amount)
        }
        ExecuteMsg::ClaimRewardsAndRedeem {
            to,
            claim_amount,
            redeem_amount,
        } => execute::claim_rewards_and_redeem(deps, env, info, to, claim_amount, redeem_amount),
        ExecuteMsg::ClaimRewardsAndRedeemOnBehalf {
            from,
            to,
            claim_amount,
            redeem_amount,
        } => execute::claim_rewards_and_redeem_on_behalf(
            deps,
            env,
            info,
            from,
            to,
            claim_amount,
            redeem_amount,
        ),
        ExecuteMsg::Transfer { recipient, amount } => {
            execute::transfer(deps, env, info, recipient, amount)
        }
        ExecuteMsg::Slash {
            destination,
            amount,
        } => execute::slash(deps, env, info, destination, amount),
        ExecuteMsg::SetMaxSlashablePercentage { bps } => {
            execute::set_max_slashable_percentage(deps, info, bps)
        }
        ExecuteMsg::SetEmergencyShutdown { active } => {
            execute::set_emergency_shutdown(deps, info, active)
        }
        ExecuteMsg::SetCooldownPause { paused } => execute::set_cooldown_pause(deps, info, paused),
        ExecuteMsg::ConfigureAssets { updates } => {
            execute::configure_assets(deps, env, info, updates)
        }
        ExecuteMsg::SetPendingAdmin { role, candidate } => {
            execute::set_pending_admin(deps, info, role, candidate)
        }
        ExecuteMsg::ClaimRoleAdmin { role } => execute::claim_role_admin(deps, info, role),
        ExecuteMsg::DelegateByType {
            delegatee,
            power_type,
        } => execute::delegate_by_type(deps, env, info, delegatee, power_type),
        ExecuteMsg::Delegate { delegatee } => execute::delegate(deps, env, info, delegatee),
        ExecuteMsg::DelegateByTypeBySig {
            signer,
            delegatee,
            power_type,
            nonce,
            expiry,
            signature,
        } => execute::delegate_by_sig(
            deps,
            env,
            info,
            signer,
            delegatee,
            Some(power_type),
            nonce,
            expiry,
            signature,
        ),
        ExecuteMsg::DelegateBySig {
            signer,
            delegatee,
            nonce,
            expiry,
            signature,
        } => execute::delegate_by_sig(
            deps, env, info, signer, delegatee, None, nonce, expiry, signature,
        ),
        ExecuteMsg::RegisterSigningKey { public_key } => {
            execute::register_signing_key(deps, info, public_key)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Config {} => Ok(query::query_config(deps)?),
        QueryMsg::ExchangeRate {} => Ok(query::query_exchange_rate(deps)?),
        QueryMsg::AssetConfig { asset } => Ok(query::query_asset_config(deps, asset)?),
        QueryMsg::StakerInfo { address } => Ok(query::query_staker_info(deps, env, address)?),
        QueryMsg::UnclaimedRewards { address } => {
            Ok(query::query_unclaimed_rewards(deps, address)?)
        }
        QueryMsg::RewardsBalance { address } => {
            Ok(query::query_rewards_balance(deps, env, address)?)
        }
        QueryMsg::PowerCurrent {
            address,
            power_type,
        } => Ok(query::query_power_current(deps, address, power_type)?),
        QueryMsg::PowerAtBlock {
            address,
            block,
            power_type,
        } => query::query_power_at_block(deps, env, address, block, power_type),
        QueryMsg::Delegatee {
            address,
            power_type,
        } => Ok(query::query_delegatee(deps, address, power_type)?),
        QueryMsg::Nonce { address } => Ok(query::query_nonce(deps, address)?),
        QueryMsg::RoleAdmin { role } => Ok(query::query_role_admin(deps, role)?),
    }
}
