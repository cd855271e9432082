use cosmwasm_std::{
    coins, Addr, BankMsg, Binary, DepsMut, Env, Event, MessageInfo, Response, StdError, Storage,
    Uint128, Uint256,
};
use staked_common::math;
use staked_common::types::{PowerType, Role};

use crate::cooldown::{self, CooldownStatus};
use crate::distribution;
use crate::error::ContractError;
use crate::msg::AssetConfigUpdate;
use crate::power;
use crate::state::{
    AssetConfig, Config, RoleAdmins, ASSET_CONFIGS, CONFIG, COOLDOWNS, COOLDOWN_PAUSED,
    EMERGENCY_SHUTDOWN, EXCHANGE_RATE, NONCES, POOL_BALANCE, ROLE_ADMINS, SHARE_BALANCES,
    SIGNING_KEYS, TOTAL_SHARES, USER_UNCLAIMED_REWARDS,
};

struct RedeemOutcome {
    shares: Uint128,
    underlying: Uint128,
}

/// Trivial success under emergency shutdown. Callers detect the halt from
/// post-state, not from an error.
fn halted_response(action: &str) -> Response {
    Response::new()
        .add_attribute("action", action)
        .add_attribute("halted", "true")
}

fn ensure_role(
    storage: &dyn Storage,
    role: &Role,
    caller: &Addr,
    err: ContractError,
) -> Result<(), ContractError> {
    let admins = ROLE_ADMINS.load(storage, role.key())?;
    if admins.current != *caller {
        return Err(err);
    }
    Ok(())
}

fn validated_delegatee(deps: &DepsMut, delegatee: &str) -> Result<Addr, ContractError> {
    if delegatee.is_empty() {
        return Err(ContractError::InvalidDelegatee);
    }
    deps.api
        .addr_validate(delegatee)
        .map_err(|_| ContractError::InvalidDelegatee)
}

fn asset_index_event(asset: &Addr, index: Uint256) -> Event {
    Event::new("stk_asset_index_updated")
        .add_attribute("asset", asset.to_string())
        .add_attribute("index", index.to_string())
}

/// Settle the engine's own staked asset for the given holders, using
/// pre-mutation balances and total. Must run before any balance change.
fn accrue_engine_users(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    users: &[(&Addr, Uint128)],
    total_staked: Uint128,
    events: &mut Vec<Event>,
) -> Result<(), ContractError> {
    let asset = &env.contract.address;
    let accrual = distribution::accrue_asset(
        storage,
        asset,
        total_staked,
        env.block.time.seconds(),
        config.distribution_end,
    )?;
    if accrual.changed {
        events.push(asset_index_event(asset, accrual.index));
    }
    for (user, balance) in users {
        let settled = distribution::accrue_user(storage, user, asset, *balance, accrual.index)?;
        if !settled.rewards.is_zero() {
            events.push(
                Event::new("stk_rewards_accrued")
                    .add_attribute("user", user.to_string())
                    .add_attribute("amount", settled.rewards.to_string()),
            );
        }
        if settled.index_changed {
            events.push(
                Event::new("stk_user_index_updated")
                    .add_attribute("user", user.to_string())
                    .add_attribute("asset", asset.to_string())
                    .add_attribute("index", accrual.index.to_string()),
            );
        }
    }
    Ok(())
}

/// Mint shares for `recipient`: weighted cooldown update, balance and pool
/// bookkeeping, power checkpoints. Accrual must already have run.
fn mint_shares(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    recipient: &Addr,
    underlying: Uint128,
    shares: Uint128,
    events: &mut Vec<Event>,
) -> Result<(), ContractError> {
    let prior_balance = SHARE_BALANCES
        .may_load(storage, recipient)?
        .unwrap_or_default();
    let activated_at = COOLDOWNS.may_load(storage, recipient)?.unwrap_or(0);
    let next_cooldown = cooldown::stake_cooldown_timestamp(
        shares,
        prior_balance,
        activated_at,
        env.block.time.seconds(),
        config.cooldown_seconds,
        config.unstake_window,
    )?;
    if next_cooldown != activated_at {
        COOLDOWNS.save(storage, recipient, &next_cooldown)?;
    }

    SHARE_BALANCES.save(
        storage,
        recipient,
        &prior_balance.checked_add(shares).map_err(StdError::overflow)?,
    )?;
    let total = TOTAL_SHARES.load(storage)?;
    TOTAL_SHARES.save(storage, &total.checked_add(shares).map_err(StdError::overflow)?)?;
    let pool = POOL_BALANCE.load(storage)?;
    POOL_BALANCE.save(
        storage,
        &pool.checked_add(underlying).map_err(StdError::overflow)?,
    )?;

    power::apply_balance_change(
        storage,
        env.block.height,
        None,
        Some(recipient),
        shares,
        events,
    )?;
    Ok(())
}

/// Burn shares for `holder` after the cooldown gate, paying bookkeeping for
/// balances, pool, cooldown reset and power. Returns what to transfer out.
fn redeem_shares(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    holder: &Addr,
    amount: Uint128,
    events: &mut Vec<Event>,
) -> Result<RedeemOutcome, ContractError> {
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }

    let now = env.block.time.seconds();
    let activated_at = COOLDOWNS.may_load(storage, holder)?.unwrap_or(0);
    if !COOLDOWN_PAUSED.load(storage)? {
        match cooldown::status(
            activated_at,
            now,
            config.cooldown_seconds,
            config.unstake_window,
        ) {
            CooldownStatus::Redeemable => {}
            CooldownStatus::CoolingDown => {
                return Err(ContractError::InsufficientCooldown {
                    ready_at: activated_at + config.cooldown_seconds,
                })
            }
            CooldownStatus::Inactive | CooldownStatus::Expired => {
                return Err(ContractError::UnstakeWindowFinished)
            }
        }
    }

    let balance = SHARE_BALANCES.may_load(storage, holder)?.unwrap_or_default();
    let shares = amount.min(balance);
    if shares.is_zero() {
        return Err(ContractError::InvalidAmount);
    }

    let total_shares = TOTAL_SHARES.load(storage)?;
    accrue_engine_users(storage, env, config, &[(holder, balance)], total_shares, events)?;

    let rate = EXCHANGE_RATE.load(storage)?;
    let underlying = math::amount_for_shares(shares, rate)?;

    let remaining = balance.checked_sub(shares).map_err(StdError::overflow)?;
    SHARE_BALANCES.save(storage, holder, &remaining)?;
    TOTAL_SHARES.save(
        storage,
        &total_shares.checked_sub(shares).map_err(StdError::overflow)?,
    )?;
    let pool = POOL_BALANCE.load(storage)?;
    POOL_BALANCE.save(
        storage,
        &pool.checked_sub(underlying).map_err(StdError::overflow)?,
    )?;

    if remaining.is_zero() && activated_at != 0 {
        COOLDOWNS.save(storage, holder, &0u64)?;
    }

    power::apply_balance_change(storage, env.block.height, Some(holder), None, shares, events)?;

    events.push(
        Event::new("stk_redeem")
            .add_attribute("holder", holder.to_string())
            .add_attribute("shares", shares.to_string())
            .add_attribute("underlying", underlying.to_string())
            .add_attribute("exchange_rate", rate.to_string()),
    );
    Ok(RedeemOutcome { shares, underlying })
}

/// Settle accrual and deduct the clamped claim from the holder's unclaimed
/// rewards. Returns zero without touching state when nothing is claimable.
fn claim_accrued(
    storage: &mut dyn Storage,
    env: &Env,
    config: &Config,
    holder: &Addr,
    amount: Uint128,
    events: &mut Vec<Event>,
) -> Result<Uint128, ContractError> {
    let balance = SHARE_BALANCES.may_load(storage, holder)?.unwrap_or_default();
    let total_shares = TOTAL_SHARES.load(storage)?;
    let claimable = distribution::pending_rewards(
        storage,
        holder,
        &env.contract.address,
        balance,
        total_shares,
        env.block.time.seconds(),
        config.distribution_end,
    )?;
    let claimed = amount.min(claimable);
    if claimed.is_zero() {
        return Ok(Uint128::zero());
    }

    accrue_engine_users(storage, env, config, &[(holder, balance)], total_shares, events)?;
    let unclaimed = USER_UNCLAIMED_REWARDS
        .may_load(storage, holder)?
        .unwrap_or_default();
    USER_UNCLAIMED_REWARDS.save(
        storage,
        holder,
        &unclaimed.checked_sub(claimed).map_err(StdError::overflow)?,
    )?;
    Ok(claimed)
}

/// Stake the underlying denom and mint shares at the current exchange rate.
pub fn stake(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    on_behalf_of: Option<String>,
) -> Result<Response, ContractError> {
    if EMERGENCY_SHUTDOWN.load(deps.storage)? {
        return Ok(halted_response("stake"));
    }
    let config = CONFIG.load(deps.storage)?;

    if info.funds.is_empty() {
        return Err(ContractError::NoFundsSent);
    }
    if info.funds.len() != 1 {
        return Err(ContractError::InvalidFunds);
    }
    let sent = &info.funds[0];
    if sent.denom != config.underlying_denom {
        return Err(ContractError::WrongDenom {
            expected: config.underlying_denom.clone(),
            denom: sent.denom.clone(),
        });
    }
    let amount = sent.amount;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }

    let recipient = match on_behalf_of {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => info.sender.clone(),
    };

    let rate = EXCHANGE_RATE.load(deps.storage)?;
    let shares = math::shares_for_amount(amount, rate)?;
    if shares.is_zero() {
        return Err(ContractError::InvalidAmount);
    }

    let total_shares = TOTAL_SHARES.load(deps.storage)?;
    let balance = SHARE_BALANCES
        .may_load(deps.storage, &recipient)?
        .unwrap_or_default();

    let mut events = vec![];
    accrue_engine_users(
        deps.storage,
        &env,
        &config,
        &[(&recipient, balance)],
        total_shares,
        &mut events,
    )?;
    mint_shares(
        deps.storage,
        &env,
        &config,
        &recipient,
        amount,
        shares,
        &mut events,
    )?;

    events.push(
        Event::new("stk_stake")
            .add_attribute("staker", info.sender.to_string())
            .add_attribute("on_behalf_of", recipient.to_string())
            .add_attribute("amount", amount.to_string())
            .add_attribute("shares", shares.to_string())
            .add_attribute("exchange_rate", rate.to_string()),
    );

    Ok(Response::new()
        .add_attribute("action", "stake")
        .add_attribute("user", recipient.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("shares", shares.to_string())
        .add_events(events))
}

/// Redeem the caller's shares. `Uint128::MAX` redeems everything.
pub fn redeem(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    to: Option<String>,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if EMERGENCY_SHUTDOWN.load(deps.storage)? {
        return Ok(halted_response("redeem"));
    }
    let config = CONFIG.load(deps.storage)?;
    let to_addr = match to {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => info.sender.clone(),
    };

    let mut events = vec![];
    let outcome = redeem_shares(deps.storage, &env, &config, &info.sender, amount, &mut events)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: to_addr.to_string(),
            amount: coins(outcome.underlying.u128(), &config.underlying_denom),
        })
        .add_attribute("action", "redeem")
        .add_attribute("holder", info.sender.to_string())
        .add_attribute("shares", outcome.shares.to_string())
        .add_attribute("underlying", outcome.underlying.to_string())
        .add_events(events))
}

/// Redeem for another holder. Claim helper only.
pub fn redeem_on_behalf(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    from: String,
    to: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if EMERGENCY_SHUTDOWN.load(deps.storage)? {
        return Ok(halted_response("redeem_on_behalf"));
    }
    ensure_role(
        deps.storage,
        &Role::ClaimHelper,
        &info.sender,
        ContractError::CallerNotClaimHelper,
    )?;
    let config = CONFIG.load(deps.storage)?;
    let holder = deps.api.addr_validate(&from)?;
    let to_addr = deps.api.addr_validate(&to)?;

    let mut events = vec![];
    let outcome = redeem_shares(deps.storage, &env, &config, &holder, amount, &mut events)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: to_addr.to_string(),
            amount: coins(outcome.underlying.u128(), &config.underlying_denom),
        })
        .add_attribute("action", "redeem_on_behalf")
        .add_attribute("holder", holder.to_string())
        .add_attribute("shares", outcome.shares.to_string())
        .add_attribute("underlying", outcome.underlying.to_string())
        .add_events(events))
}

/// Start (or restart) the caller's cooldown clock.
pub fn activate_cooldown(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let balance = SHARE_BALANCES
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    if balance.is_zero() {
        return Err(ContractError::InvalidBalance);
    }
    let now = env.block.time.seconds();
    COOLDOWNS.save(deps.storage, &info.sender, &now)?;

    Ok(Response::new()
        .add_attribute("action", "cooldown")
        .add_attribute("user", info.sender.to_string())
        .add_event(
            Event::new("stk_cooldown_activated")
                .add_attribute("user", info.sender.to_string())
                .add_attribute("timestamp", now.to_string()),
        ))
}

fn claim_to(
    deps: DepsMut,
    env: Env,
    holder: Addr,
    to_addr: Addr,
    amount: Uint128,
    action: &str,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut events = vec![];
    let claimed = claim_accrued(deps.storage, &env, &config, &holder, amount, &mut events)?;
    if claimed.is_zero() {
        // nothing claimable: no state change, no events
        return Ok(Response::new()
            .add_attribute("action", action)
            .add_attribute("claimed", "0"));
    }

    events.push(
        Event::new("stk_rewards_claimed")
            .add_attribute("user", holder.to_string())
            .add_attribute("to", to_addr.to_string())
            .add_attribute("amount", claimed.to_string()),
    );

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: to_addr.to_string(),
            amount: coins(claimed.u128(), &config.reward_denom),
        })
        .add_attribute("action", action)
        .add_attribute("claimed", claimed.to_string())
        .add_events(events))
}

/// Pay out accrued rewards, clamped to the caller's unclaimed balance.
pub fn claim_rewards(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    to: Option<String>,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if EMERGENCY_SHUTDOWN.load(deps.storage)? {
        return Ok(halted_response("claim_rewards"));
    }
    let to_addr = match to {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => info.sender.clone(),
    };
    claim_to(deps, env, info.sender, to_addr, amount, "claim_rewards")
}

/// Claim for another holder. Claim helper only.
pub fn claim_rewards_on_behalf(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    from: String,
    to: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if EMERGENCY_SHUTDOWN.load(deps.storage)? {
        return Ok(halted_response("claim_rewards_on_behalf"));
    }
    ensure_role(
        deps.storage,
        &Role::ClaimHelper,
        &info.sender,
        ContractError::CallerNotClaimHelper,
    )?;
    let holder = deps.api.addr_validate(&from)?;
    let to_addr = deps.api.addr_validate(&to)?;
    claim_to(deps, env, holder, to_addr, amount, "claim_rewards_on_behalf")
}

fn claim_and_stake_for(
    deps: DepsMut,
    env: Env,
    holder: Addr,
    amount: Uint128,
    action: &str,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut events = vec![];
    let claimed = claim_accrued(deps.storage, &env, &config, &holder, amount, &mut events)?;
    if claimed.is_zero() {
        return Ok(Response::new()
            .add_attribute("action", action)
            .add_attribute("claimed", "0"));
    }

    // restaked rewards earn the configured premium over a plain claim
    let staked = math::apply_premium(claimed, config.claim_stake_premium_bps);
    let rate = EXCHANGE_RATE.load(deps.storage)?;
    let shares = math::shares_for_amount(staked, rate)?;
    mint_shares(
        deps.storage,
        &env,
        &config,
        &holder,
        staked,
        shares,
        &mut events,
    )?;

    events.push(
        Event::new("stk_rewards_restaked")
            .add_attribute("user", holder.to_string())
            .add_attribute("claimed", claimed.to_string())
            .add_attribute("staked", staked.to_string())
            .add_attribute("shares", shares.to_string()),
    );

    Ok(Response::new()
        .add_attribute("action", action)
        .add_attribute("claimed", claimed.to_string())
        .add_attribute("staked", staked.to_string())
        .add_events(events))
}

/// Claim and restake the rewards (plus premium) instead of paying them out.
pub fn claim_rewards_and_stake(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if EMERGENCY_SHUTDOWN.load(deps.storage)? {
        return Ok(halted_response("claim_rewards_and_stake"));
    }
    claim_and_stake_for(deps, env, info.sender, amount, "claim_rewards_and_stake")
}

/// Claim helper only.
pub fn claim_rewards_and_stake_on_behalf(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    from: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    if EMERGENCY_SHUTDOWN.load(deps.storage)? {
        return Ok(halted_response("claim_rewards_and_stake_on_behalf"));
    }
    ensure_role(
        deps.storage,
        &Role::ClaimHelper,
        &info.sender,
        ContractError::CallerNotClaimHelper,
    )?;
    let holder = deps.api.addr_validate(&from)?;
    claim_and_stake_for(deps, env, holder, amount, "claim_rewards_and_stake_on_behalf")
}

fn claim_and_redeem_for(
    deps: DepsMut,
    env: Env,
    holder: Addr,
    to_addr: Addr,
    claim_amount: Uint128,
    redeem_amount: Uint128,
    action: &str,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut events = vec![];
    let claimed = claim_accrued(
        deps.storage,
        &env,
        &config,
        &holder,
        claim_amount,
        &mut events,
    )?;
    let outcome = redeem_shares(
        deps.storage,
        &env,
        &config,
        &holder,
        redeem_amount,
        &mut events,
    )?;

    let mut response = Response::new();
    if !claimed.is_zero() {
        events.push(
            Event::new("stk_rewards_claimed")
                .add_attribute("user", holder.to_string())
                .add_attribute("to", to_addr.to_string())
                .add_attribute("amount", claimed.to_string()),
        );
        response = response.add_message(BankMsg::Send {
            to_address: to_addr.to_string(),
            amount: coins(claimed.u128(), &config.reward_denom),
        });
    }

    Ok(response
        .add_message(BankMsg::Send {
            to_address: to_addr.to_string(),
            amount: coins(outcome.underlying.u128(), &config.underlying_denom),
        })
        .add_attribute("action", action)
        .add_attribute("claimed", claimed.to_string())
        .add_attribute("shares", outcome.shares.to_string())
        .add_attribute("underlying", outcome.underlying.to_string())
        .add_events(events))
}

/// Claim rewards and redeem shares in one atomic call.
pub fn claim_rewards_and_redeem(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    to: Option<String>,
    claim_amount: Uint128,
    redeem_amount: Uint128,
) -> Result<Response, ContractError> {
    if EMERGENCY_SHUTDOWN.load(deps.storage)? {
        return Ok(halted_response("claim_rewards_and_redeem"));
    }
    let to_addr = match to {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => info.sender.clone(),
    };
    claim_and_redeem_for(
        deps,
        env,
        info.sender,
        to_addr,
        claim_amount,
        redeem_amount,
        "claim_rewards_and_redeem",
    )
}

/// Claim helper only.
pub fn claim_rewards_and_redeem_on_behalf(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    from: String,
    to: String,
    claim_amount: Uint128,
    redeem_amount: Uint128,
) -> Result<Response, ContractError> {
    if EMERGENCY_SHUTDOWN.load(deps.storage)? {
        return Ok(halted_response("claim_rewards_and_redeem_on_behalf"));
    }
    ensure_role(
        deps.storage,
        &Role::ClaimHelper,
        &info.sender,
        ContractError::CallerNotClaimHelper,
    )?;
    let holder = deps.api.addr_validate(&from)?;
    let to_addr = deps.api.addr_validate(&to)?;
    claim_and_redeem_for(
        deps,
        env,
        holder,
        to_addr,
        claim_amount,
        redeem_amount,
        "claim_rewards_and_redeem_on_behalf",
    )
}

/// Move shares between holders, with cooldown and power bookkeeping.
pub fn transfer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }
    let recipient = deps.api.addr_validate(&recipient)?;

    let sender_balance = SHARE_BALANCES
        .may_load(deps.storage, &info.sender)?
        .unwrap_or_default();
    if sender_balance < amount {
        return Err(ContractError::InsufficientShares {
            available: sender_balance,
            requested: amount,
        });
    }

    let total_shares = TOTAL_SHARES.load(deps.storage)?;
    let mut events = vec![];

    if recipient == info.sender {
        // nothing moves; still settle rewards for the holder
        accrue_engine_users(
            deps.storage,
            &env,
            &config,
            &[(&info.sender, sender_balance)],
            total_shares,
            &mut events,
        )?;
        return Ok(Response::new()
            .add_attribute("action", "transfer")
            .add_attribute("from", info.sender.to_string())
            .add_attribute("to", recipient.to_string())
            .add_attribute("shares", amount.to_string())
            .add_events(events));
    }

    let recipient_balance = SHARE_BALANCES
        .may_load(deps.storage, &recipient)?
        .unwrap_or_default();
    accrue_engine_users(
        deps.storage,
        &env,
        &config,
        &[(&info.sender, sender_balance), (&recipient, recipient_balance)],
        total_shares,
        &mut events,
    )?;

    let now = env.block.time.seconds();
    let sender_cooldown = COOLDOWNS
        .may_load(deps.storage, &info.sender)?
        .unwrap_or(0);
    let recipient_cooldown = COOLDOWNS.may_load(deps.storage, &recipient)?.unwrap_or(0);
    let next_recipient_cooldown = cooldown::receiver_cooldown_timestamp(
        amount,
        sender_cooldown,
        recipient_balance,
        recipient_cooldown,
        now,
        config.cooldown_seconds,
        config.unstake_window,
    )?;
    if next_recipient_cooldown != recipient_cooldown {
        COOLDOWNS.save(deps.storage, &recipient, &next_recipient_cooldown)?;
    }

    let remaining = sender_balance.checked_sub(amount).map_err(StdError::overflow)?;
    SHARE_BALANCES.save(deps.storage, &info.sender, &remaining)?;
    SHARE_BALANCES.save(
        deps.storage,
        &recipient,
        &recipient_balance.checked_add(amount).map_err(StdError::overflow)?,
    )?;

    // a full exit cancels the sender's cooldown
    if remaining.is_zero() && sender_cooldown != 0 {
        COOLDOWNS.save(deps.storage, &info.sender, &0u64)?;
    }

    power::apply_balance_change(
        deps.storage,
        env.block.height,
        Some(&info.sender),
        Some(&recipient),
        amount,
        &mut events,
    )?;

    events.push(
        Event::new("stk_transfer")
            .add_attribute("from", info.sender.to_string())
            .add_attribute("to", recipient.to_string())
            .add_attribute("shares", amount.to_string()),
    );

    Ok(Response::new()
        .add_attribute("action", "transfer")
        .add_attribute("from", info.sender.to_string())
        .add_attribute("to", recipient.to_string())
        .add_attribute("shares", amount.to_string())
        .add_events(events))
}

/// Socialize a loss: send underlying out and dilute the exchange rate by
/// the exact ratio the pool lost. Slashing admin only.
pub fn slash(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    destination: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    ensure_role(
        deps.storage,
        &Role::SlashingAdmin,
        &info.sender,
        ContractError::CallerNotSlashingAdmin,
    )?;
    let config = CONFIG.load(deps.storage)?;
    let destination = deps.api.addr_validate(&destination)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount);
    }

    let pool = POOL_BALANCE.load(deps.storage)?;
    let max = math::bps_share(pool, config.max_slashable_bps);
    if amount > max {
        return Err(ContractError::InvalidSlashAmount {
            requested: amount,
            max,
        });
    }
    let remaining = pool.checked_sub(amount).map_err(StdError::overflow)?;
    if remaining.is_zero() {
        return Err(ContractError::InvalidSlashAmount {
            requested: amount,
            max,
        });
    }

    let rate = EXCHANGE_RATE.load(deps.storage)?;
    let new_rate = math::scale_rate(rate, remaining, pool)?;
    EXCHANGE_RATE.save(deps.storage, &new_rate)?;
    POOL_BALANCE.save(deps.storage, &remaining)?;

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: destination.to_string(),
            amount: coins(amount.u128(), &config.underlying_denom),
        })
        .add_attribute("action", "slash")
        .add_attribute("destination", destination.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("stk_slashed")
                .add_attribute("destination", destination.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("exchange_rate", new_rate.to_string()),
        ))
}

/// Slashing admin only.
pub fn set_max_slashable_percentage(
    deps: DepsMut,
    info: MessageInfo,
    bps: u16,
) -> Result<Response, ContractError> {
    ensure_role(
        deps.storage,
        &Role::SlashingAdmin,
        &info.sender,
        ContractError::CallerNotSlashingAdmin,
    )?;
    if bps > 10_000 {
        return Err(ContractError::InvalidPercentage { bps });
    }
    let mut config = CONFIG.load(deps.storage)?;
    config.max_slashable_bps = bps;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "set_max_slashable_percentage")
        .add_attribute("bps", bps.to_string())
        .add_event(
            Event::new("stk_max_slashable_updated").add_attribute("bps", bps.to_string()),
        ))
}

/// Cooldown admin only.
pub fn set_emergency_shutdown(
    deps: DepsMut,
    info: MessageInfo,
    active: bool,
) -> Result<Response, ContractError> {
    ensure_role(
        deps.storage,
        &Role::CooldownAdmin,
        &info.sender,
        ContractError::CallerNotCooldownAdmin,
    )?;
    EMERGENCY_SHUTDOWN.save(deps.storage, &active)?;

    Ok(Response::new()
        .add_attribute("action", "set_emergency_shutdown")
        .add_attribute("active", active.to_string())
        .add_event(
            Event::new("stk_emergency_shutdown").add_attribute("active", active.to_string()),
        ))
}

/// Cooldown admin only.
pub fn set_cooldown_pause(
    deps: DepsMut,
    info: MessageInfo,
    paused: bool,
) -> Result<Response, ContractError> {
    ensure_role(
        deps.storage,
        &Role::CooldownAdmin,
        &info.sender,
        ContractError::CallerNotCooldownAdmin,
    )?;
    COOLDOWN_PAUSED.save(deps.storage, &paused)?;

    Ok(Response::new()
        .add_attribute("action", "set_cooldown_pause")
        .add_attribute("paused", paused.to_string())
        .add_event(Event::new("stk_cooldown_pause").add_attribute("paused", paused.to_string())))
}

/// Update emission configuration, settling each asset's index with the old
/// emission rate first. Emission manager only.
pub fn configure_assets(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    updates: Vec<AssetConfigUpdate>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.emission_manager {
        return Err(ContractError::Unauthorized {
            reason: "only the emission manager can configure assets".to_string(),
        });
    }

    let now = env.block.time.seconds();
    let mut events = vec![];
    for update in updates {
        let asset = deps.api.addr_validate(&update.asset)?;
        let accrual = distribution::accrue_asset(
            deps.storage,
            &asset,
            update.total_staked,
            now,
            config.distribution_end,
        )?;
        if accrual.changed {
            events.push(asset_index_event(&asset, accrual.index));
        }

        let mut asset_config = ASSET_CONFIGS
            .may_load(deps.storage, &asset)?
            .unwrap_or(AssetConfig {
                emission_per_second: Uint128::zero(),
                index: Uint256::zero(),
                last_update_timestamp: now,
            });
        asset_config.emission_per_second = update.emission_per_second;
        ASSET_CONFIGS.save(deps.storage, &asset, &asset_config)?;

        events.push(
            Event::new("stk_asset_config_updated")
                .add_attribute("asset", asset.to_string())
                .add_attribute("emission_per_second", update.emission_per_second.to_string())
                .add_attribute("index", asset_config.index.to_string()),
        );
    }

    Ok(Response::new()
        .add_attribute("action", "configure_assets")
        .add_events(events))
}

/// Propose a new holder for a role. Current holder only.
pub fn set_pending_admin(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    candidate: String,
) -> Result<Response, ContractError> {
    let mut admins = ROLE_ADMINS.load(deps.storage, role.key())?;
    if admins.current != info.sender {
        return Err(ContractError::CallerNotRoleAdmin {
            role: role.key().to_string(),
        });
    }
    let candidate = deps.api.addr_validate(&candidate)?;
    admins.pending = Some(candidate.clone());
    ROLE_ADMINS.save(deps.storage, role.key(), &admins)?;

    Ok(Response::new()
        .add_attribute("action", "set_pending_admin")
        .add_attribute("role", role.key())
        .add_attribute("candidate", candidate.to_string())
        .add_event(
            Event::new("stk_role_pending")
                .add_attribute("role", role.key())
                .add_attribute("candidate", candidate.to_string()),
        ))
}

/// Promote the pending holder of a role. Pending candidate only.
pub fn claim_role_admin(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
) -> Result<Response, ContractError> {
    let admins = ROLE_ADMINS.load(deps.storage, role.key())?;
    match admins.pending {
        Some(pending) if pending == info.sender => {
            ROLE_ADMINS.save(
                deps.storage,
                role.key(),
                &RoleAdmins {
                    current: pending.clone(),
                    pending: None,
                },
            )?;
            Ok(Response::new()
                .add_attribute("action", "claim_role_admin")
                .add_attribute("role", role.key())
                .add_attribute("admin", pending.to_string())
                .add_event(
                    Event::new("stk_role_claimed")
                        .add_attribute("role", role.key())
                        .add_attribute("admin", pending.to_string()),
                ))
        }
        _ => Err(ContractError::CallerNotPendingRoleAdmin {
            role: role.key().to_string(),
        }),
    }
}

/// Re-point one power type of the caller.
pub fn delegate_by_type(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    delegatee: String,
    power_type: PowerType,
) -> Result<Response, ContractError> {
    let delegatee = validated_delegatee(&deps, &delegatee)?;
    let mut events = vec![];
    power::change_delegatee(
        deps.storage,
        env.block.height,
        &info.sender,
        &delegatee,
        &power_type,
        &mut events,
    )?;

    Ok(Response::new()
        .add_attribute("action", "delegate_by_type")
        .add_attribute("delegator", info.sender.to_string())
        .add_attribute("delegatee", delegatee.to_string())
        .add_attribute("power_type", power_type.as_str())
        .add_events(events))
}

/// Re-point both power types of the caller atomically.
pub fn delegate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    delegatee: String,
) -> Result<Response, ContractError> {
    let delegatee = validated_delegatee(&deps, &delegatee)?;
    let mut events = vec![];
    for power_type in PowerType::ALL.iter() {
        power::change_delegatee(
            deps.storage,
            env.block.height,
            &info.sender,
            &delegatee,
            power_type,
            &mut events,
        )?;
    }

    Ok(Response::new()
        .add_attribute("action", "delegate")
        .add_attribute("delegator", info.sender.to_string())
        .add_attribute("delegatee", delegatee.to_string())
        .add_events(events))
}

/// Delegate on behalf of `signer`, authorized by the signer's registered
/// ed25519 key over the canonical digest. `power_type: None` re-points both
/// power types with a single nonce.
#[allow(clippy::too_many_arguments)]
pub fn delegate_by_sig(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    signer: String,
    delegatee: String,
    power_type: Option<PowerType>,
    nonce: u64,
    expiry: u64,
    signature: Binary,
) -> Result<Response, ContractError> {
    let signer_addr = deps.api.addr_validate(&signer)?;
    let delegatee_addr = validated_delegatee(&deps, &delegatee)?;

    if expiry < env.block.time.seconds() {
        return Err(ContractError::InvalidExpiration);
    }
    let expected = NONCES
        .may_load(deps.storage, &signer_addr)?
        .unwrap_or_default();
    if nonce != expected {
        return Err(ContractError::InvalidNonce { expected });
    }
    let key = SIGNING_KEYS
        .may_load(deps.storage, &signer_addr)?
        .ok_or(ContractError::InvalidSignature)?;

    let digest = power::delegation_digest(
        &env.contract.address,
        &signer_addr,
        &delegatee,
        power_type.as_ref(),
        nonce,
        expiry,
    );
    let valid = deps
        .api
        .ed25519_verify(&digest, signature.as_slice(), key.as_slice())
        .map_err(|_| ContractError::InvalidSignature)?;
    if !valid {
        return Err(ContractError::InvalidSignature);
    }
    NONCES.save(deps.storage, &signer_addr, &(nonce + 1))?;

    let mut events = vec![];
    match &power_type {
        Some(power_type) => power::change_delegatee(
            deps.storage,
            env.block.height,
            &signer_addr,
            &delegatee_addr,
            power_type,
            &mut events,
        )?,
        None => {
            for power_type in PowerType::ALL.iter() {
                power::change_delegatee(
                    deps.storage,
                    env.block.height,
                    &signer_addr,
                    &delegatee_addr,
                    power_type,
                    &mut events,
                )?;
            }
        }
    }

    Ok(Response::new()
        .add_attribute("action", "delegate_by_sig")
        .add_attribute("signer", signer_addr.to_string())
        .add_attribute("delegatee", delegatee_addr.to_string())
        .add_events(events))
}

/// Bind the caller's ed25519 verification key for delegation by signature.
pub fn register_signing_key(
    deps: DepsMut,
    info: MessageInfo,
    public_key: Binary,
) -> Result<Response, ContractError> {
    if public_key.len() != 32 {
        return Err(ContractError::InvalidSigningKey);
    }
    SIGNING_KEYS.save(deps.storage, &info.sender, &public_key)?;

    Ok(Response::new()
        .add_attribute("action", "register_signing_key")
        .add_attribute("account", info.sender.to_string())
        .add_event(
            Event::new("stk_signing_key_registered")
                .add_attribute("account", info.sender.to_string())
                .add_attribute("public_key", hex::encode(public_key.as_slice())),
        ))
}
