use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Uint128};
use staked_common::math;

/// Observable cooldown state derived from the activation timestamp.
///
/// `Expired` is functionally identical to `Inactive` for permission checks;
/// the stale timestamp stays observable until overwritten.
#[cw_serde]
pub enum CooldownStatus {
    Inactive,
    CoolingDown,
    Redeemable,
    Expired,
}

/// Derive the cooldown state at `now`.
pub fn status(activated_at: u64, now: u64, cooldown_seconds: u64, unstake_window: u64) -> CooldownStatus {
    if activated_at == 0 {
        return CooldownStatus::Inactive;
    }
    let redeemable_from = activated_at + cooldown_seconds;
    if now < redeemable_from {
        CooldownStatus::CoolingDown
    } else if now < redeemable_from + unstake_window {
        CooldownStatus::Redeemable
    } else {
        CooldownStatus::Expired
    }
}

/// Cooldown timestamp after the holder adds `added_shares` to an existing
/// position at `now`.
///
/// An in-progress cooldown is softened toward `now` in proportion to the new
/// stake; an inactive or expired cooldown is left untouched (staking never
/// starts one implicitly).
pub fn stake_cooldown_timestamp(
    added_shares: Uint128,
    prior_balance: Uint128,
    activated_at: u64,
    now: u64,
    cooldown_seconds: u64,
    unstake_window: u64,
) -> StdResult<u64> {
    match status(activated_at, now, cooldown_seconds, unstake_window) {
        CooldownStatus::CoolingDown | CooldownStatus::Redeemable => {
            math::weighted_timestamp(added_shares, now, prior_balance, activated_at)
        }
        CooldownStatus::Inactive | CooldownStatus::Expired => Ok(activated_at),
    }
}

/// Cooldown timestamp for the receiver of a share transfer.
///
/// A receiver with no balance inherits the sender's timestamp exactly. A
/// receiver with a live cooldown gets the weighted average with the sender's
/// timestamp, unless the sender's cooldown is expired (or was never started)
/// relative to `now`, in which case the stale clock resets the receiver to 0.
/// A receiver holding shares without an active cooldown stays at 0.
pub fn receiver_cooldown_timestamp(
    transferred_shares: Uint128,
    sender_activated_at: u64,
    receiver_balance: Uint128,
    receiver_activated_at: u64,
    now: u64,
    cooldown_seconds: u64,
    unstake_window: u64,
) -> StdResult<u64> {
    if receiver_balance.is_zero() {
        return Ok(sender_activated_at);
    }
    if receiver_activated_at == 0 {
        return Ok(0);
    }
    match status(sender_activated_at, now, cooldown_seconds, unstake_window) {
        CooldownStatus::Inactive | CooldownStatus::Expired => Ok(0),
        CooldownStatus::CoolingDown | CooldownStatus::Redeemable => math::weighted_timestamp(
            transferred_shares,
            sender_activated_at,
            receiver_balance,
            receiver_activated_at,
        ),
    }
}
