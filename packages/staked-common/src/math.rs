use cosmwasm_std::{Decimal, StdError, StdResult, Uint128, Uint256};

/// 10^18 — the fixed-point scaling factor shared by reward indices and the
/// exchange rate (`Decimal` atomics use the same scale).
pub const SCALE: Uint128 = Uint128::new(1_000_000_000_000_000_000u128);

#[inline]
fn scale_u256() -> Uint256 {
    Uint256::from(SCALE)
}

fn to_uint128(value: Uint256) -> StdResult<Uint128> {
    Uint128::try_from(value).map_err(|_| StdError::generic_err("value does not fit in 128 bits"))
}

/// Reward-index growth for one accrual step:
/// `emission_per_second * elapsed * SCALE / total_staked`, truncating.
///
/// Zero when nothing is staked, no time passed, or emission is off.
/// Intermediates are 256-bit so the product never overflows for any pair
/// of 128-bit operands.
pub fn index_increment(
    emission_per_second: Uint128,
    elapsed_seconds: u64,
    total_staked: Uint128,
) -> StdResult<Uint256> {
    if total_staked.is_zero() || elapsed_seconds == 0 || emission_per_second.is_zero() {
        return Ok(Uint256::zero());
    }
    let emitted = Uint256::from(emission_per_second)
        .checked_mul(Uint256::from(elapsed_seconds))
        .map_err(StdError::overflow)?;
    let scaled = emitted
        .checked_mul(scale_u256())
        .map_err(StdError::overflow)?;
    scaled
        .checked_div(Uint256::from(total_staked))
        .map_err(StdError::divide_by_zero)
}

/// Rewards owed for a balance across an index delta:
/// `balance * index_delta / SCALE`, truncating.
pub fn accrued_rewards(balance: Uint128, index_delta: Uint256) -> StdResult<Uint128> {
    let raw = Uint256::from(balance)
        .checked_mul(index_delta)
        .map_err(StdError::overflow)?
        .checked_div(scale_u256())
        .map_err(StdError::divide_by_zero)?;
    to_uint128(raw)
}

/// Shares minted for an underlying deposit: `amount * SCALE / rate_atomics`.
pub fn shares_for_amount(amount: Uint128, exchange_rate: Decimal) -> StdResult<Uint128> {
    let raw = Uint256::from(amount)
        .checked_mul(scale_u256())
        .map_err(StdError::overflow)?
        .checked_div(Uint256::from(exchange_rate.atomics()))
        .map_err(StdError::divide_by_zero)?;
    to_uint128(raw)
}

/// Underlying returned for burned shares: `shares * rate_atomics / SCALE`.
pub fn amount_for_shares(shares: Uint128, exchange_rate: Decimal) -> StdResult<Uint128> {
    let raw = Uint256::from(shares)
        .checked_mul(Uint256::from(exchange_rate.atomics()))
        .map_err(StdError::overflow)?
        .checked_div(scale_u256())
        .map_err(StdError::divide_by_zero)?;
    to_uint128(raw)
}

/// Slash dilution: `rate * remaining / pool`. The ratio the pool lost is
/// exactly the ratio every share loses.
pub fn scale_rate(rate: Decimal, remaining: Uint128, pool: Uint128) -> StdResult<Decimal> {
    let scaled = Uint256::from(rate.atomics())
        .checked_mul(Uint256::from(remaining))
        .map_err(StdError::overflow)?
        .checked_div(Uint256::from(pool))
        .map_err(StdError::divide_by_zero)?;
    Ok(Decimal::new(to_uint128(scaled)?))
}

/// Balance-weighted average of two cooldown timestamps:
/// `(added * added_ts + prior * prior_ts) / (added + prior)`, truncating.
pub fn weighted_timestamp(
    added_amount: Uint128,
    added_ts: u64,
    prior_balance: Uint128,
    prior_ts: u64,
) -> StdResult<u64> {
    let total = added_amount
        .checked_add(prior_balance)
        .map_err(StdError::overflow)?;
    if total.is_zero() {
        return Ok(0);
    }
    let added_part = Uint256::from(added_amount)
        .checked_mul(Uint256::from(added_ts))
        .map_err(StdError::overflow)?;
    let prior_part = Uint256::from(prior_balance)
        .checked_mul(Uint256::from(prior_ts))
        .map_err(StdError::overflow)?;
    let weighted = added_part
        .checked_add(prior_part)
        .map_err(StdError::overflow)?
        .checked_div(Uint256::from(total))
        .map_err(StdError::divide_by_zero)?;
    let averaged = to_uint128(weighted)?;
    u64::try_from(averaged.u128())
        .map_err(|_| StdError::generic_err("timestamp does not fit in u64"))
}

/// `amount * bps / 10000`, truncating.
pub fn bps_share(amount: Uint128, bps: u16) -> Uint128 {
    amount.multiply_ratio(bps as u128, 10_000u128)
}

/// `amount * (10000 + premium_bps) / 10000`, truncating.
pub fn apply_premium(amount: Uint128, premium_bps: u16) -> Uint128 {
    amount.multiply_ratio(10_000u128 + premium_bps as u128, 10_000u128)
}
