use cosmwasm_std::{Addr, Event, Order, StdError, StdResult, Storage, Uint128};
use cw_storage_plus::Bound;
use sha2::{Digest, Sha256};
use staked_common::types::PowerType;

use crate::state::{DELEGATES, POWER_CHECKPOINTS, SHARE_BALANCES};

/// The delegatee a holder's power currently flows to. Defaults to self.
pub fn delegatee_of(storage: &dyn Storage, holder: &Addr, power_type: &PowerType) -> StdResult<Addr> {
    Ok(DELEGATES
        .may_load(storage, (holder, power_type.index()))?
        .unwrap_or_else(|| holder.clone()))
}

fn latest_checkpoint(
    storage: &dyn Storage,
    account: &Addr,
    power_type: &PowerType,
) -> StdResult<Option<Uint128>> {
    POWER_CHECKPOINTS
        .prefix((account, power_type.index()))
        .range(storage, None, None, Order::Descending)
        .next()
        .transpose()
        .map(|entry| entry.map(|(_, power)| power))
}

/// Base value for power movements. Accounts touched by any balance change
/// have checkpoints; anyone else starts from zero.
fn checkpointed_power(
    storage: &dyn Storage,
    account: &Addr,
    power_type: &PowerType,
) -> StdResult<Uint128> {
    Ok(latest_checkpoint(storage, account, power_type)?.unwrap_or_default())
}

/// Current power: latest checkpoint, or the raw share balance for accounts
/// that never delegated nor received delegation.
pub fn power_current(
    storage: &dyn Storage,
    account: &Addr,
    power_type: &PowerType,
) -> StdResult<Uint128> {
    match latest_checkpoint(storage, account, power_type)? {
        Some(power) => Ok(power),
        None => Ok(SHARE_BALANCES
            .may_load(storage, account)?
            .unwrap_or_default()),
    }
}

/// Power at a historical block: the latest checkpoint at or before `block`.
///
/// Zero when the account's history starts after `block`; raw share balance
/// when there is no history at all. The caller is responsible for rejecting
/// future blocks.
pub fn power_at_block(
    storage: &dyn Storage,
    account: &Addr,
    power_type: &PowerType,
    block: u64,
) -> StdResult<Uint128> {
    let found = POWER_CHECKPOINTS
        .prefix((account, power_type.index()))
        .range(
            storage,
            None,
            Some(Bound::inclusive(block)),
            Order::Descending,
        )
        .next()
        .transpose()?;
    if let Some((_, power)) = found {
        return Ok(power);
    }

    let has_history = POWER_CHECKPOINTS
        .prefix((account, power_type.index()))
        .range(storage, None, None, Order::Ascending)
        .next()
        .is_some();
    if has_history {
        Ok(Uint128::zero())
    } else {
        Ok(SHARE_BALANCES
            .may_load(storage, account)?
            .unwrap_or_default())
    }
}

fn write_checkpoint(
    storage: &mut dyn Storage,
    account: &Addr,
    power_type: &PowerType,
    block: u64,
    power: Uint128,
    events: &mut Vec<Event>,
) -> StdResult<()> {
    POWER_CHECKPOINTS.save(storage, (account, power_type.index(), block), &power)?;
    events.push(
        Event::new("stk_delegated_power_changed")
            .add_attribute("user", account.to_string())
            .add_attribute("power_type", power_type.as_str())
            .add_attribute("power", power.to_string())
            .add_attribute("block", block.to_string()),
    );
    Ok(())
}

/// Move `amount` of delegated power between two accounts, checkpointing only
/// the accounts whose power actually changed.
pub fn move_delegated_power(
    storage: &mut dyn Storage,
    block: u64,
    from: Option<&Addr>,
    to: Option<&Addr>,
    amount: Uint128,
    power_type: &PowerType,
    events: &mut Vec<Event>,
) -> StdResult<()> {
    if amount.is_zero() {
        return Ok(());
    }
    if let (Some(from), Some(to)) = (from, to) {
        if from == to {
            return Ok(());
        }
    }

    if let Some(from) = from {
        let previous = checkpointed_power(storage, from, power_type)?;
        let next = previous.checked_sub(amount).map_err(StdError::overflow)?;
        write_checkpoint(storage, from, power_type, block, next, events)?;
    }
    if let Some(to) = to {
        let previous = checkpointed_power(storage, to, power_type)?;
        let next = previous.checked_add(amount).map_err(StdError::overflow)?;
        write_checkpoint(storage, to, power_type, block, next, events)?;
    }
    Ok(())
}

/// Route a share-balance change through both power types, following each
/// mover's current delegatee. `None` stands for mint/burn.
pub fn apply_balance_change(
    storage: &mut dyn Storage,
    block: u64,
    sender: Option<&Addr>,
    recipient: Option<&Addr>,
    amount: Uint128,
    events: &mut Vec<Event>,
) -> StdResult<()> {
    for power_type in PowerType::ALL.iter() {
        let from = sender
            .map(|holder| delegatee_of(storage, holder, power_type))
            .transpose()?;
        let to = recipient
            .map(|holder| delegatee_of(storage, holder, power_type))
            .transpose()?;
        move_delegated_power(
            storage,
            block,
            from.as_ref(),
            to.as_ref(),
            amount,
            power_type,
            events,
        )?;
    }
    Ok(())
}

/// Re-point one power type of `delegator` at `delegatee`, moving the
/// delegator's own balance between the old and new delegatees. Single-hop:
/// power received from others stays where it is.
pub fn change_delegatee(
    storage: &mut dyn Storage,
    block: u64,
    delegator: &Addr,
    delegatee: &Addr,
    power_type: &PowerType,
    events: &mut Vec<Event>,
) -> StdResult<()> {
    let previous = delegatee_of(storage, delegator, power_type)?;
    if previous != *delegatee {
        let own_balance = SHARE_BALANCES
            .may_load(storage, delegator)?
            .unwrap_or_default();
        move_delegated_power(
            storage,
            block,
            Some(&previous),
            Some(delegatee),
            own_balance,
            power_type,
            events,
        )?;
    }
    DELEGATES.save(storage, (delegator, power_type.index()), delegatee)?;
    events.push(
        Event::new("stk_delegate_changed")
            .add_attribute("delegator", delegator.to_string())
            .add_attribute("delegatee", delegatee.to_string())
            .add_attribute("power_type", power_type.as_str()),
    );
    Ok(())
}

/// Canonical digest for delegation by signature. Variable-length fields are
/// length-prefixed; the contract address is the domain separator.
pub fn delegation_digest(
    contract: &Addr,
    signer: &Addr,
    delegatee: &str,
    power_type: Option<&PowerType>,
    nonce: u64,
    expiry: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"staked_token_delegation");
    for field in [contract.as_str(), signer.as_str(), delegatee] {
        hasher.update((field.len() as u32).to_be_bytes());
        hasher.update(field.as_bytes());
    }
    // 0xff tags the both-types variant
    hasher.update([power_type.map(|p| p.index()).unwrap_or(0xff)]);
    hasher.update(nonce.to_be_bytes());
    hasher.update(expiry.to_be_bytes());
    hasher.finalize().into()
}
