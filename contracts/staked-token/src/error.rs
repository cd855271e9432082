use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("amount must resolve to more than zero")]
    InvalidAmount,

    #[error("no funds sent with stake")]
    NoFundsSent,

    #[error("must send exactly one coin")]
    InvalidFunds,

    #[error("must send {expected} denom, got {denom}")]
    WrongDenom { expected: String, denom: String },

    #[error("cannot activate cooldown with zero staked balance")]
    InvalidBalance,

    #[error("cooldown not finished (redeemable at {ready_at})")]
    InsufficientCooldown { ready_at: u64 },

    #[error("unstake window finished or cooldown never activated")]
    UnstakeWindowFinished,

    #[error("slash amount {requested} exceeds maximum slashable {max}")]
    InvalidSlashAmount { requested: Uint128, max: Uint128 },

    #[error("invalid percentage: {bps} basis points (must be <= 10000)")]
    InvalidPercentage { bps: u16 },

    #[error("caller is not the {role} admin")]
    CallerNotRoleAdmin { role: String },

    #[error("caller is not the pending {role} admin")]
    CallerNotPendingRoleAdmin { role: String },

    #[error("caller does not hold the claim helper role")]
    CallerNotClaimHelper,

    #[error("caller does not hold the slashing admin role")]
    CallerNotSlashingAdmin,

    #[error("caller does not hold the cooldown admin role")]
    CallerNotCooldownAdmin,

    #[error("invalid delegation signature")]
    InvalidSignature,

    #[error("signing key must be 32 bytes (ed25519)")]
    InvalidSigningKey,

    #[error("invalid nonce (expected {expected})")]
    InvalidNonce { expected: u64 },

    #[error("signature expired")]
    InvalidExpiration,

    #[error("invalid delegatee")]
    InvalidDelegatee,

    #[error("invalid block number: {block} is beyond current block {current}")]
    InvalidBlockNumber { block: u64, current: u64 },

    #[error("insufficient shares: {available} available, {requested} requested")]
    InsufficientShares {
        available: Uint128,
        requested: Uint128,
    },
}
