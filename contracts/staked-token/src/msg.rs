use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Decimal, Uint128};
use staked_common::types::{PowerType, Role};

use crate::cooldown::CooldownStatus;
use crate::state::{AssetConfig, Config};

#[cw_serde]
pub struct InstantiateMsg {
    pub underlying_denom: String,
    pub reward_denom: String,
    pub emission_manager: String,
    pub cooldown_seconds: u64,
    pub unstake_window: u64,
    /// Emission runs from instantiation until `now + distribution_duration`.
    pub distribution_duration: u64,
    /// Bonus in basis points for claim-and-stake (2000 = +20%).
    pub claim_stake_premium_bps: u16,
    /// Upper bound for a single slash, in basis points of the pool.
    pub max_slashable_bps: u16,
    pub slashing_admin: String,
    pub cooldown_admin: String,
    pub claim_helper: String,
}

#[cw_serde]
pub struct AssetConfigUpdate {
    pub asset: String,
    pub emission_per_second: Uint128,
    /// Total currently staked in the asset; the distribution manager does
    /// not track supply itself.
    pub total_staked: Uint128,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Stake the underlying denom (send it in info.funds) and mint shares.
    Stake { on_behalf_of: Option<String> },
    /// Redeem shares for underlying. `Uint128::MAX` redeems everything.
    Redeem { to: Option<String>, amount: Uint128 },
    /// Redeem for another holder. Claim helper only.
    RedeemOnBehalf {
        from: String,
        to: String,
        amount: Uint128,
    },
    /// Start (or restart) the caller's cooldown.
    Cooldown {},
    /// Pay out accrued rewards, clamped to the unclaimed balance.
    ClaimRewards { to: Option<String>, amount: Uint128 },
    /// Claim for another holder. Claim helper only.
    ClaimRewardsOnBehalf {
        from: String,
        to: String,
        amount: Uint128,
    },
    /// Claim and restake the rewards (plus the configured premium) instead
    /// of paying them out.
    ClaimRewardsAndStake { amount: Uint128 },
    /// Claim helper only.
    ClaimRewardsAndStakeOnBehalf { from: String, amount: Uint128 },
    /// Claim rewards and redeem shares in one call.
    ClaimRewardsAndRedeem {
        to: Option<String>,
        claim_amount: Uint128,
        redeem_amount: Uint128,
    },
    /// Claim helper only.
    ClaimRewardsAndRedeemOnBehalf {
        from: String,
        to: String,
        claim_amount: Uint128,
        redeem_amount: Uint128,
    },
    /// Move shares between holders, with cooldown and power bookkeeping.
    Transfer { recipient: String, amount: Uint128 },
    /// Socialize a loss: send underlying out and dilute the exchange rate.
    /// Slashing admin only.
    Slash {
        destination: String,
        amount: Uint128,
    },
    /// Slashing admin only.
    SetMaxSlashablePercentage { bps: u16 },
    /// Cooldown admin only.
    SetEmergencyShutdown { active: bool },
    /// Cooldown admin only.
    SetCooldownPause { paused: bool },
    /// Update emission configuration. Emission manager only.
    ConfigureAssets { updates: Vec<AssetConfigUpdate> },
    /// Propose a new holder for a role. Current holder only.
    SetPendingAdmin { role: Role, candidate: String },
    /// Promote the pending holder. Pending candidate only.
    ClaimRoleAdmin { role: Role },
    /// Delegate one power type. Delegating to self stops delegating.
    DelegateByType {
        delegatee: String,
        power_type: PowerType,
    },
    /// Delegate both power types atomically.
    Delegate { delegatee: String },
    /// Delegate one power type on behalf of `signer`, authorized by the
    /// signer's registered key.
    DelegateByTypeBySig {
        signer: String,
        delegatee: String,
        power_type: PowerType,
        nonce: u64,
        expiry: u64,
        signature: Binary,
    },
    /// Delegate both power types on behalf of `signer`.
    DelegateBySig {
        signer: String,
        delegatee: String,
        nonce: u64,
        expiry: u64,
        signature: Binary,
    },
    /// Bind the caller's ed25519 verification key for the by-signature
    /// delegation flow.
    RegisterSigningKey { public_key: Binary },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(ExchangeRateResponse)]
    ExchangeRate {},
    #[returns(AssetConfig)]
    AssetConfig { asset: String },
    #[returns(StakerInfoResponse)]
    StakerInfo { address: String },
    /// Stored unclaimed rewards only.
    #[returns(RewardsResponse)]
    UnclaimedRewards { address: String },
    /// Stored unclaimed rewards plus the not-yet-checkpointed accrual.
    #[returns(RewardsResponse)]
    RewardsBalance { address: String },
    #[returns(PowerResponse)]
    PowerCurrent {
        address: String,
        power_type: PowerType,
    },
    #[returns(PowerResponse)]
    PowerAtBlock {
        address: String,
        block: u64,
        power_type: PowerType,
    },
    #[returns(DelegateeResponse)]
    Delegatee {
        address: String,
        power_type: PowerType,
    },
    #[returns(NonceResponse)]
    Nonce { address: String },
    #[returns(RoleAdminResponse)]
    RoleAdmin { role: Role },
}

#[cw_serde]
pub struct ExchangeRateResponse {
    pub rate: Decimal,
    pub pool_balance: Uint128,
    pub total_shares: Uint128,
}

#[cw_serde]
pub struct StakerInfoResponse {
    pub address: String,
    pub shares: Uint128,
    pub cooldown_activated_at: u64,
    pub cooldown_status: CooldownStatus,
}

#[cw_serde]
pub struct RewardsResponse {
    pub amount: Uint128,
}

#[cw_serde]
pub struct PowerResponse {
    pub power: Uint128,
}

#[cw_serde]
pub struct DelegateeResponse {
    pub delegatee: Addr,
}

#[cw_serde]
pub struct NonceResponse {
    pub nonce: u64,
}

#[cw_serde]
pub struct RoleAdminResponse {
    pub current: Addr,
    pub pending: Option<Addr>,
}
