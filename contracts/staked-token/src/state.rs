use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Binary, Decimal, Uint128, Uint256};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<Config> = Item::new("config");

/// Share/underlying ratio, 18-decimal fixed point. Starts at 1.0 and only
/// ever decreases, via slashing.
pub const EXCHANGE_RATE: Item<Decimal> = Item::new("xrate");
/// Underlying units backing the staked pool.
pub const POOL_BALANCE: Item<Uint128> = Item::new("pool_balance");
pub const TOTAL_SHARES: Item<Uint128> = Item::new("total_shares");
pub const SHARE_BALANCES: Map<&Addr, Uint128> = Map::new("share_balances");

/// Circuit breaker: while set, stake/redeem/claim succeed as no-ops.
pub const EMERGENCY_SHUTDOWN: Item<bool> = Item::new("shutdown");
/// While set, redemption skips the cooldown state machine entirely.
pub const COOLDOWN_PAUSED: Item<bool> = Item::new("cooldown_paused");
/// Cooldown activation timestamp per staker. 0 means no active cooldown.
pub const COOLDOWNS: Map<&Addr, u64> = Map::new("cooldowns");

pub const ASSET_CONFIGS: Map<&Addr, AssetConfig> = Map::new("asset_configs");
/// (user, asset) -> reward index at the user's last accrual.
pub const USER_ASSET_INDICES: Map<(&Addr, &Addr), Uint256> = Map::new("user_asset_indices");
pub const USER_UNCLAIMED_REWARDS: Map<&Addr, Uint128> = Map::new("user_unclaimed_rewards");

/// Role key -> current/pending holders (two-phase handshake).
pub const ROLE_ADMINS: Map<&str, RoleAdmins> = Map::new("role_admins");

/// (holder, power type) -> delegatee. Absent means self-delegated.
pub const DELEGATES: Map<(&Addr, u8), Addr> = Map::new("delegates");
/// (account, power type, block height) -> delegated-in power at that block.
/// Append-only; historical queries take the latest entry at or before a block.
pub const POWER_CHECKPOINTS: Map<(&Addr, u8, u64), Uint128> = Map::new("power_checkpoints");
/// Strictly incrementing per-signer nonce for delegation by signature.
pub const NONCES: Map<&Addr, u64> = Map::new("nonces");
/// Registered ed25519 verification key per account (32 bytes).
pub const SIGNING_KEYS: Map<&Addr, Binary> = Map::new("signing_keys");

#[cw_serde]
pub struct Config {
    /// Denom accepted by `stake` and paid out by `redeem` and `slash`.
    pub underlying_denom: String,
    /// Denom paid out by the claim operations.
    pub reward_denom: String,
    /// Only address allowed to call `configure_assets`.
    pub emission_manager: Addr,
    pub cooldown_seconds: u64,
    pub unstake_window: u64,
    /// Timestamp after which reward indices stop growing.
    pub distribution_end: u64,
    /// Bonus applied when claimed rewards are restaked instead of paid out
    /// (2000 = +20%).
    pub claim_stake_premium_bps: u16,
    /// Upper bound for a single slash, in basis points of the pool.
    pub max_slashable_bps: u16,
}

#[cw_serde]
pub struct AssetConfig {
    pub emission_per_second: Uint128,
    /// Monotonic 18-decimal reward accumulator.
    pub index: Uint256,
    pub last_update_timestamp: u64,
}

#[cw_serde]
pub struct RoleAdmins {
    pub current: Addr,
    pub pending: Option<Addr>,
}
