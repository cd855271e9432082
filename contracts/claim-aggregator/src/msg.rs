use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

use crate::state::AggregatorConfig;

#[cw_serde]
pub struct InstantiateMsg {
    pub engines: Vec<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Claim up to `max_amount_per_instance` from every configured engine
    /// for the caller. Engines with nothing claimable are skipped silently.
    ClaimAllRewards { max_amount_per_instance: Uint128 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(AggregatorConfig)]
    Config {},
    #[returns(AllClaimableRewardsResponse)]
    AllClaimableRewards { user: String },
}

#[cw_serde]
pub struct EngineClaimEntry {
    pub engine: Addr,
    pub amount: Uint128,
}

#[cw_serde]
pub struct AllClaimableRewardsResponse {
    pub entries: Vec<EngineClaimEntry>,
    pub total: Uint128,
}

/// Mirror of the staked-token execute message the aggregator dispatches.
#[cw_serde]
pub enum EngineExecuteMsg {
    ClaimRewardsOnBehalf {
        from: String,
        to: String,
        amount: Uint128,
    },
}

/// Mirror of the staked-token query the aggregator fans out.
#[cw_serde]
pub enum EngineQueryMsg {
    RewardsBalance { address: String },
}

#[cw_serde]
pub struct RewardsResponse {
    pub amount: Uint128,
}
