use cosmwasm_std::{to_json_binary, Binary, Deps, StdResult, Uint128};

use crate::msg::{AllClaimableRewardsResponse, EngineClaimEntry, EngineQueryMsg, RewardsResponse};
use crate::state::CONFIG;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

/// Per-engine claimable breakdown for a user, plus the total.
pub fn query_all_claimable_rewards(deps: Deps, user: String) -> StdResult<Binary> {
    deps.api.addr_validate(&user)?;
    let config = CONFIG.load(deps.storage)?;

    let mut entries = vec![];
    let mut total = Uint128::zero();
    for engine in &config.engines {
        let claimable: RewardsResponse = deps.querier.query_wasm_smart(
            engine.clone(),
            &EngineQueryMsg::RewardsBalance {
                address: user.clone(),
            },
        )?;
        total += claimable.amount;
        entries.push(EngineClaimEntry {
            engine: engine.clone(),
            amount: claimable.amount,
        });
    }

    to_json_binary(&AllClaimableRewardsResponse { entries, total })
}
