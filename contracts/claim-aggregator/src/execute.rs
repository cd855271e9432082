use cosmwasm_std::{to_json_binary, DepsMut, Env, Event, MessageInfo, Response, Uint128, WasmMsg};

use crate::error::ContractError;
use crate::msg::{EngineExecuteMsg, EngineQueryMsg, RewardsResponse};
use crate::state::CONFIG;

/// Fan a claim out across every configured engine for the caller, clamping
/// each claim to `max_amount_per_instance` and summing the total.
pub fn claim_all_rewards(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    max_amount_per_instance: Uint128,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let mut total = Uint128::zero();
    let mut messages = vec![];
    for engine in &config.engines {
        let claimable: RewardsResponse = deps.querier.query_wasm_smart(
            engine.clone(),
            &EngineQueryMsg::RewardsBalance {
                address: info.sender.to_string(),
            },
        )?;
        let amount = claimable.amount.min(max_amount_per_instance);
        // a zero result is valid and silent, never an error
        if amount.is_zero() {
            continue;
        }

        messages.push(WasmMsg::Execute {
            contract_addr: engine.to_string(),
            msg: to_json_binary(&EngineExecuteMsg::ClaimRewardsOnBehalf {
                from: info.sender.to_string(),
                to: info.sender.to_string(),
                amount,
            })?,
            funds: vec![],
        });
        total += amount;
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("action", "claim_all_rewards")
        .add_attribute("user", info.sender.to_string())
        .add_attribute("total_claimed", total.to_string())
        .add_event(
            Event::new("stk_claim_all")
                .add_attribute("user", info.sender.to_string())
                .add_attribute("engines", config.engines.len().to_string())
                .add_attribute("total_claimed", total.to_string()),
        ))
}
