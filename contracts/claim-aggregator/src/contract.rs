use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::query;
use crate::state::{AggregatorConfig, CONFIG};

const CONTRACT_NAME: &str = "crates.io:claim-aggregator";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.engines.is_empty() {
        return Err(ContractError::NoEngines);
    }
    let engines = msg
        .engines
        .iter()
        .map(|engine| deps.api.addr_validate(engine))
        .collect::<StdResult<Vec<_>>>()?;

    CONFIG.save(deps.storage, &AggregatorConfig { engines })?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "claim-aggregator")
        .add_attribute("engines", msg.engines.len().to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::ClaimAllRewards {
            max_amount_per_instance,
        } => execute::claim_all_rewards(deps, env, info, max_amount_per_instance),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::AllClaimableRewards { user } => query::query_all_claimable_rewards(deps, user),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::{AllClaimableRewardsResponse, EngineExecuteMsg, EngineQueryMsg, RewardsResponse};
    use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env};
    use cosmwasm_std::{
        from_json, to_json_binary, Addr, ContractResult, CosmosMsg, SystemError, SystemResult,
        Uint128, WasmMsg, WasmQuery,
    };

    /// Three engines with claimable balances 7, 13 and 0 for every user.
    fn setup_engines(
        deps: &mut cosmwasm_std::OwnedDeps<
            cosmwasm_std::MemoryStorage,
            cosmwasm_std::testing::MockApi,
            cosmwasm_std::testing::MockQuerier,
        >,
    ) -> (Addr, Addr, Addr) {
        let api = deps.api;
        let engine1 = api.addr_make("engine1");
        let engine2 = api.addr_make("engine2");
        let engine3 = api.addr_make("engine3");

        let msg = InstantiateMsg {
            engines: vec![
                engine1.to_string(),
                engine2.to_string(),
                engine3.to_string(),
            ],
        };
        let info = message_info(&api.addr_make("deployer"), &[]);
        instantiate(deps.as_mut(), mock_env(), info, msg).unwrap();

        let (e1, e2, e3) = (engine1.clone(), engine2.clone(), engine3.clone());
        deps.querier.update_wasm(move |request| match request {
            WasmQuery::Smart { contract_addr, msg } => {
                // every engine answers the same rewards-balance query shape
                let query: EngineQueryMsg = from_json(msg).unwrap();
                let EngineQueryMsg::RewardsBalance { .. } = query;
                let amount = if contract_addr == e1.as_str() {
                    Uint128::new(7)
                } else if contract_addr == e2.as_str() {
                    Uint128::new(13)
                } else if contract_addr == e3.as_str() {
                    Uint128::zero()
                } else {
                    return SystemResult::Err(SystemError::NoSuchContract {
                        addr: contract_addr.clone(),
                    });
                };
                SystemResult::Ok(ContractResult::Ok(
                    to_json_binary(&RewardsResponse { amount }).unwrap(),
                ))
            }
            _ => SystemResult::Err(SystemError::UnsupportedRequest {
                kind: "only smart queries are mocked".to_string(),
            }),
        });

        (engine1, engine2, engine3)
    }

    fn claim_message(msg: &CosmosMsg, expected_engine: &Addr, user: &Addr) -> Uint128 {
        match msg {
            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr,
                msg,
                funds,
            }) => {
                assert_eq!(contract_addr, expected_engine.as_str());
                assert!(funds.is_empty());
                match from_json(msg).unwrap() {
                    EngineExecuteMsg::ClaimRewardsOnBehalf { from, to, amount } => {
                        assert_eq!(from, user.to_string());
                        assert_eq!(to, user.to_string());
                        amount
                    }
                }
            }
            other => panic!("expected wasm execute, got {:?}", other),
        }
    }

    #[test]
    fn test_instantiate_requires_engines() {
        let mut deps = mock_dependencies();
        let info = message_info(&deps.api.addr_make("deployer"), &[]);
        let err = instantiate(
            deps.as_mut(),
            mock_env(),
            info,
            InstantiateMsg { engines: vec![] },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::NoEngines));
    }

    #[test]
    fn test_claim_all_rewards_sums_and_skips_zero() {
        let mut deps = mock_dependencies();
        let (engine1, engine2, _engine3) = setup_engines(&mut deps);
        let user = deps.api.addr_make("user");

        let res = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::ClaimAllRewards {
                max_amount_per_instance: Uint128::MAX,
            },
        )
        .unwrap();

        // the zero-balance engine is skipped, not an error
        assert_eq!(res.messages.len(), 2);
        assert_eq!(
            claim_message(&res.messages[0].msg, &engine1, &user),
            Uint128::new(7)
        );
        assert_eq!(
            claim_message(&res.messages[1].msg, &engine2, &user),
            Uint128::new(13)
        );
        assert!(res
            .attributes
            .iter()
            .any(|a| a.key == "total_claimed" && a.value == "20"));
    }

    #[test]
    fn test_claim_all_rewards_caps_per_instance() {
        let mut deps = mock_dependencies();
        let (engine1, engine2, _engine3) = setup_engines(&mut deps);
        let user = deps.api.addr_make("user");

        let res = execute(
            deps.as_mut(),
            mock_env(),
            message_info(&user, &[]),
            ExecuteMsg::ClaimAllRewards {
                max_amount_per_instance: Uint128::new(10),
            },
        )
        .unwrap();

        assert_eq!(res.messages.len(), 2);
        assert_eq!(
            claim_message(&res.messages[0].msg, &engine1, &user),
            Uint128::new(7)
        );
        assert_eq!(
            claim_message(&res.messages[1].msg, &engine2, &user),
            Uint128::new(10)
        );
        assert!(res
            .attributes
            .iter()
            .any(|a| a.key == "total_claimed" && a.value == "17"));
    }

    #[test]
    fn test_query_all_claimable_rewards() {
        let mut deps = mock_dependencies();
        let (engine1, _engine2, engine3) = setup_engines(&mut deps);
        let user = deps.api.addr_make("user");

        let bin = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::AllClaimableRewards {
                user: user.to_string(),
            },
        )
        .unwrap();
        let response: AllClaimableRewardsResponse = from_json(&bin).unwrap();

        assert_eq!(response.total, Uint128::new(20));
        assert_eq!(response.entries.len(), 3);
        assert_eq!(response.entries[0].engine, engine1);
        assert_eq!(response.entries[0].amount, Uint128::new(7));
        assert_eq!(response.entries[2].engine, engine3);
        assert_eq!(response.entries[2].amount, Uint128::zero());
    }
}
