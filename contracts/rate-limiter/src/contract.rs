//! IBC Rate Limiter - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Administrative message handlers
//! - `sudo` - Transfer lifecycle hooks called by the chain
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use common::{FlowType, RatePath};

use crate::engine::Transfer;
use crate::error::ContractError;
use crate::execute::{
    execute_add_rate_limit, execute_remove_rate_limit, execute_remove_whitelisted_address_pair,
    execute_reset_rate_limit, execute_set_whitelisted_address_pair, execute_update_params,
    execute_update_rate_limit, validate_admins,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, SudoMsg};
use crate::query::{
    query_flow_usage, query_is_whitelisted, query_params, query_rate_limit, query_rate_limits,
    query_rate_limits_by_channel, query_whitelisted_address_pairs,
};
use crate::state::{Params, Quota, CONTRACT_NAME, CONTRACT_VERSION, PARAMS};
use crate::sudo::{sudo_transfer_attempt, sudo_transfer_failed, sudo_transfer_finalized};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let gov_authority = deps
        .api
        .addr_validate(&msg.gov_authority)
        .map_err(|e| ContractError::InvalidAddress {
            reason: format!("invalid gov authority {}: {}", msg.gov_authority, e),
        })?;
    let admins = validate_admins(deps.api, &msg.admins)?;

    let params = Params {
        gov_authority,
        admins,
    };
    PARAMS.save(deps.storage, &params)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("gov_authority", params.gov_authority)
        .add_attribute("admin_count", params.admins.len().to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Rate limit management
        ExecuteMsg::AddRateLimit {
            denom,
            channel_id,
            max_percent_send,
            max_percent_recv,
            duration_hours,
        } => execute_add_rate_limit(
            deps,
            env,
            info,
            RatePath::new(denom, channel_id),
            Quota {
                max_percent_send,
                max_percent_recv,
                duration_hours,
            },
        ),
        ExecuteMsg::UpdateRateLimit {
            denom,
            channel_id,
            max_percent_send,
            max_percent_recv,
            duration_hours,
        } => execute_update_rate_limit(
            deps,
            info,
            RatePath::new(denom, channel_id),
            Quota {
                max_percent_send,
                max_percent_recv,
                duration_hours,
            },
        ),
        ExecuteMsg::RemoveRateLimit { denom, channel_id } => {
            execute_remove_rate_limit(deps, info, RatePath::new(denom, channel_id))
        }
        ExecuteMsg::ResetRateLimit { denom, channel_id } => {
            execute_reset_rate_limit(deps, env, info, RatePath::new(denom, channel_id))
        }

        // Whitelist management
        ExecuteMsg::SetWhitelistedAddressPair { sender, receiver } => {
            execute_set_whitelisted_address_pair(deps, info, sender, receiver)
        }
        ExecuteMsg::RemoveWhitelistedAddressPair { sender, receiver } => {
            execute_remove_whitelisted_address_pair(deps, info, sender, receiver)
        }

        // Params
        ExecuteMsg::UpdateParams { admins } => execute_update_params(deps, info, admins),
    }
}

// ============================================================================
// Sudo
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn sudo(deps: DepsMut, env: Env, msg: SudoMsg) -> Result<Response, ContractError> {
    match msg {
        SudoMsg::SendAttempt {
            denom,
            channel_id,
            sender,
            receiver,
            amount,
        } => sudo_transfer_attempt(
            deps,
            env,
            FlowType::Outflow,
            Transfer {
                denom: &denom,
                channel_id: &channel_id,
                sender: &sender,
                receiver: &receiver,
                amount,
            },
        ),
        SudoMsg::RecvAttempt {
            denom,
            channel_id,
            sender,
            receiver,
            amount,
        } => sudo_transfer_attempt(
            deps,
            env,
            FlowType::Inflow,
            Transfer {
                denom: &denom,
                channel_id: &channel_id,
                sender: &sender,
                receiver: &receiver,
                amount,
            },
        ),
        SudoMsg::TransferFailed {
            denom,
            channel_id,
            direction,
            amount,
            transfer_id,
        } => sudo_transfer_failed(deps, direction, denom, channel_id, amount, transfer_id),
        SudoMsg::TransferFinalized {
            denom,
            channel_id,
            direction,
            amount,
            transfer_id,
        } => sudo_transfer_finalized(direction, denom, channel_id, amount, transfer_id),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Params {} => to_json_binary(&query_params(deps)?),
        QueryMsg::RateLimit { denom, channel_id } => {
            to_json_binary(&query_rate_limit(deps, denom, channel_id)?)
        }
        QueryMsg::RateLimits { start_after, limit } => {
            to_json_binary(&query_rate_limits(deps, start_after, limit)?)
        }
        QueryMsg::RateLimitsByChannel { channel_id } => {
            to_json_binary(&query_rate_limits_by_channel(deps, channel_id)?)
        }
        QueryMsg::FlowUsage { denom, channel_id } => {
            to_json_binary(&query_flow_usage(deps, env, denom, channel_id)?)
        }
        QueryMsg::WhitelistedAddressPairs { start_after, limit } => {
            to_json_binary(&query_whitelisted_address_pairs(deps, start_after, limit)?)
        }
        QueryMsg::IsWhitelisted { sender, receiver } => {
            to_json_binary(&query_is_whitelisted(deps, sender, receiver)?)
        }
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::{mock_dependencies, mock_env, mock_info};
    use cosmwasm_std::{coins, from_json, Addr, Uint128};

    use crate::msg::{FlowUsageResponse, ParamsResponse, RateLimitResponse};

    const GOV: &str = "gov";
    const ADMIN: &str = "admin";

    fn setup() -> cosmwasm_std::OwnedDeps<
        cosmwasm_std::MemoryStorage,
        cosmwasm_std::testing::MockApi,
        cosmwasm_std::testing::MockQuerier,
    > {
        let mut deps = mock_dependencies();
        deps.querier.update_balance("holder", coins(1000, "uatom"));

        instantiate(
            deps.as_mut(),
            mock_env(),
            mock_info(GOV, &[]),
            InstantiateMsg {
                gov_authority: GOV.to_string(),
                admins: vec![ADMIN.to_string()],
            },
        )
        .unwrap();

        execute(
            deps.as_mut(),
            mock_env(),
            mock_info(ADMIN, &[]),
            ExecuteMsg::AddRateLimit {
                denom: "uatom".to_string(),
                channel_id: "channel-0".to_string(),
                max_percent_send: 10,
                max_percent_recv: 10,
                duration_hours: 24,
            },
        )
        .unwrap();

        deps
    }

    fn send_msg(amount: u128) -> SudoMsg {
        SudoMsg::SendAttempt {
            denom: "uatom".to_string(),
            channel_id: "channel-0".to_string(),
            sender: "sender".to_string(),
            receiver: "receiver".to_string(),
            amount: Uint128::new(amount),
        }
    }

    fn attr<'a>(res: &'a Response, key: &str) -> Option<&'a str> {
        res.attributes
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    #[test]
    fn test_instantiate_stores_params() {
        let deps = setup();
        let res: ParamsResponse =
            from_json(query(deps.as_ref(), mock_env(), QueryMsg::Params {}).unwrap()).unwrap();
        assert_eq!(res.gov_authority, Addr::unchecked(GOV));
        assert_eq!(res.admins, vec![Addr::unchecked(ADMIN)]);
    }

    #[test]
    fn test_instantiate_rejects_duplicate_admins() {
        let mut deps = mock_dependencies();
        let err = instantiate(
            deps.as_mut(),
            mock_env(),
            mock_info(GOV, &[]),
            InstantiateMsg {
                gov_authority: GOV.to_string(),
                admins: vec![ADMIN.to_string(), ADMIN.to_string()],
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContractError::DuplicateAdmin {
                address: ADMIN.to_string()
            }
        );
    }

    #[test]
    fn test_sudo_send_counts_flow() {
        let mut deps = setup();

        let res = sudo(deps.as_mut(), mock_env(), send_msg(40)).unwrap();
        assert_eq!(attr(&res, "method"), Some("send_attempt"));
        assert_eq!(attr(&res, "rate_limited"), Some("true"));
        assert_eq!(attr(&res, "threshold"), Some("100"));
        assert_eq!(attr(&res, "flow"), Some("40"));

        let err = sudo(deps.as_mut(), mock_env(), send_msg(61)).unwrap_err();
        assert!(matches!(err, ContractError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_sudo_failed_transfer_reports_clamp() {
        let mut deps = setup();
        sudo(deps.as_mut(), mock_env(), send_msg(10)).unwrap();

        let res = sudo(
            deps.as_mut(),
            mock_env(),
            SudoMsg::TransferFailed {
                denom: "uatom".to_string(),
                channel_id: "channel-0".to_string(),
                direction: FlowType::Outflow,
                amount: Uint128::new(15),
                transfer_id: 7,
            },
        )
        .unwrap();

        assert_eq!(attr(&res, "flow"), Some("0"));
        assert!(attr(&res, "invariant_violation").is_some());
    }

    #[test]
    fn test_sudo_clock_skew_is_reported_not_fatal() {
        let mut deps = setup();
        let mut env = mock_env();
        env.block.time = env.block.time.minus_seconds(60);

        let res = sudo(deps.as_mut(), env, send_msg(10)).unwrap();
        assert!(attr(&res, "invariant_violation").is_some());
        assert_eq!(attr(&res, "flow"), Some("10"));
    }

    #[test]
    fn test_flow_usage_with_huge_duration_clamps_window_end() {
        let mut deps = setup();
        execute(
            deps.as_mut(),
            mock_env(),
            mock_info(ADMIN, &[]),
            ExecuteMsg::UpdateRateLimit {
                denom: "uatom".to_string(),
                channel_id: "channel-0".to_string(),
                max_percent_send: 10,
                max_percent_recv: 10,
                duration_hours: 10_000_000,
            },
        )
        .unwrap();

        let usage: FlowUsageResponse = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::FlowUsage {
                    denom: "uatom".to_string(),
                    channel_id: "channel-0".to_string(),
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert!(!usage.window_expired);
        assert_eq!(
            usage.window_ends_at,
            cosmwasm_std::Timestamp::from_nanos(u64::MAX)
        );
    }

    #[test]
    fn test_flow_usage_reports_expired_window_as_empty() {
        let mut deps = setup();
        sudo(deps.as_mut(), mock_env(), send_msg(70)).unwrap();

        let usage: FlowUsageResponse = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::FlowUsage {
                    denom: "uatom".to_string(),
                    channel_id: "channel-0".to_string(),
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert!(!usage.window_expired);
        assert_eq!(usage.send.threshold, Uint128::new(100));
        assert_eq!(usage.send.used, Uint128::new(70));
        assert_eq!(usage.send.remaining, Uint128::new(30));
        assert_eq!(usage.recv.remaining, Uint128::new(100));

        let mut later = mock_env();
        later.block.time = later.block.time.plus_seconds(24 * 3600);
        let usage: FlowUsageResponse = from_json(
            query(
                deps.as_ref(),
                later,
                QueryMsg::FlowUsage {
                    denom: "uatom".to_string(),
                    channel_id: "channel-0".to_string(),
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert!(usage.window_expired);
        assert_eq!(usage.send.used, Uint128::zero());
        assert_eq!(usage.send.remaining, Uint128::new(100));
        // Stored flow is untouched by a query
        assert_eq!(usage.flow.outflow, Uint128::new(70));
    }

    #[test]
    fn test_missing_rate_limit_query_errors() {
        let deps = setup();
        let res = query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::RateLimit {
                denom: "uosmo".to_string(),
                channel_id: "channel-0".to_string(),
            },
        );
        assert!(res.is_err());

        let found: RateLimitResponse = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::RateLimit {
                    denom: "uatom".to_string(),
                    channel_id: "channel-0".to_string(),
                },
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(found.rate_limit.flow.channel_value, Uint128::new(1000));
    }
}
