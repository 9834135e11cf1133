//! Rate limit management handlers.
//!
//! Every handler checks gov-or-admin authorization before reading any rate
//! limit state. The storage-level work is done by `engine`.

use cosmwasm_std::{DepsMut, Env, MessageInfo, Response};

use common::RatePath;

use crate::auth::assert_gov_or_admin;
use crate::engine;
use crate::error::ContractError;
use crate::oracle::BankSupplyOracle;
use crate::state::Quota;

/// Add a rate limit, snapshotting the current channel value.
pub fn execute_add_rate_limit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    path: RatePath,
    quota: Quota,
) -> Result<Response, ContractError> {
    assert_gov_or_admin(deps.storage, &info.sender)?;

    let oracle = BankSupplyOracle::new(&deps.querier);
    let rate_limit = engine::add_rate_limit(deps.storage, &oracle, env.block.time, path, quota)?;

    Ok(Response::new()
        .add_attribute("method", "add_rate_limit")
        .add_attribute("denom", &rate_limit.path.denom)
        .add_attribute("channel_id", &rate_limit.path.channel_id)
        .add_attribute(
            "max_percent_send",
            rate_limit.quota.max_percent_send.to_string(),
        )
        .add_attribute(
            "max_percent_recv",
            rate_limit.quota.max_percent_recv.to_string(),
        )
        .add_attribute("duration_hours", rate_limit.quota.duration_hours.to_string())
        .add_attribute("channel_value", rate_limit.flow.channel_value))
}

/// Replace the quota of an existing rate limit. The current window's flow is
/// kept.
pub fn execute_update_rate_limit(
    deps: DepsMut,
    info: MessageInfo,
    path: RatePath,
    quota: Quota,
) -> Result<Response, ContractError> {
    assert_gov_or_admin(deps.storage, &info.sender)?;

    let rate_limit = engine::update_rate_limit(deps.storage, path, quota)?;

    Ok(Response::new()
        .add_attribute("method", "update_rate_limit")
        .add_attribute("denom", &rate_limit.path.denom)
        .add_attribute("channel_id", &rate_limit.path.channel_id)
        .add_attribute(
            "max_percent_send",
            rate_limit.quota.max_percent_send.to_string(),
        )
        .add_attribute(
            "max_percent_recv",
            rate_limit.quota.max_percent_recv.to_string(),
        )
        .add_attribute("duration_hours", rate_limit.quota.duration_hours.to_string()))
}

/// Remove a rate limit.
pub fn execute_remove_rate_limit(
    deps: DepsMut,
    info: MessageInfo,
    path: RatePath,
) -> Result<Response, ContractError> {
    assert_gov_or_admin(deps.storage, &info.sender)?;

    engine::remove_rate_limit(deps.storage, &path)?;

    Ok(Response::new()
        .add_attribute("method", "remove_rate_limit")
        .add_attribute("denom", path.denom)
        .add_attribute("channel_id", path.channel_id))
}

/// Reset a rate limit's flow and restart its window.
pub fn execute_reset_rate_limit(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    path: RatePath,
) -> Result<Response, ContractError> {
    assert_gov_or_admin(deps.storage, &info.sender)?;

    let oracle = BankSupplyOracle::new(&deps.querier);
    let rate_limit = engine::reset_rate_limit(deps.storage, &oracle, env.block.time, &path)?;

    Ok(Response::new()
        .add_attribute("method", "reset_rate_limit")
        .add_attribute("denom", path.denom)
        .add_attribute("channel_id", path.channel_id)
        .add_attribute("channel_value", rate_limit.flow.channel_value)
        .add_attribute(
            "window_start",
            rate_limit.flow.window_start.seconds().to_string(),
        ))
}
