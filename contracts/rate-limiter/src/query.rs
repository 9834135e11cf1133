//! Query handlers for the IBC rate limiter contract.

use cosmwasm_std::{Deps, Env, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;

use common::{FlowType, RatePath};

use crate::address::normalize_address;
use crate::msg::{
    DirectionUsage, FlowUsageResponse, IsWhitelistedResponse, ParamsResponse, RateLimitResponse,
    RateLimitsResponse, WhitelistResponse,
};
use crate::state::{
    RateLimit, WhitelistedAddressPair, WindowState, PARAMS, RATE_LIMITS, WHITELIST,
};

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

// ============================================================================
// Params
// ============================================================================

pub fn query_params(deps: Deps) -> StdResult<ParamsResponse> {
    let params = PARAMS.load(deps.storage)?;
    Ok(ParamsResponse {
        gov_authority: params.gov_authority,
        admins: params.admins,
    })
}

// ============================================================================
// Rate Limit Queries
// ============================================================================

/// Query a single rate limit.
pub fn query_rate_limit(
    deps: Deps,
    denom: String,
    channel_id: String,
) -> StdResult<RateLimitResponse> {
    Ok(RateLimitResponse {
        rate_limit: load(deps, &denom, &channel_id)?,
    })
}

/// Query all rate limits with pagination.
///
/// Pass the last path of a page as `start_after` to continue.
pub fn query_rate_limits(
    deps: Deps,
    start_after: Option<RatePath>,
    limit: Option<u32>,
) -> StdResult<RateLimitsResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_ref().map(|path| Bound::exclusive(path.key()));

    let rate_limits = RATE_LIMITS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, rate_limit)| rate_limit))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(RateLimitsResponse { rate_limits })
}

/// Query every rate limit on a channel.
pub fn query_rate_limits_by_channel(
    deps: Deps,
    channel_id: String,
) -> StdResult<RateLimitsResponse> {
    let rate_limits = RATE_LIMITS
        .range(deps.storage, None, None, Order::Ascending)
        .filter_map(|item| match item {
            Ok((_, rate_limit)) if rate_limit.path.channel_id == channel_id => {
                Some(Ok(rate_limit))
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(RateLimitsResponse { rate_limits })
}

/// Query current window usage.
///
/// An expired window is reported the way the next transfer will find it:
/// nothing used. Its thresholds still come from the stored snapshot because
/// the fresh channel value is only taken when the window actually rolls.
pub fn query_flow_usage(
    deps: Deps,
    env: Env,
    denom: String,
    channel_id: String,
) -> StdResult<FlowUsageResponse> {
    let rate_limit = load(deps, &denom, &channel_id)?;
    let window_expired =
        rate_limit.flow.window_state(&rate_limit.quota, env.block.time) == WindowState::Expired;

    let usage = |direction: FlowType| {
        let threshold = rate_limit
            .quota
            .threshold(direction, rate_limit.flow.channel_value);
        let used = if window_expired {
            Uint128::zero()
        } else {
            rate_limit.flow.current(direction)
        };
        let remaining = if rate_limit.quota.max_percent(direction) == 0 {
            Uint128::zero()
        } else {
            threshold.saturating_sub(used)
        };
        DirectionUsage {
            threshold,
            used,
            remaining,
        }
    };

    let send = usage(FlowType::Outflow);
    let recv = usage(FlowType::Inflow);
    let window_ends_at = rate_limit.flow.window_end(&rate_limit.quota);

    Ok(FlowUsageResponse {
        path: rate_limit.path,
        quota: rate_limit.quota,
        flow: rate_limit.flow,
        window_expired,
        window_ends_at,
        send,
        recv,
    })
}

fn load(deps: Deps, denom: &str, channel_id: &str) -> StdResult<RateLimit> {
    RATE_LIMITS
        .may_load(deps.storage, (denom, channel_id))?
        .ok_or_else(|| {
            StdError::not_found(format!(
                "rate limit for denom {} on {}",
                denom, channel_id
            ))
        })
}

// ============================================================================
// Whitelist Queries
// ============================================================================

/// Query whitelisted address pairs with pagination.
pub fn query_whitelisted_address_pairs(
    deps: Deps,
    start_after: Option<WhitelistedAddressPair>,
    limit: Option<u32>,
) -> StdResult<WhitelistResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start_after = start_after.map(|pair| {
        (
            normalize_address(&pair.sender),
            normalize_address(&pair.receiver),
        )
    });
    let start = start_after
        .as_ref()
        .map(|(sender, receiver)| Bound::exclusive((sender.as_str(), receiver.as_str())));

    let pairs = WHITELIST
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(sender, receiver)| WhitelistedAddressPair { sender, receiver }))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(WhitelistResponse { pairs })
}

pub fn query_is_whitelisted(
    deps: Deps,
    sender: String,
    receiver: String,
) -> StdResult<IsWhitelistedResponse> {
    let (sender, receiver) = (normalize_address(&sender), normalize_address(&receiver));
    Ok(IsWhitelistedResponse {
        whitelisted: WHITELIST.has(deps.storage, (sender.as_str(), receiver.as_str())),
    })
}
