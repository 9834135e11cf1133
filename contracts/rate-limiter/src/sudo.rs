//! Transfer lifecycle hooks.
//!
//! The chain's transfer middleware calls these through `sudo` for every
//! packet it sends or receives, and again when a sent transfer fails or
//! completes. A returned error rejects the transfer.

use cosmwasm_std::{Api, DepsMut, Env, Response, Uint128};

use common::FlowType;

use crate::engine::{self, Decision, Reversal, Transfer, WindowUpdate};
use crate::error::ContractError;
use crate::oracle::BankSupplyOracle;

/// Shared path for send and receive attempts.
pub fn sudo_transfer_attempt(
    deps: DepsMut,
    env: Env,
    direction: FlowType,
    transfer: Transfer,
) -> Result<Response, ContractError> {
    let oracle = BankSupplyOracle::new(&deps.querier);
    let decision =
        engine::check_and_update_flow(deps.storage, &oracle, env.block.time, direction, &transfer)?;

    let method = match direction {
        FlowType::Outflow => "send_attempt",
        FlowType::Inflow => "recv_attempt",
    };
    let response = Response::new()
        .add_attribute("method", method)
        .add_attribute("denom", transfer.denom)
        .add_attribute("channel_id", transfer.channel_id)
        .add_attribute("direction", direction.as_str())
        .add_attribute("amount", transfer.amount);

    Ok(match decision {
        Decision::Whitelisted => response
            .add_attribute("rate_limited", "false")
            .add_attribute("whitelisted", "true"),
        Decision::Unlimited => response.add_attribute("rate_limited", "false"),
        Decision::Counted {
            rate_limit,
            threshold,
            window,
        } => {
            let mut response = response
                .add_attribute("rate_limited", "true")
                .add_attribute("threshold", threshold)
                .add_attribute("flow", rate_limit.flow.current(direction))
                .add_attribute("channel_value", rate_limit.flow.channel_value);
            match window {
                WindowUpdate::Unchanged => {}
                WindowUpdate::RolledOver => {
                    response = response.add_attribute(
                        "window_rolled_over",
                        rate_limit.flow.window_start.seconds().to_string(),
                    );
                }
                WindowUpdate::ClockSkew => {
                    let detail = format!(
                        "block time {} is before window start {} for {}",
                        env.block.time.seconds(),
                        rate_limit.flow.window_start.seconds(),
                        rate_limit.path
                    );
                    response = report_invariant_violation(deps.api, response, detail);
                }
            }
            response
        }
    })
}

/// Returns a failed transfer's amount to the quota.
pub fn sudo_transfer_failed(
    deps: DepsMut,
    direction: FlowType,
    denom: String,
    channel_id: String,
    amount: Uint128,
    transfer_id: u64,
) -> Result<Response, ContractError> {
    let reversal = engine::undo_flow(deps.storage, direction, &denom, &channel_id, amount)?;

    let response = Response::new()
        .add_attribute("method", "transfer_failed")
        .add_attribute("denom", &denom)
        .add_attribute("channel_id", &channel_id)
        .add_attribute("direction", direction.as_str())
        .add_attribute("amount", amount)
        .add_attribute("transfer_id", transfer_id.to_string());

    Ok(match reversal {
        Reversal::NoRateLimit => response.add_attribute("rate_limited", "false"),
        Reversal::Reverted { flow, clamped } => {
            let response = response
                .add_attribute("rate_limited", "true")
                .add_attribute("flow", flow.current(direction));
            if clamped {
                let detail = format!(
                    "reverting {} {} of transfer {} on {}/{} drove the accumulator below zero",
                    direction, amount, transfer_id, denom, channel_id
                );
                report_invariant_violation(deps.api, response, detail)
            } else {
                response
            }
        }
    })
}

/// Acknowledges a completed transfer. Flow was already counted at attempt
/// time, so there is nothing to change.
pub fn sudo_transfer_finalized(
    direction: FlowType,
    denom: String,
    channel_id: String,
    amount: Uint128,
    transfer_id: u64,
) -> Result<Response, ContractError> {
    Ok(Response::new()
        .add_attribute("method", "transfer_finalized")
        .add_attribute("denom", denom)
        .add_attribute("channel_id", channel_id)
        .add_attribute("direction", direction.as_str())
        .add_attribute("amount", amount)
        .add_attribute("transfer_id", transfer_id.to_string()))
}

/// Logs a clamped inconsistency and tags the response with it. Never fails
/// the call.
fn report_invariant_violation(api: &dyn Api, response: Response, detail: String) -> Response {
    api.debug(&format!("rate-limiter invariant violation: {}", detail));
    response.add_attribute("invariant_violation", detail)
}
