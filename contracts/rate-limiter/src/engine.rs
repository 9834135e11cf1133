//! Rate Limit Engine
//!
//! Enforcement and bookkeeping for (denom, channel) flow quotas.
//!
//! ## Enforcement order
//!
//! 1. Whitelisted (sender, receiver) pairs bypass everything
//! 2. Paths without a rate limit pass through
//! 3. An expired window is rolled over: flow zeroed, channel value re-snapshotted
//! 4. The projected directional flow is compared to the floored threshold
//! 5. On accept the accumulator is increased and the rate limit saved
//!
//! Rollover is lazy. Nothing happens to a quiet path until the next transfer
//! or reset touches it, so every validator replays exactly the same writes.
//!
//! Rejections return before anything is written. The host discards the writes
//! of a failed call anyway, so a rollover computed for a rejected transfer is
//! recomputed by the next one.

use cosmwasm_std::{Storage, Timestamp, Uint128};

use common::{is_valid_channel_id, FlowType, RatePath};

use crate::address::normalize_address;
use crate::error::ContractError;
use crate::oracle::ChannelValueOracle;
use crate::state::{Flow, Quota, RateLimit, WindowState, MAX_PERCENT, RATE_LIMITS, WHITELIST};

// ============================================================================
// Types
// ============================================================================

/// A transfer as seen by the send/receive hooks.
#[derive(Debug, Clone, Copy)]
pub struct Transfer<'a> {
    pub denom: &'a str,
    pub channel_id: &'a str,
    pub sender: &'a str,
    pub receiver: &'a str,
    pub amount: Uint128,
}

/// What happened to the window before a transfer was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowUpdate {
    Unchanged,
    RolledOver,
    /// Block time is before the window start; window kept as is
    ClockSkew,
}

/// Outcome of an accepted transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Whitelisted,
    /// No rate limit configured for the path
    Unlimited,
    Counted {
        rate_limit: RateLimit,
        threshold: Uint128,
        window: WindowUpdate,
    },
}

/// Outcome of a reversal.
#[derive(Debug, Clone, PartialEq)]
pub enum Reversal {
    /// The rate limit was removed after the transfer was counted
    NoRateLimit,
    Reverted {
        flow: Flow,
        /// The accumulator held less than the reverted amount and was clamped
        clamped: bool,
    },
}

// ============================================================================
// Validation
// ============================================================================

pub fn validate_path(path: &RatePath) -> Result<(), ContractError> {
    if path.denom.is_empty() {
        return Err(ContractError::InvalidDenom);
    }
    if !is_valid_channel_id(&path.channel_id) {
        return Err(ContractError::InvalidChannelId {
            channel_id: path.channel_id.clone(),
        });
    }
    Ok(())
}

pub fn validate_quota(quota: &Quota) -> Result<(), ContractError> {
    if quota.max_percent_send > MAX_PERCENT {
        return Err(ContractError::InvalidPercent {
            field: "max-percent-send".to_string(),
            value: quota.max_percent_send,
        });
    }
    if quota.max_percent_recv > MAX_PERCENT {
        return Err(ContractError::InvalidPercent {
            field: "max-percent-recv".to_string(),
            value: quota.max_percent_recv,
        });
    }
    if quota.is_closed() {
        return Err(ContractError::ZeroQuota);
    }
    if quota.duration_hours == 0 {
        return Err(ContractError::ZeroDuration);
    }
    Ok(())
}

// ============================================================================
// Window Rollover
// ============================================================================

/// Starts a fresh window if the current one has run its full duration.
pub fn refresh_window(
    rate_limit: &mut RateLimit,
    oracle: &dyn ChannelValueOracle,
    now: Timestamp,
) -> Result<WindowUpdate, ContractError> {
    match rate_limit.flow.window_state(&rate_limit.quota, now) {
        WindowState::Active => Ok(WindowUpdate::Unchanged),
        WindowState::ClockSkew => Ok(WindowUpdate::ClockSkew),
        WindowState::Expired => {
            let channel_value = oracle.channel_value(&rate_limit.path.denom)?;
            rate_limit.flow = Flow::new(channel_value, now);
            Ok(WindowUpdate::RolledOver)
        }
    }
}

// ============================================================================
// Quota Evaluation
// ============================================================================

/// Checks `amount` against the quota without mutating anything. Returns the
/// threshold the transfer was measured against.
pub fn check_quota(
    rate_limit: &RateLimit,
    direction: FlowType,
    amount: Uint128,
) -> Result<Uint128, ContractError> {
    let quota = &rate_limit.quota;
    let flow = &rate_limit.flow;
    let percent = quota.max_percent(direction);
    let threshold = quota.threshold(direction, flow.channel_value);
    let current = flow.current(direction);

    // A 0% direction, a closed quota or an empty channel admits nothing, not
    // even amounts that would fit under a zero threshold.
    let exceeded = quota.is_closed()
        || percent == 0
        || flow.channel_value.is_zero()
        || match flow.projected(direction, amount) {
            Ok(projected) => projected > threshold,
            Err(_) => true,
        };

    if exceeded {
        return Err(ContractError::QuotaExceeded {
            denom: rate_limit.path.denom.clone(),
            channel_id: rate_limit.path.channel_id.clone(),
            direction,
            amount,
            current,
            threshold,
            percent,
            channel_value: flow.channel_value,
        });
    }

    Ok(threshold)
}

// ============================================================================
// Enforcement
// ============================================================================

/// Runs a pending transfer through the whitelist, rollover and quota checks
/// and, if accepted, counts it against the flow.
pub fn check_and_update_flow(
    storage: &mut dyn Storage,
    oracle: &dyn ChannelValueOracle,
    now: Timestamp,
    direction: FlowType,
    transfer: &Transfer,
) -> Result<Decision, ContractError> {
    if is_whitelisted(storage, transfer.sender, transfer.receiver)? {
        return Ok(Decision::Whitelisted);
    }

    let key = (transfer.denom, transfer.channel_id);
    let Some(mut rate_limit) = RATE_LIMITS.may_load(storage, key)? else {
        return Ok(Decision::Unlimited);
    };

    let window = refresh_window(&mut rate_limit, oracle, now)?;
    let threshold = check_quota(&rate_limit, direction, transfer.amount)?;

    rate_limit.flow.add(direction, transfer.amount)?;
    RATE_LIMITS.save(storage, key, &rate_limit)?;

    Ok(Decision::Counted {
        rate_limit,
        threshold,
        window,
    })
}

/// Undoes a previously counted transfer. Never rolls the window and never
/// drives an accumulator below zero.
pub fn undo_flow(
    storage: &mut dyn Storage,
    direction: FlowType,
    denom: &str,
    channel_id: &str,
    amount: Uint128,
) -> Result<Reversal, ContractError> {
    let key = (denom, channel_id);
    let Some(mut rate_limit) = RATE_LIMITS.may_load(storage, key)? else {
        return Ok(Reversal::NoRateLimit);
    };

    let clamped = rate_limit.flow.undo(direction, amount);
    RATE_LIMITS.save(storage, key, &rate_limit)?;

    Ok(Reversal::Reverted {
        flow: rate_limit.flow,
        clamped,
    })
}

// ============================================================================
// Rate Limit Administration
// ============================================================================

pub fn add_rate_limit(
    storage: &mut dyn Storage,
    oracle: &dyn ChannelValueOracle,
    now: Timestamp,
    path: RatePath,
    quota: Quota,
) -> Result<RateLimit, ContractError> {
    validate_path(&path)?;
    validate_quota(&quota)?;

    if RATE_LIMITS.has(storage, path.key()) {
        return Err(ContractError::RateLimitAlreadyExists {
            denom: path.denom,
            channel_id: path.channel_id,
        });
    }

    let channel_value = oracle.channel_value(&path.denom)?;
    if channel_value.is_zero() {
        return Err(ContractError::ZeroChannelValue { denom: path.denom });
    }

    let rate_limit = RateLimit {
        flow: Flow::new(channel_value, now),
        path,
        quota,
    };
    RATE_LIMITS.save(storage, rate_limit.path.key(), &rate_limit)?;

    Ok(rate_limit)
}

/// Replaces the quota and keeps the current window's flow. A shorter
/// duration takes effect at the next transfer, measured from the existing
/// window start.
pub fn update_rate_limit(
    storage: &mut dyn Storage,
    path: RatePath,
    quota: Quota,
) -> Result<RateLimit, ContractError> {
    validate_path(&path)?;
    validate_quota(&quota)?;

    let mut rate_limit = load_rate_limit(storage, &path)?;
    rate_limit.quota = quota;
    RATE_LIMITS.save(storage, path.key(), &rate_limit)?;

    Ok(rate_limit)
}

pub fn remove_rate_limit(storage: &mut dyn Storage, path: &RatePath) -> Result<(), ContractError> {
    validate_path(path)?;
    load_rate_limit(storage, path)?;
    RATE_LIMITS.remove(storage, path.key());
    Ok(())
}

/// Zeroes the flow, re-snapshots the channel value and restarts the window.
pub fn reset_rate_limit(
    storage: &mut dyn Storage,
    oracle: &dyn ChannelValueOracle,
    now: Timestamp,
    path: &RatePath,
) -> Result<RateLimit, ContractError> {
    validate_path(path)?;

    let mut rate_limit = load_rate_limit(storage, path)?;
    let channel_value = oracle.channel_value(&path.denom)?;
    rate_limit.flow = Flow::new(channel_value, now);
    RATE_LIMITS.save(storage, path.key(), &rate_limit)?;

    Ok(rate_limit)
}

pub fn load_rate_limit(storage: &dyn Storage, path: &RatePath) -> Result<RateLimit, ContractError> {
    RATE_LIMITS
        .may_load(storage, path.key())?
        .ok_or_else(|| ContractError::RateLimitNotFound {
            denom: path.denom.clone(),
            channel_id: path.channel_id.clone(),
        })
}

// ============================================================================
// Whitelist
// ============================================================================

/// Pairs are matched case-insensitively: both addresses are lowercased
/// before storage and lookup.
pub fn is_whitelisted(
    storage: &dyn Storage,
    sender: &str,
    receiver: &str,
) -> Result<bool, ContractError> {
    let (sender, receiver) = (normalize_address(sender), normalize_address(receiver));
    Ok(WHITELIST.has(storage, (sender.as_str(), receiver.as_str())))
}

/// Inserting an existing pair is a no-op. Returns true if the pair was new.
pub fn set_whitelisted(
    storage: &mut dyn Storage,
    sender: &str,
    receiver: &str,
) -> Result<bool, ContractError> {
    let (sender, receiver) = (normalize_address(sender), normalize_address(receiver));
    let added = !WHITELIST.has(storage, (sender.as_str(), receiver.as_str()));
    WHITELIST.save(storage, (sender.as_str(), receiver.as_str()), &true)?;
    Ok(added)
}

/// Removing an absent pair is a no-op. Returns true if the pair existed.
pub fn remove_whitelisted(
    storage: &mut dyn Storage,
    sender: &str,
    receiver: &str,
) -> Result<bool, ContractError> {
    let (sender, receiver) = (normalize_address(sender), normalize_address(receiver));
    let existed = WHITELIST.has(storage, (sender.as_str(), receiver.as_str()));
    WHITELIST.remove(storage, (sender.as_str(), receiver.as_str()));
    Ok(existed)
}
