//! State definitions for the IBC rate limiter
//!
//! This module defines the quota/flow data model and every storage map the
//! contract persists. The arithmetic that only depends on a single record
//! (thresholds, accumulators, window expiry) lives on the types themselves;
//! anything that touches storage or the channel value oracle lives in
//! `engine`.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, OverflowError, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use common::{FlowType, RatePath};

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:ibc-rate-limiter";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound for either quota percentage
pub const MAX_PERCENT: u64 = 100;

pub const SECONDS_PER_HOUR: u64 = 3_600;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

// ============================================================================
// Params
// ============================================================================

/// Who may administer rate limits.
#[cw_serde]
pub struct Params {
    /// Governance module account; the only address that may change `admins`
    pub gov_authority: Addr,
    /// Operational admins allowed to manage rate limits and the whitelist
    pub admins: Vec<Addr>,
}

// ============================================================================
// Quota
// ============================================================================

/// Percentage caps and window length for one (denom, channel) pair.
#[cw_serde]
pub struct Quota {
    /// Max percent of the channel value that may flow out per window (0-100)
    pub max_percent_send: u64,
    /// Max percent of the channel value that may flow in per window (0-100)
    pub max_percent_recv: u64,
    /// Window length in hours
    pub duration_hours: u64,
}

impl Quota {
    pub fn max_percent(&self, direction: FlowType) -> u64 {
        match direction {
            FlowType::Inflow => self.max_percent_recv,
            FlowType::Outflow => self.max_percent_send,
        }
    }

    /// Both directions closed. Rejected at creation and by enforcement.
    pub fn is_closed(&self) -> bool {
        self.max_percent_send == 0 && self.max_percent_recv == 0
    }

    /// Absolute cap for `direction`, floored so it never exceeds the nominal
    /// percentage.
    pub fn threshold(&self, direction: FlowType, channel_value: Uint128) -> Uint128 {
        channel_value.multiply_ratio(self.max_percent(direction), MAX_PERCENT)
    }

    /// Window length in nanoseconds, saturating at `u64::MAX`.
    pub fn duration_nanos(&self) -> u64 {
        self.duration_hours
            .saturating_mul(SECONDS_PER_HOUR)
            .saturating_mul(NANOS_PER_SECOND)
    }
}

// ============================================================================
// Flow
// ============================================================================

/// Where `now` sits relative to a flow's tracking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Active,
    Expired,
    /// `now` is earlier than the window start; the window is left alone
    ClockSkew,
}

/// Accumulated volume for the current window.
#[cw_serde]
pub struct Flow {
    pub inflow: Uint128,
    pub outflow: Uint128,
    /// Channel value snapshot taken when the window opened
    pub channel_value: Uint128,
    pub window_start: Timestamp,
}

impl Flow {
    pub fn new(channel_value: Uint128, now: Timestamp) -> Self {
        Self {
            inflow: Uint128::zero(),
            outflow: Uint128::zero(),
            channel_value,
            window_start: now,
        }
    }

    pub fn current(&self, direction: FlowType) -> Uint128 {
        match direction {
            FlowType::Inflow => self.inflow,
            FlowType::Outflow => self.outflow,
        }
    }

    /// Accumulator value after adding `amount`, without applying it.
    pub fn projected(&self, direction: FlowType, amount: Uint128) -> Result<Uint128, OverflowError> {
        self.current(direction).checked_add(amount)
    }

    pub fn add(&mut self, direction: FlowType, amount: Uint128) -> Result<(), OverflowError> {
        let total = self.projected(direction, amount)?;
        *self.accumulator_mut(direction) = total;
        Ok(())
    }

    /// Removes `amount` from the accumulator, saturating at zero. Returns
    /// true when the accumulator held less than `amount`.
    pub fn undo(&mut self, direction: FlowType, amount: Uint128) -> bool {
        let acc = self.accumulator_mut(direction);
        let clamped = *acc < amount;
        *acc = acc.saturating_sub(amount);
        clamped
    }

    /// Clamped to the largest representable timestamp.
    pub fn window_end(&self, quota: &Quota) -> Timestamp {
        Timestamp::from_nanos(
            self.window_start
                .nanos()
                .saturating_add(quota.duration_nanos()),
        )
    }

    pub fn window_state(&self, quota: &Quota, now: Timestamp) -> WindowState {
        if now < self.window_start {
            return WindowState::ClockSkew;
        }
        let elapsed = now.nanos() - self.window_start.nanos();
        if elapsed >= quota.duration_nanos() {
            WindowState::Expired
        } else {
            WindowState::Active
        }
    }

    fn accumulator_mut(&mut self, direction: FlowType) -> &mut Uint128 {
        match direction {
            FlowType::Inflow => &mut self.inflow,
            FlowType::Outflow => &mut self.outflow,
        }
    }
}

// ============================================================================
// RateLimit
// ============================================================================

/// Quota and flow for one (denom, channel) pair.
#[cw_serde]
pub struct RateLimit {
    pub path: RatePath,
    pub quota: Quota,
    pub flow: Flow,
}

/// A sender/receiver pair exempt from every rate limit.
#[cw_serde]
pub struct WhitelistedAddressPair {
    pub sender: String,
    pub receiver: String,
}

// ============================================================================
// Storage
// ============================================================================

pub const PARAMS: Item<Params> = Item::new("params");

/// Key: (denom, channel_id), Value: RateLimit
pub const RATE_LIMITS: Map<(&str, &str), RateLimit> = Map::new("rate_limits");

/// Key: (sender, receiver), Value: always true (set membership)
pub const WHITELIST: Map<(&str, &str), bool> = Map::new("whitelist");
