//! Message types for the IBC rate limiter contract
//!
//! This module defines all messages for instantiation, execution, sudo
//! (transfer lifecycle hooks) and queries.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Timestamp, Uint128};

use common::{FlowType, RatePath};

use crate::state::{Flow, Quota, RateLimit, WhitelistedAddressPair};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct InstantiateMsg {
    /// Governance module account
    pub gov_authority: String,
    /// Initial admin addresses
    pub admins: Vec<String>,
}

// ============================================================================
// Execute Messages
// ============================================================================

#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Rate Limit Management
    // ========================================================================
    /// Add a rate limit for a (denom, channel) pair
    ///
    /// Authorization: Gov or admin
    ///
    /// Fails if the pair already has a rate limit or the denom's channel
    /// value is zero.
    AddRateLimit {
        denom: String,
        channel_id: String,
        /// Percent of channel value allowed out per window (0-100)
        max_percent_send: u64,
        /// Percent of channel value allowed in per window (0-100)
        max_percent_recv: u64,
        duration_hours: u64,
    },

    /// Replace the quota of an existing rate limit
    ///
    /// Authorization: Gov or admin
    ///
    /// The flow of the current window is kept; the new quota applies to the
    /// next transfer.
    UpdateRateLimit {
        denom: String,
        channel_id: String,
        max_percent_send: u64,
        max_percent_recv: u64,
        duration_hours: u64,
    },

    /// Delete a rate limit; transfers on the pair are no longer checked
    ///
    /// Authorization: Gov or admin
    RemoveRateLimit { denom: String, channel_id: String },

    /// Zero the flow, re-snapshot the channel value and restart the window
    ///
    /// Authorization: Gov or admin
    ResetRateLimit { denom: String, channel_id: String },

    // ========================================================================
    // Whitelist Management
    // ========================================================================
    /// Exempt transfers from `sender` to `receiver` from all rate limits
    ///
    /// Authorization: Gov or admin
    SetWhitelistedAddressPair { sender: String, receiver: String },

    /// Remove an exemption (no-op if absent)
    ///
    /// Authorization: Gov or admin
    RemoveWhitelistedAddressPair { sender: String, receiver: String },

    // ========================================================================
    // Params
    // ========================================================================
    /// Replace the admin list
    ///
    /// Authorization: Gov only
    UpdateParams { admins: Vec<String> },
}

// ============================================================================
// Sudo Messages (transfer lifecycle)
// ============================================================================

/// Invoked by the chain's transfer middleware, never by accounts.
#[cw_serde]
pub enum SudoMsg {
    /// A transfer is about to leave this chain
    SendAttempt {
        denom: String,
        channel_id: String,
        sender: String,
        receiver: String,
        amount: Uint128,
    },

    /// A transfer is arriving on this chain
    RecvAttempt {
        denom: String,
        channel_id: String,
        sender: String,
        receiver: String,
        amount: Uint128,
    },

    /// A previously counted transfer failed (error ack or timeout); its
    /// amount is returned to the quota
    ///
    /// The host must deliver this exactly once per counted transfer.
    TransferFailed {
        denom: String,
        channel_id: String,
        direction: FlowType,
        amount: Uint128,
        transfer_id: u64,
    },

    /// A counted transfer completed; nothing to undo
    TransferFinalized {
        denom: String,
        channel_id: String,
        direction: FlowType,
        amount: Uint128,
        transfer_id: u64,
    },
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ParamsResponse)]
    Params {},

    /// Get the rate limit of a (denom, channel) pair; errors if absent
    #[returns(RateLimitResponse)]
    RateLimit { denom: String, channel_id: String },

    /// Paginated list of all rate limits in storage key order
    #[returns(RateLimitsResponse)]
    RateLimits {
        start_after: Option<RatePath>,
        limit: Option<u32>,
    },

    /// All rate limits on one channel
    #[returns(RateLimitsResponse)]
    RateLimitsByChannel { channel_id: String },

    /// Current window usage as the next transfer would see it
    #[returns(FlowUsageResponse)]
    FlowUsage { denom: String, channel_id: String },

    /// Paginated whitelist in storage key order
    #[returns(WhitelistResponse)]
    WhitelistedAddressPairs {
        start_after: Option<WhitelistedAddressPair>,
        limit: Option<u32>,
    },

    #[returns(IsWhitelistedResponse)]
    IsWhitelisted { sender: String, receiver: String },
}

// ============================================================================
// Response Types
// ============================================================================

#[cw_serde]
pub struct ParamsResponse {
    pub gov_authority: Addr,
    pub admins: Vec<Addr>,
}

#[cw_serde]
pub struct RateLimitResponse {
    pub rate_limit: RateLimit,
}

#[cw_serde]
pub struct RateLimitsResponse {
    pub rate_limits: Vec<RateLimit>,
}

#[cw_serde]
pub struct DirectionUsage {
    /// Floored percent-of-channel-value cap
    pub threshold: Uint128,
    pub used: Uint128,
    pub remaining: Uint128,
}

#[cw_serde]
pub struct FlowUsageResponse {
    pub path: RatePath,
    pub quota: Quota,
    /// Stored flow (may belong to an expired window)
    pub flow: Flow,
    /// True when the next transfer will roll the window over
    pub window_expired: bool,
    pub window_ends_at: Timestamp,
    pub send: DirectionUsage,
    pub recv: DirectionUsage,
}

#[cw_serde]
pub struct WhitelistResponse {
    pub pairs: Vec<WhitelistedAddressPair>,
}

#[cw_serde]
pub struct IsWhitelistedResponse {
    pub whitelisted: bool,
}
