//! Error types for the IBC rate limiter contract

use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

use common::FlowType;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: expected gov or admin address, got {address}")]
    Unauthorized { address: String },

    #[error("Unauthorized: only the gov authority can update params, got {address}")]
    UnauthorizedGov { address: String },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    #[error("Invalid denom: denom can not be empty")]
    InvalidDenom,

    #[error("Invalid channel-id ({channel_id}), must be of the format 'channel-{{N}}'")]
    InvalidChannelId { channel_id: String },

    #[error("{field} percent must be between 0 and 100 (inclusively), provided: {value}")]
    InvalidPercent { field: String, value: u64 },

    #[error("Either the max send or max receive threshold must be greater than 0")]
    ZeroQuota,

    #[error("Duration can not be zero")]
    ZeroDuration,

    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("Duplicate admin address: {address}")]
    DuplicateAdmin { address: String },

    // ========================================================================
    // Rate Limit State Errors
    // ========================================================================

    #[error("Rate limit not found for denom {denom} on {channel_id}")]
    RateLimitNotFound { denom: String, channel_id: String },

    #[error("Rate limit already exists for denom {denom} on {channel_id}")]
    RateLimitAlreadyExists { denom: String, channel_id: String },

    #[error("Invalid channel value: channel value of {denom} is zero")]
    ZeroChannelValue { denom: String },

    // ========================================================================
    // Enforcement Errors
    // ========================================================================

    #[error(
        "Quota exceeded for {denom} on {channel_id}: {direction} of {amount} with \
         {current} already counted exceeds threshold {threshold} \
         ({percent}% of channel value {channel_value})"
    )]
    QuotaExceeded {
        denom: String,
        channel_id: String,
        direction: FlowType,
        amount: Uint128,
        current: Uint128,
        threshold: Uint128,
        percent: u64,
        channel_value: Uint128,
    },
}
