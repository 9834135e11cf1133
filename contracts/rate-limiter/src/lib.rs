//! IBC Rate Limiter - Per-Channel Flow Quotas
//!
//! This contract caps how much of an asset may leave (send) or enter
//! (receive) the chain over a single IBC channel within a time window,
//! measured as a percentage of the asset's total supply.
//!
//! # Transfer Flow
//! 1. The transfer middleware calls `SendAttempt` / `RecvAttempt` via sudo
//! 2. Whitelisted (sender, receiver) pairs and unlimited paths pass through
//! 3. An expired window is rolled over lazily and the supply re-snapshotted
//! 4. The transfer is rejected if it would push the directional flow above
//!    the floored percentage threshold, otherwise it is counted
//! 5. A failed or timed-out send is reported with `TransferFailed`, which
//!    returns its amount to the quota
//!
//! # Administration
//! - Gov or admins add, update, remove and reset rate limits
//! - Gov or admins manage the whitelist
//! - Only gov replaces the admin list

pub mod address;
pub mod auth;
pub mod contract;
pub mod engine;
pub mod error;
mod execute;
pub mod msg;
pub mod oracle;
mod query;
pub mod state;
mod sudo;

pub use crate::error::ContractError;
pub use crate::oracle::{BankSupplyOracle, ChannelValueOracle};
pub use common::{FlowType, RatePath};
