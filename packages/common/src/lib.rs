//! Common - Shared Types for the IBC Rate Limiter
//!
//! This package provides the storage-free types shared between the rate limiter
//! contract and anything that drives it (host chain glue, relayer tooling, tests).

pub mod path;

pub use path::{is_valid_channel_id, FlowType, RatePath, CHANNEL_PREFIX};
