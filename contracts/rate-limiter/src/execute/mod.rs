//! Execute handlers for the IBC rate limiter contract.
//!
//! This module contains all execute message handlers, organized by category:
//! - `rate_limit` - Add, update, remove and reset rate limits
//! - `whitelist` - Whitelisted address pair management
//! - `params` - Admin list updates (gov only)

mod params;
mod rate_limit;
mod whitelist;

pub use params::*;
pub use rate_limit::*;
pub use whitelist::*;
