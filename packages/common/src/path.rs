//! Rate limit addressing: which (denom, channel) pair a quota applies to and
//! which direction a transfer moves value in.

use std::fmt;

use cosmwasm_schema::cw_serde;

/// Every IBC channel identifier starts with this literal.
pub const CHANNEL_PREFIX: &str = "channel-";

/// Direction of a transfer relative to this chain.
#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum FlowType {
    /// Value arriving on this chain (packet receive)
    Inflow,
    /// Value leaving this chain (packet send)
    Outflow,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Inflow => "inflow",
            FlowType::Outflow => "outflow",
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The key a rate limit is stored and enforced under.
#[cw_serde]
#[derive(Eq, Hash, PartialOrd, Ord)]
pub struct RatePath {
    pub denom: String,
    pub channel_id: String,
}

impl RatePath {
    pub fn new(denom: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            channel_id: channel_id.into(),
        }
    }

    /// Storage key form, borrowed.
    pub fn key(&self) -> (&str, &str) {
        (self.denom.as_str(), self.channel_id.as_str())
    }
}

impl fmt::Display for RatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.denom, self.channel_id)
    }
}

/// Returns true for `channel-{N}` where N is one or more ASCII digits.
pub fn is_valid_channel_id(channel_id: &str) -> bool {
    match channel_id.strip_prefix(CHANNEL_PREFIX) {
        Some(sequence) => !sequence.is_empty() && sequence.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_syntax() {
        assert!(is_valid_channel_id("channel-0"));
        assert!(is_valid_channel_id("channel-4021"));

        assert!(!is_valid_channel_id("channel-"));
        assert!(!is_valid_channel_id("channel--1"));
        assert!(!is_valid_channel_id("channel-1a"));
        assert!(!is_valid_channel_id("Channel-1"));
        assert!(!is_valid_channel_id("connection-0"));
        assert!(!is_valid_channel_id(" channel-0"));
        assert!(!is_valid_channel_id(""));
    }

    #[test]
    fn test_flow_type_display() {
        assert_eq!(FlowType::Inflow.to_string(), "inflow");
        assert_eq!(FlowType::Outflow.to_string(), "outflow");
    }

    #[test]
    fn test_rate_path_key_and_display() {
        let path = RatePath::new("uatom", "channel-0");
        assert_eq!(path.key(), ("uatom", "channel-0"));
        assert_eq!(path.to_string(), "uatom/channel-0");
    }
}
