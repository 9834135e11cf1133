//! Whitelisted address pair handlers.
//!
//! Both operations are idempotent: the whitelist is a set. Addresses are
//! stored lowercased.

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use crate::address::{normalize_address, validate_bech32_address};
use crate::auth::assert_gov_or_admin;
use crate::engine;
use crate::error::ContractError;

/// Exempt a (sender, receiver) pair from rate limiting.
pub fn execute_set_whitelisted_address_pair(
    deps: DepsMut,
    info: MessageInfo,
    sender: String,
    receiver: String,
) -> Result<Response, ContractError> {
    validate_bech32_address(&sender)?;
    validate_bech32_address(&receiver)?;
    assert_gov_or_admin(deps.storage, &info.sender)?;
    let (sender, receiver) = (normalize_address(&sender), normalize_address(&receiver));

    let added = engine::set_whitelisted(deps.storage, &sender, &receiver)?;

    Ok(Response::new()
        .add_attribute("method", "set_whitelisted_address_pair")
        .add_attribute("sender", sender)
        .add_attribute("receiver", receiver)
        .add_attribute("added", added.to_string()))
}

/// Remove a (sender, receiver) exemption.
pub fn execute_remove_whitelisted_address_pair(
    deps: DepsMut,
    info: MessageInfo,
    sender: String,
    receiver: String,
) -> Result<Response, ContractError> {
    validate_bech32_address(&sender)?;
    validate_bech32_address(&receiver)?;
    assert_gov_or_admin(deps.storage, &info.sender)?;
    let (sender, receiver) = (normalize_address(&sender), normalize_address(&receiver));

    let removed = engine::remove_whitelisted(deps.storage, &sender, &receiver)?;

    Ok(Response::new()
        .add_attribute("method", "remove_whitelisted_address_pair")
        .add_attribute("sender", sender)
        .add_attribute("receiver", receiver)
        .add_attribute("removed", removed.to_string()))
}
