//! Params handlers.

use cosmwasm_std::{Addr, Api, DepsMut, MessageInfo, Response};

use crate::auth::assert_gov;
use crate::error::ContractError;
use crate::state::PARAMS;

/// Replace the admin list (gov only).
pub fn execute_update_params(
    deps: DepsMut,
    info: MessageInfo,
    admins: Vec<String>,
) -> Result<Response, ContractError> {
    let mut params = assert_gov(deps.storage, &info.sender)?;

    params.admins = validate_admins(deps.api, &admins)?;
    PARAMS.save(deps.storage, &params)?;

    Ok(Response::new()
        .add_attribute("method", "update_params")
        .add_attribute("admin_count", params.admins.len().to_string()))
}

/// Every admin must be a valid local account; order is kept, duplicates
/// rejected.
pub fn validate_admins(api: &dyn Api, admins: &[String]) -> Result<Vec<Addr>, ContractError> {
    let mut validated: Vec<Addr> = Vec::with_capacity(admins.len());
    for admin in admins {
        let addr = api
            .addr_validate(admin)
            .map_err(|e| ContractError::InvalidAddress {
                reason: format!("invalid admin address {}: {}", admin, e),
            })?;
        if validated.contains(&addr) {
            return Err(ContractError::DuplicateAdmin {
                address: addr.to_string(),
            });
        }
        validated.push(addr);
    }
    Ok(validated)
}
