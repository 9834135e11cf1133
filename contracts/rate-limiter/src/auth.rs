//! Gov-or-admin authorization for administrative messages.

use cosmwasm_std::{Addr, Storage};

use crate::error::ContractError;
use crate::state::{Params, PARAMS};

/// True when `address` is the gov authority or one of the configured admins.
pub fn is_authorized(params: &Params, address: &Addr) -> bool {
    params.gov_authority == *address || params.admins.contains(address)
}

/// Loads params and fails unless `sender` is gov or an admin.
pub fn assert_gov_or_admin(storage: &dyn Storage, sender: &Addr) -> Result<Params, ContractError> {
    let params = PARAMS.load(storage)?;
    if !is_authorized(&params, sender) {
        return Err(ContractError::Unauthorized {
            address: sender.to_string(),
        });
    }
    Ok(params)
}

pub fn assert_gov(storage: &dyn Storage, sender: &Addr) -> Result<Params, ContractError> {
    let params = PARAMS.load(storage)?;
    if params.gov_authority != *sender {
        return Err(ContractError::UnauthorizedGov {
            address: sender.to_string(),
        });
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gov_or_admin_predicate() {
        let params = Params {
            gov_authority: Addr::unchecked("gov"),
            admins: vec![Addr::unchecked("admin1"), Addr::unchecked("admin2")],
        };

        assert!(is_authorized(&params, &Addr::unchecked("gov")));
        assert!(is_authorized(&params, &Addr::unchecked("admin1")));
        assert!(is_authorized(&params, &Addr::unchecked("admin2")));
        assert!(!is_authorized(&params, &Addr::unchecked("admin3")));
        assert!(!is_authorized(&params, &Addr::unchecked("")));
    }

    #[test]
    fn test_no_admins_still_allows_gov() {
        let params = Params {
            gov_authority: Addr::unchecked("gov"),
            admins: vec![],
        };
        assert!(is_authorized(&params, &Addr::unchecked("gov")));
        assert!(!is_authorized(&params, &Addr::unchecked("admin1")));
    }
}
