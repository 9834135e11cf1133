//! Channel value source.
//!
//! The channel value is the baseline a quota percentage is applied to. It is
//! queried when a rate limit is added or reset and whenever a window rolls
//! over, never on an ordinary transfer.

use cosmwasm_std::{QuerierWrapper, StdResult, Uint128};

pub trait ChannelValueOracle {
    /// Total value of `denom` attributable to the channel. Must be a pure read.
    fn channel_value(&self, denom: &str) -> StdResult<Uint128>;
}

/// Uses the bank module's total supply of the denom as the channel value.
pub struct BankSupplyOracle<'a> {
    querier: &'a QuerierWrapper<'a>,
}

impl<'a> BankSupplyOracle<'a> {
    pub fn new(querier: &'a QuerierWrapper<'a>) -> Self {
        Self { querier }
    }
}

impl ChannelValueOracle for BankSupplyOracle<'_> {
    fn channel_value(&self, denom: &str) -> StdResult<Uint128> {
        Ok(self.querier.query_supply(denom)?.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::coins;
    use cosmwasm_std::testing::mock_dependencies;

    #[test]
    fn test_bank_supply_sums_all_holders() {
        let mut deps = mock_dependencies();
        deps.querier.update_balance("holder1", coins(600, "uatom"));
        deps.querier.update_balance("holder2", coins(400, "uatom"));
        deps.querier.update_balance("holder3", coins(5, "uosmo"));
        let querier = deps.as_ref().querier;
        let oracle = BankSupplyOracle::new(&querier);

        assert_eq!(oracle.channel_value("uatom").unwrap(), Uint128::new(1000));
        assert_eq!(oracle.channel_value("uosmo").unwrap(), Uint128::new(5));
        assert_eq!(oracle.channel_value("unknown").unwrap(), Uint128::zero());
    }
}
