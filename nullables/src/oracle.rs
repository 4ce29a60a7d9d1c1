//! Nullable balance oracle: answers every query with one settable value.

use flow_runtime::contract::decode;
use flow_runtime::{Contract, ContractError};
use flow_types::{BalanceOracle, BalanceQuery, CallContext, Effect, OracleError, Point};

/// A balance oracle that reports the same balance for every holder and
/// point, finalized or not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NullOracle {
    balance: u128,
}

impl NullOracle {
    pub fn new(balance: u128) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u128 {
        self.balance
    }

    pub fn set_balance(&mut self, balance: u128) {
        self.balance = balance;
    }
}

impl BalanceOracle for NullOracle {
    fn balance_at(&self, _query: &BalanceQuery, _current: Point) -> Result<u128, OracleError> {
        Ok(self.balance)
    }
}

impl Contract for NullOracle {
    fn call(
        &mut self,
        _ctx: &CallContext,
        entrypoint: &str,
        payload: serde_json::Value,
    ) -> Result<Vec<Effect>, ContractError> {
        match entrypoint {
            "set_val" => {
                self.balance = decode(entrypoint, payload)?;
                Ok(Vec::new())
            }
            other => Err(ContractError::UnknownEntrypoint(other.to_string())),
        }
    }

    fn balance_oracle(&self) -> Option<&dyn BalanceOracle> {
        Some(self)
    }
}
