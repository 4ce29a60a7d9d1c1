//! The contract boundary and the token ledger's entry points.

use crate::error::ContractError;
use flow_ledger::SnapshotLedger;
use flow_types::{Address, BalanceOracle, CallContext, Effect};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Anything deployable at an address.
///
/// Entry points take a JSON payload and may return effects, which the
/// runtime carries out with the contract as sender.
pub trait Contract: ContractObject {
    fn call(
        &mut self,
        ctx: &CallContext,
        entrypoint: &str,
        payload: serde_json::Value,
    ) -> Result<Vec<Effect>, ContractError>;

    /// Contracts able to answer balance queries expose themselves here.
    fn balance_oracle(&self) -> Option<&dyn BalanceOracle> {
        None
    }
}

/// Object-safety helpers, implemented for every cloneable contract.
pub trait ContractObject {
    fn clone_box(&self) -> Box<dyn Contract>;
    fn as_any(&self) -> &dyn Any;
}

impl<T: Contract + Clone + 'static> ContractObject for T {
    fn clone_box(&self) -> Box<dyn Contract> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Clone for Box<dyn Contract> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Decode an entry point payload.
pub fn decode<T: DeserializeOwned>(
    entrypoint: &str,
    payload: serde_json::Value,
) -> Result<T, ContractError> {
    serde_json::from_value(payload).map_err(|source| ContractError::InvalidPayload {
        entrypoint: entrypoint.to_string(),
        source,
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferParams {
    pub from: Address,
    pub to: Address,
    pub value: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveParams {
    pub spender: Address,
    pub value: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintParams {
    pub address: Address,
    pub value: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorParams {
    pub administrator: Address,
}

impl Contract for SnapshotLedger {
    fn call(
        &mut self,
        ctx: &CallContext,
        entrypoint: &str,
        payload: serde_json::Value,
    ) -> Result<Vec<Effect>, ContractError> {
        match entrypoint {
            "transfer" => {
                let params: TransferParams = decode(entrypoint, payload)?;
                self.transfer(ctx, &params.from, &params.to, params.value)?;
            }
            "approve" => {
                let params: ApproveParams = decode(entrypoint, payload)?;
                self.approve(ctx, &params.spender, params.value)?;
            }
            "mint" => {
                let params: MintParams = decode(entrypoint, payload)?;
                self.mint(ctx, &params.address, params.value)?;
            }
            "disable_mint" => self.disable_mint(ctx)?,
            "set_administrator" => {
                let params: AdministratorParams = decode(entrypoint, payload)?;
                self.set_administrator(ctx, params.administrator)?;
            }
            other => return Err(ContractError::UnknownEntrypoint(other.to_string())),
        }
        Ok(Vec::new())
    }

    fn balance_oracle(&self) -> Option<&dyn BalanceOracle> {
        Some(self)
    }
}
