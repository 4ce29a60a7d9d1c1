//! Nullable store: an admin-gated value a proposal can modify.

use flow_runtime::contract::decode;
use flow_runtime::{Contract, ContractError};
use flow_types::{Address, CallContext, Effect};

/// Holds one value that only its admin may change.
///
/// Anyone may hand the admin role over, so tests can give it to a
/// governance engine and drive changes through proposals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NullStore {
    admin: Address,
    value: u64,
}

impl NullStore {
    pub fn new(admin: Address) -> Self {
        Self { admin, value: 0 }
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

impl Contract for NullStore {
    fn call(
        &mut self,
        ctx: &CallContext,
        entrypoint: &str,
        payload: serde_json::Value,
    ) -> Result<Vec<Effect>, ContractError> {
        match entrypoint {
            "set_admin" => self.admin = decode(entrypoint, payload)?,
            "modify_value" => {
                let value = decode(entrypoint, payload)?;
                if ctx.sender != self.admin {
                    return Err(ContractError::NotAllowed(ctx.sender.clone()));
                }
                tracing::debug!(old = self.value, new = value, "store value modified");
                self.value = value;
            }
            "default" => {}
            other => return Err(ContractError::UnknownEntrypoint(other.to_string())),
        }
        Ok(Vec::new())
    }
}
