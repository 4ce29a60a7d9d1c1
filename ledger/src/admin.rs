//! Administrator and minting gates.

use crate::LedgerError;
use flow_types::Address;
use serde::{Deserialize, Serialize};

/// Holds the administrator address and authorises privileged calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminGate {
    administrator: Address,
}

impl AdminGate {
    pub fn new(administrator: Address) -> Self {
        Self { administrator }
    }

    pub fn administrator(&self) -> &Address {
        &self.administrator
    }

    pub fn is_administrator(&self, sender: &Address) -> bool {
        *sender == self.administrator
    }

    pub fn ensure(&self, sender: &Address) -> Result<(), LedgerError> {
        if self.is_administrator(sender) {
            Ok(())
        } else {
            Err(LedgerError::NotAdmin)
        }
    }

    pub fn set_administrator(&mut self, administrator: Address) {
        self.administrator = administrator;
    }
}

/// One-way switch that permanently disables minting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintGate {
    disabled: bool,
}

impl MintGate {
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn ensure_enabled(&self) -> Result<(), LedgerError> {
        if self.disabled {
            Err(LedgerError::MintingDisabled)
        } else {
            Ok(())
        }
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }
}
