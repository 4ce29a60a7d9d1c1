//! Effects returned by proposal actions and contract entry points.

use crate::{Address, GovernanceParams};
use serde::{Deserialize, Serialize};

/// A side effect to be carried out by the environment after the current call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Replace the emitting engine's governance parameters.
    ///
    /// Delivered back to the engine with the engine itself as sender, which
    /// is the only authority `set_governance_parameters` accepts.
    SetGovernanceParameters { params: GovernanceParams },

    /// Call an entry point on another contract.
    Invoke {
        target: Address,
        entrypoint: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

impl Effect {
    /// Shorthand for an [`Effect::Invoke`] with a serialisable payload.
    pub fn invoke(
        target: Address,
        entrypoint: impl Into<String>,
        payload: impl Serialize,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::Invoke {
            target,
            entrypoint: entrypoint.into(),
            payload: serde_json::to_value(payload)?,
        })
    }
}
