//! Construction-time configuration for a governance engine.

use flow_types::{Address, GovernanceParams};
use serde::{Deserialize, Serialize};

/// Everything an engine needs to know about its surroundings.
///
/// Addresses are injected here rather than read from shared state, so two
/// engines in one environment never see each other's configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The engine's own address. Only calls from this address may change
    /// governance parameters.
    pub address: Address,

    /// The balance oracle. Only this address may deliver snapshot replies.
    pub oracle: Address,

    /// Initial governance parameters.
    #[serde(default)]
    pub params: GovernanceParams,
}

impl EngineConfig {
    pub fn new(address: Address, oracle: Address) -> Self {
        Self {
            address,
            oracle,
            params: GovernanceParams::default(),
        }
    }

    pub fn with_params(mut self, params: GovernanceParams) -> Self {
        self.params = params;
        self
    }
}
