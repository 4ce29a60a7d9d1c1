//! Simulation configuration.

use crate::error::SimError;
use flow_types::{Address, GovernanceParams};
use flow_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which contract answers the engine's balance queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleKind {
    /// The snapshot ledger itself.
    #[default]
    Ledger,
    /// A stub reporting one fixed balance for everyone.
    Stub,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub kind: OracleKind,

    /// Where the stub is deployed. Unused for the ledger oracle.
    #[serde(default = "default_oracle_address")]
    pub address: Address,

    /// Balance the stub reports.
    #[serde(default)]
    pub balance: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            kind: OracleKind::default(),
            address: default_oracle_address(),
            balance: 0,
        }
    }
}

/// Governance parameters as written in TOML, whose integers are 64-bit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    pub voting_period: i64,
    pub timelock_period: i64,
    pub quorum_votes: u64,
    pub proposal_threshold: u64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        let params = GovernanceParams::default();
        Self {
            voting_period: params.voting_period,
            timelock_period: params.timelock_period,
            quorum_votes: u64::try_from(params.quorum_votes).unwrap_or(u64::MAX),
            proposal_threshold: u64::try_from(params.proposal_threshold).unwrap_or(u64::MAX),
        }
    }
}

impl From<&GovernanceConfig> for GovernanceParams {
    fn from(config: &GovernanceConfig) -> Self {
        Self {
            voting_period: config.voting_period,
            timelock_period: config.timelock_period,
            quorum_votes: config.quorum_votes.into(),
            proposal_threshold: config.proposal_threshold.into(),
        }
    }
}

/// An admin-gated value store deployed for proposals to act on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub address: Address,
    /// Defaults to the governance engine.
    #[serde(default)]
    pub admin: Option<Address>,
}

/// Simulation configuration.
///
/// Can be loaded from a TOML file via [`SimConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// The governance engine's address.
    #[serde(default = "default_dao")]
    pub dao: Address,

    /// The snapshot ledger's address.
    #[serde(default = "default_token")]
    pub token: Address,

    /// The ledger's initial administrator.
    #[serde(default = "default_admin")]
    pub admin: Address,

    /// Log output format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter (e.g. "info", "debug,flow_governance=trace").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Cap on operations a single step may trigger.
    #[serde(default = "default_operation_limit")]
    pub operation_limit: usize,

    #[serde(default)]
    pub oracle: OracleConfig,

    #[serde(default)]
    pub governance: GovernanceConfig,

    #[serde(default)]
    pub stores: Vec<StoreConfig>,
}

fn default_dao() -> Address {
    Address::new("KT1dao")
}

fn default_token() -> Address {
    Address::new("KT1token")
}

fn default_admin() -> Address {
    Address::new("tz1admin")
}

fn default_oracle_address() -> Address {
    Address::new("KT1oracle")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_operation_limit() -> usize {
    flow_runtime::DEFAULT_OPERATION_LIMIT
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SimError> {
        toml::from_str(s).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SimError> {
        toml::to_string_pretty(self).map_err(|e| SimError::Config(e.to_string()))
    }

    /// The address the engine sends balance queries to.
    pub fn oracle_address(&self) -> &Address {
        match self.oracle.kind {
            OracleKind::Ledger => &self.token,
            OracleKind::Stub => &self.oracle.address,
        }
    }

    pub fn governance_params(&self) -> GovernanceParams {
        (&self.governance).into()
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dao: default_dao(),
            token: default_token(),
            admin: default_admin(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            operation_limit: default_operation_limit(),
            oracle: OracleConfig::default(),
            governance: GovernanceConfig::default(),
            stores: Vec::new(),
        }
    }
}
