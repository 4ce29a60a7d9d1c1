//! Scenario runner for the flow governance engine.
//!
//! Builds a [`flow_runtime::Runtime`] from a [`SimConfig`], replays a
//! [`Scenario`] step by step and produces a [`Report`].

pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod scenario;

pub use config::{GovernanceConfig, OracleConfig, OracleKind, SimConfig, StoreConfig};
pub use error::SimError;
pub use report::{Report, StepOutcome};
pub use runner::Simulation;
pub use scenario::{Action, Scenario, Step, VoteInput};
