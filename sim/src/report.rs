//! The JSON report printed after a run.

use flow_governance::{MachineState, Proposal};
use flow_runtime::Receipt;
use flow_types::{Address, GovernanceParams, Point, Timestamp};
use flow_utils::Counters;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub action: &'static str,
    pub expect_failure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub scenario: String,
    pub level: Point,
    pub now: Timestamp,
    pub state: MachineState,
    pub governance: GovernanceParams,
    pub proposals: Vec<Proposal>,
    pub total_supply: u128,
    pub balances: BTreeMap<Address, u128>,
    pub steps: Vec<StepOutcome>,
    pub stats: Counters,
}

impl Report {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
