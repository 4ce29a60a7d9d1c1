//! Scenario files: an ordered list of steps replayed against a runtime.

use crate::error::SimError;
use flow_governance::{ProposalId, VoteChoice};
use flow_types::{Address, Effect};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A vote as written in a scenario: a direction or a raw value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoteInput {
    Choice(VoteChoice),
    Raw(u64),
}

impl VoteInput {
    pub fn value(&self) -> u64 {
        match self {
            Self::Choice(choice) => choice.value(),
            Self::Raw(value) => *value,
        }
    }
}

/// What a step does. Omitted senders default to the ledger administrator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Advance {
        #[serde(default)]
        points: u64,
        #[serde(default)]
        seconds: u64,
    },
    Mint {
        sender: Option<Address>,
        to: Address,
        value: u64,
    },
    Transfer {
        /// Defaults to `from`.
        sender: Option<Address>,
        from: Address,
        to: Address,
        value: u64,
    },
    Approve {
        sender: Address,
        spender: Address,
        value: u64,
    },
    DisableMint {
        sender: Option<Address>,
    },
    RegisterProposal {
        sender: Address,
        #[serde(default)]
        metadata: String,
        #[serde(default)]
        effects: Vec<Effect>,
    },
    Vote {
        sender: Address,
        proposal_id: ProposalId,
        vote: VoteInput,
    },
    EndVoting {
        sender: Option<Address>,
        proposal_id: ProposalId,
    },
    ExecuteProposal {
        sender: Option<Address>,
        proposal_id: ProposalId,
    },
    /// Any entry point on any contract.
    Call {
        sender: Address,
        target: Address,
        entrypoint: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Advance { .. } => "advance",
            Self::Mint { .. } => "mint",
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::DisableMint { .. } => "disable_mint",
            Self::RegisterProposal { .. } => "register_proposal",
            Self::Vote { .. } => "vote",
            Self::EndVoting { .. } => "end_voting",
            Self::ExecuteProposal { .. } => "execute_proposal",
            Self::Call { .. } => "call",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,

    /// The step must fail; its failure is rolled back and the run goes on.
    #[serde(default)]
    pub expect_failure: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SimError::Scenario(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SimError> {
        toml::from_str(s).map_err(|e| SimError::Scenario(e.to_string()))
    }
}
