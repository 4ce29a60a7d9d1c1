//! Calls accepted by the runtime and the receipt it returns.

use flow_governance::{ProposalAction, ProposalId, ProposalStatus};
use flow_types::{Address, Continuation, Effect, GovernanceParams, Point};
use serde::Serialize;

/// An entry point invocation.
///
/// Governance variants address the engine; [`Call::Contract`] addresses any
/// deployed contract and carries its payload as JSON.
#[derive(Clone, Debug)]
pub enum Call {
    RegisterProposal {
        metadata: String,
        action: ProposalAction,
    },
    RegisterProposalCallback {
        balance: u128,
    },
    Vote {
        proposal_id: ProposalId,
        vote_value: u64,
    },
    VoteCallback {
        balance: u128,
    },
    EndVoting {
        proposal_id: ProposalId,
    },
    ExecuteProposal {
        proposal_id: ProposalId,
    },
    SetGovernanceParameters {
        params: GovernanceParams,
    },
    Contract {
        entrypoint: String,
        payload: serde_json::Value,
    },
}

impl Call {
    pub fn contract(entrypoint: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Contract {
            entrypoint: entrypoint.into(),
            payload,
        }
    }

    /// The reply call for a balance snapshot.
    pub fn callback(reply_to: Continuation, balance: u128) -> Self {
        match reply_to {
            Continuation::RegisterProposalCallback => Self::RegisterProposalCallback { balance },
            Continuation::VoteCallback => Self::VoteCallback { balance },
        }
    }

    /// The call an effect turns into, and where it goes. Parameter changes
    /// return to the emitting engine.
    pub fn from_effect(effect: Effect, engine: &Address) -> (Address, Self) {
        match effect {
            Effect::SetGovernanceParameters { params } => {
                (engine.clone(), Self::SetGovernanceParameters { params })
            }
            Effect::Invoke {
                target,
                entrypoint,
                payload,
            } => (target, Self::Contract { entrypoint, payload }),
        }
    }

    pub fn entrypoint(&self) -> &str {
        match self {
            Self::RegisterProposal { .. } => "register_proposal",
            Self::RegisterProposalCallback { .. } => {
                Continuation::RegisterProposalCallback.entrypoint()
            }
            Self::Vote { .. } => "vote",
            Self::VoteCallback { .. } => Continuation::VoteCallback.entrypoint(),
            Self::EndVoting { .. } => "end_voting",
            Self::ExecuteProposal { .. } => "execute_proposal",
            Self::SetGovernanceParameters { .. } => "set_governance_parameters",
            Self::Contract { entrypoint, .. } => entrypoint,
        }
    }
}

/// One applied step of a submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Applied {
    Call {
        sender: Address,
        target: Address,
        entrypoint: String,
    },
    Snapshot {
        oracle: Address,
        address: Address,
        point: Point,
        balance: u128,
    },
}

/// What a successful submission did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Receipt {
    /// Applied steps in execution order.
    pub applied: Vec<Applied>,
    /// Id of a proposal registered during the submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered: Option<ProposalId>,
    /// Outcome of an `end_voting` call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided: Option<ProposalStatus>,
    /// Number of effects released by an executed proposal.
    pub effects: usize,
}

impl Receipt {
    pub fn calls(&self) -> impl Iterator<Item = (&Address, &Address, &str)> {
        self.applied.iter().filter_map(|applied| match applied {
            Applied::Call {
                sender,
                target,
                entrypoint,
            } => Some((sender, target, entrypoint.as_str())),
            Applied::Snapshot { .. } => None,
        })
    }
}
