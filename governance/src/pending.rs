//! The single-slot buffer carrying a suspended call across the oracle round trip.

use crate::proposal::{ProposalAction, ProposalId};
use flow_types::{Address, Point};
use serde::Serialize;

/// Whether the engine is waiting for a balance snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineState {
    Idle,
    AwaitingSnapshot,
}

/// A registration waiting for the proposer's balance.
#[derive(Clone, Debug)]
pub struct PendingProposal {
    pub creator: Address,
    pub metadata: String,
    pub action: ProposalAction,
    /// The point of the registration call, fixed before the oracle replies.
    pub origin_point: Point,
}

/// A vote waiting for the voter's balance.
#[derive(Clone, Debug)]
pub struct PendingVote {
    pub voter: Address,
    pub proposal_id: ProposalId,
    /// Raw vote value as submitted; checked when the weight arrives.
    pub vote_value: u64,
}

/// Whichever payload is in flight.
#[derive(Clone, Debug)]
pub enum PendingOperation {
    Proposal(PendingProposal),
    Vote(PendingVote),
}

impl PendingOperation {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Proposal(_) => "proposal",
            Self::Vote(_) => "vote",
        }
    }
}
