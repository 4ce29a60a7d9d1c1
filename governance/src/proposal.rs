//! Governance proposals and their lifecycle.

use flow_types::{Address, Effect, Point, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Proposal identifiers are assigned from 1 upwards.
pub type ProposalId = u64;

/// Where a proposal is in its lifecycle.
///
/// Transitions only move forward: `Voting → Timelocked → Executed` or
/// `Voting → Rejected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Token holders are voting.
    Voting,
    /// The vote passed; execution waits for the timelock to release.
    Timelocked,
    /// The action has run.
    Executed,
    /// The vote did not pass.
    Rejected,
}

/// A ballot's direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    Up,
    Down,
}

impl VoteChoice {
    pub const UP_VALUE: u64 = 0;
    pub const DOWN_VALUE: u64 = 1;

    pub fn value(&self) -> u64 {
        match self {
            Self::Up => Self::UP_VALUE,
            Self::Down => Self::DOWN_VALUE,
        }
    }
}

impl TryFrom<u64> for VoteChoice {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            Self::UP_VALUE => Ok(Self::Up),
            Self::DOWN_VALUE => Ok(Self::Down),
            other => Err(other),
        }
    }
}

/// A recorded ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub weight: u128,
    pub choice: VoteChoice,
}

/// Execution delay, activated when a vote passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timelock {
    pub active: bool,
    /// Epoch while inactive.
    pub release_at: Timestamp,
}

/// The deferred operation a proposal carries.
///
/// Called at most once, when the proposal is executed, and returns the
/// effects the environment should carry out.
#[derive(Clone)]
pub struct ProposalAction(Arc<dyn Fn() -> Vec<Effect> + Send + Sync>);

impl ProposalAction {
    pub fn new(action: impl Fn() -> Vec<Effect> + Send + Sync + 'static) -> Self {
        Self(Arc::new(action))
    }

    /// An action that emits a fixed list of effects.
    pub fn from_effects(effects: Vec<Effect>) -> Self {
        Self::new(move || effects.clone())
    }

    /// An action with no effects (signalling proposals).
    pub fn noop() -> Self {
        Self::new(Vec::new)
    }

    pub(crate) fn invoke(&self) -> Vec<Effect> {
        (self.0)()
    }
}

impl fmt::Debug for ProposalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProposalAction(..)")
    }
}

/// A governance proposal.
#[derive(Clone, Debug, Serialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub creator: Address,
    /// Opaque reference to the proposal's description (e.g. a content hash).
    pub metadata: String,
    #[serde(skip)]
    pub action: ProposalAction,
    pub up_votes: u128,
    pub down_votes: u128,
    /// One entry per address that ever voted; never overwritten.
    pub voters: BTreeMap<Address, VoteRecord>,
    pub voting_deadline: Timestamp,
    /// Point at which every voter's weight is sampled.
    pub origin_point: Point,
    pub timelock: Timelock,
    pub status: ProposalStatus,
}

impl Proposal {
    /// Total weight cast either way.
    pub fn total_votes(&self) -> u128 {
        self.up_votes.saturating_add(self.down_votes)
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.voters.contains_key(voter)
    }

    /// Whether the vote passes: a strict majority that also meets quorum.
    pub fn passes(&self, quorum_votes: u128) -> bool {
        self.up_votes > self.down_votes && self.total_votes() >= quorum_votes
    }
}
